//! Core data types shared by every generator and stream.

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec2, Vec3, Vec4};

/// Vertex produced by a generator and copied into a stream.
///
/// Value type with no identity. Streams decide which attributes survive
/// (a position-only stream drops everything but `position`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Object-space position.
  pub position: Vec3,

  /// Surface normal (unit vector on curved surfaces).
  pub normal: Vec3,

  /// Tangent direction in `xyz`, handedness sign in `w` (-1 or +1).
  pub tangent: Vec4,

  /// First texture coordinate set.
  pub tex_coord0: Vec2,
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: Vec3::ZERO,
      normal: Vec3::ZERO,
      tangent: Vec4::ZERO,
      tex_coord0: Vec2::ZERO,
    }
  }
}

/// Triangle stored as three 16-bit vertex indices.
///
/// Winding determines the front face.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct TriangleU16 {
  pub a: u16,
  pub b: u16,
  pub c: u16,
}

impl TriangleU16 {
  pub fn new(a: u16, b: u16, c: u16) -> Self {
    Self { a, b, c }
  }

  /// Narrow a generator triangle to 16-bit indices.
  ///
  /// Range is guaranteed by stream setup (vertex count <= 65 536), so this is
  /// a plain truncating conversion.
  #[inline(always)]
  pub fn from_ivec3(triangle: IVec3) -> Self {
    Self {
      a: triangle.x as u16,
      b: triangle.y as u16,
      c: triangle.z as u16,
    }
  }

  /// Indices widened back to `u32`.
  pub fn to_array(self) -> [u32; 3] {
    [self.a as u32, self.b as u32, self.c as u32]
  }
}

/// Axis-aligned bounding box, declared by a generator for the unit shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub min: Vec3,
  pub max: Vec3,
}

impl Bounds {
  /// Create bounds with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::INFINITY,
      max: Vec3::NEG_INFINITY,
    }
  }

  /// Create bounds from min/max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Create bounds from a center point and full size.
  pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
    let half = size * 0.5;
    Self {
      min: center - half,
      max: center + half,
    }
  }

  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Half of `size`.
  pub fn extents(&self) -> Vec3 {
    self.size() * 0.5
  }

  /// Length of the min-to-max diagonal.
  pub fn diagonal(&self) -> f32 {
    self.size().length()
  }

  /// Expand bounds to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// True if `point` lies inside the bounds grown by `tolerance` on every
  /// side.
  pub fn contains(&self, point: Vec3, tolerance: f32) -> bool {
    let grow = Vec3::splat(tolerance);
    point.cmpge(self.min - grow).all() && point.cmple(self.max + grow).all()
  }

  /// Check if bounds are valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }
}

impl Default for Bounds {
  fn default() -> Self {
    Self::empty()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
