//! Icosahedron spheres, normalized and geodesic.
//!
//! The icosahedron is unfolded into five strips around the Y axis. A strip
//! is four faces tall (south cap, two band faces, north cap) and is cut into
//! `R` columns of `2R` quads. Vertex 0 is the south pole and vertex 1 the
//! north pole; every other vertex belongs to one column of one strip.
//!
//! ```text
//!          UP            ul ── ur        upper corners at y = +0.2√5
//!        ╱    ╲          │ ╲   │ ╲
//!      ul ──── ur        │   ╲ │   ╲
//!      │ ╲   │ ╲        ll ──── lr       lower corners at y = -0.2√5
//!      │   ╲ │   ╲        ╲    ╱
//!     ll ──── lr            DOWN
//! ```
//!
//! Work item `idx` is column `idx / 5` of strip `idx % 5`. Each column walks
//! from the south cap up to the north cap through four regions, switching
//! interpolation endpoints at each face boundary.

use glam::{IVec3, IVec4, Vec3};

use super::{rotate, rotate_towards, sphere_tangent, MeshGenerator, Topology};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

const STRIPS: usize = 5;

/// Corner `i` of the ten-corner equatorial zigzag, on the unit sphere.
fn corner(i: i32, y_sign: f32) -> Vec3 {
  let scale = 0.4 * 5f32.sqrt();
  let (sin, cos) = (0.2 * std::f32::consts::PI * i as f32).sin_cos();
  Vec3::new(sin, y_sign * 0.5, -cos) * scale
}

/// Angle between a pole and any corner adjacent to it.
fn edge_angle() -> f32 {
  Vec3::Y.dot(corner(0, 1.0)).acos()
}

/// Corners of one strip and the rotation axes between them.
struct Strip {
  lower_left: Vec3,
  lower_right: Vec3,
  upper_left: Vec3,
  upper_right: Vec3,
  lower_left_axis: Vec3,
  lower_right_axis: Vec3,
  mid_left_axis: Vec3,
  mid_center_axis: Vec3,
  mid_right_axis: Vec3,
  upper_left_axis: Vec3,
  upper_right_axis: Vec3,
}

impl Strip {
  fn new(id: i32) -> Self {
    let lower_left = corner(2 * id, -1.0);
    let lower_right = corner(if id == 4 { 0 } else { 2 * id + 2 }, -1.0);
    let upper_left = corner(if id == 0 { 9 } else { 2 * id - 1 }, 1.0);
    let upper_right = corner(2 * id + 1, 1.0);

    Self {
      lower_left,
      lower_right,
      upper_left,
      upper_right,
      lower_left_axis: Vec3::NEG_Y.cross(lower_left).normalize(),
      lower_right_axis: Vec3::NEG_Y.cross(lower_right).normalize(),
      mid_left_axis: lower_left.cross(upper_left).normalize(),
      mid_center_axis: lower_left.cross(upper_right).normalize(),
      mid_right_axis: lower_right.cross(upper_right).normalize(),
      upper_left_axis: upper_left.cross(Vec3::Y).normalize(),
      upper_right_axis: upper_right.cross(Vec3::Y).normalize(),
    }
  }
}

/// Interpolation setup for one face region of a column.
struct Region {
  left_axis: Vec3,
  right_axis: Vec3,
  left_start: Vec3,
  right_start: Vec3,
  left_end: Vec3,
  right_end: Vec3,
  /// Progress along the edges, in edge lengths.
  edge: f32,
  /// Progress from the right edge towards the left edge.
  face: f32,
}

fn region(strip: &Strip, r: i32, u: i32, v: i32) -> Region {
  let h = (u + v) as f32;
  let (rf, uf, vf) = (r as f32, u as f32, v as f32);

  if v <= r - u {
    // South cap.
    Region {
      left_axis: strip.lower_left_axis,
      right_axis: strip.lower_right_axis,
      left_start: Vec3::NEG_Y,
      right_start: Vec3::NEG_Y,
      left_end: strip.lower_left,
      right_end: strip.lower_right,
      edge: h / rf,
      face: vf / h,
    }
  } else if v < r {
    // Lower band face.
    Region {
      left_axis: strip.mid_center_axis,
      right_axis: strip.mid_right_axis,
      left_start: strip.lower_left,
      right_start: strip.lower_right,
      left_end: strip.upper_right,
      right_end: strip.upper_right,
      edge: h / rf - 1.0,
      face: (rf - uf) / (2.0 * rf - h),
    }
  } else if v <= 2 * r - u {
    // Upper band face.
    Region {
      left_axis: strip.mid_left_axis,
      right_axis: strip.mid_center_axis,
      left_start: strip.lower_left,
      right_start: strip.lower_left,
      left_end: strip.upper_left,
      right_end: strip.upper_right,
      edge: h / rf - 1.0,
      face: (vf - rf) / (h - rf),
    }
  } else {
    // North cap.
    Region {
      left_axis: strip.upper_left_axis,
      right_axis: strip.upper_right_axis,
      left_start: strip.upper_left,
      right_start: strip.upper_right,
      left_end: Vec3::Y,
      right_end: Vec3::Y,
      edge: h / rf - 2.0,
      face: (rf - uf) / (3.0 * rf - h),
    }
  }
}

fn place<const GEO: bool>(region: &Region, edge_angle: f32) -> Vec3 {
  if GEO {
    let left = rotate(region.left_axis, edge_angle * region.edge, region.left_start);
    let right = rotate(region.right_axis, edge_angle * region.edge, region.right_start);
    rotate_towards(right, left, region.face)
  } else {
    let left = region.left_start.lerp(region.left_end, region.edge);
    let right = region.right_start.lerp(region.right_end, region.edge);
    right.lerp(left, region.face).normalize()
  }
}

fn sphere_vertex(position: Vec3) -> Vertex {
  Vertex {
    position,
    normal: position,
    tangent: sphere_tangent(position),
    ..Vertex::default()
  }
}

fn ico_counts(resolution: u32) -> (usize, usize, usize) {
  let r = resolution as usize;
  (
    STRIPS * 2 * r * r + 2,
    STRIPS * 2 * TRIANGLES_PER_QUAD as usize * r * r * 3,
    STRIPS * r,
  )
}

fn execute_ico<S: MeshSink, const GEO: bool>(resolution: u32, index: usize, sink: &S) {
  let r = resolution as i32;
  let rv = 2 * r;
  let strip_vertices = rv * r;
  let u = (index / STRIPS) as i32;
  let id = (index % STRIPS) as i32;
  let strip = Strip::new(id);
  let edge_angle = edge_angle();

  let mut vi = rv * (r * id + u) + 2;
  let mut ti = rv * (r * id + u) * TRIANGLES_PER_QUAD;

  let first_column = u == 0;
  let mut quad = IVec4::new(
    vi,
    if first_column { 0 } else { vi - rv },
    match (first_column, id) {
      (true, 0) => 4 * strip_vertices + 2,
      (true, _) => vi - rv * (r + u),
      _ => vi - rv + 1,
    },
    vi + 1,
  );

  let u = u + 1;

  if index == 0 {
    sink.set_vertex(0, sphere_vertex(Vec3::NEG_Y));
    sink.set_vertex(1, sphere_vertex(Vec3::Y));
  }

  let t = u as f32 / r as f32;
  let bottom = if GEO {
    rotate(strip.lower_right_axis, edge_angle * t, Vec3::NEG_Y)
  } else {
    Vec3::NEG_Y.lerp(strip.lower_right, t).normalize()
  };
  sink.set_vertex(vi as usize, sphere_vertex(bottom));
  vi += 1;

  for v in 1..rv {
    let position = place::<GEO>(&region(&strip, r, u, v), edge_angle);
    sink.set_vertex(vi as usize, sphere_vertex(position));

    sink.set_triangle(ti as usize, quad.truncate());
    sink.set_triangle(ti as usize + 1, IVec3::new(quad.x, quad.z, quad.w));

    // The first column follows the previous strip's last column through the
    // south cap, which advances a full column per row.
    let z_step = if first_column && v <= r - u { rv } else { 1 };
    quad.y = quad.z;
    quad += IVec4::new(1, 0, z_step, 1);

    vi += 1;
    ti += TRIANGLES_PER_QUAD;
  }

  if first_column && id == 0 {
    quad.w = quad.z + 1;
  }
  if !first_column {
    // Strip 0 wraps to the end of the vertex range.
    let seam_strip = if id == 0 { STRIPS as i32 } else { id };
    quad.z = strip_vertices * seam_strip - r + u + 1;
  }
  quad.w = if u < r { quad.z + 1 } else { 1 };

  sink.set_triangle(ti as usize, quad.truncate());
  sink.set_triangle(ti as usize + 1, IVec3::new(quad.x, quad.z, quad.w));
}

/// Icosahedron sphere with linear interpolation and normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IcoSphere {
  resolution: u32,
}

/// Icosahedron sphere with great-circle vertex placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeoIcoSphere {
  resolution: u32,
}

// SAFETY: work item 0 additionally owns vertices 0 and 1. Column `u` of
// strip `k` owns vertices `[2R(Rk + u) + 2, 2R(Rk + u + 1) + 2)` and
// triangle slots `[4R(Rk + u), 4R(Rk + u + 1))`.
unsafe impl MeshGenerator for IcoSphere {
  const TOPOLOGY: Topology = Topology::IcoSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    ico_counts(self.resolution).0
  }

  fn index_count(&self) -> usize {
    ico_counts(self.resolution).1
  }

  fn job_length(&self) -> usize {
    ico_counts(self.resolution).2
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0))
  }

  fn execute<S: MeshSink>(&self, index: usize, sink: &S) {
    execute_ico::<S, false>(self.resolution, index, sink);
  }
}

// SAFETY: same partition as `IcoSphere`.
unsafe impl MeshGenerator for GeoIcoSphere {
  const TOPOLOGY: Topology = Topology::GeoIcoSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    ico_counts(self.resolution).0
  }

  fn index_count(&self) -> usize {
    ico_counts(self.resolution).1
  }

  fn job_length(&self) -> usize {
    ico_counts(self.resolution).2
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0))
  }

  fn execute<S: MeshSink>(&self, index: usize, sink: &S) {
    execute_ico::<S, true>(self.resolution, index, sink);
  }
}
