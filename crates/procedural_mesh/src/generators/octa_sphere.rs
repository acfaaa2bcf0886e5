//! Octahedron spheres, normalized and geodesic.
//!
//! The octahedron is unfolded into four rhombuses around the Y axis, each
//! running from the south pole through two equator corners to the north
//! pole. Work item 0 writes the pole rings and the seam meridian; work item
//! `1 + 4u + k` writes column `u` of rhombus `k`.
//!
//! ```text
//!   vertices   0..3      south pole, once per rhombus (texture u 0.125 + k/4)
//!              4..7      north pole, once per rhombus
//!              8..6+2R   seam meridian interior
//!              rest      rhombus columns, R vertices each
//! ```
//!
//! Both variants share the index scheme; only vertex placement differs.
//! `OctaSphere` interpolates linearly across the octahedron faces and
//! normalizes, `GeoOctaSphere` rotates along great circles.

use std::f32::consts::PI;

use glam::{IVec3, IVec4, Vec2, Vec3, Vec4};

use super::{rotate_towards, sphere_tex_coord, tangent_xz, MeshGenerator, Topology};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

const RHOMBUSES: usize = 4;
const SOUTH_POLE_INDEX: usize = 0;
const NORTH_POLE_INDEX: usize = 4;
const SEAM_START: i32 = 8;

/// `(left corner, right corner)` of each rhombus on the equator.
const RHOMBUS_CORNERS: [(Vec3, Vec3); RHOMBUSES] = [
  (Vec3::NEG_Z, Vec3::X),
  (Vec3::X, Vec3::Z),
  (Vec3::Z, Vec3::NEG_X),
  (Vec3::NEG_X, Vec3::NEG_Z),
];

fn octa_counts(resolution: u32) -> (usize, usize, usize) {
  let r = resolution as usize;
  if r == 0 {
    return (0, 0, 0);
  }
  (
    RHOMBUSES * r * r + 2 * r + 7,
    RHOMBUSES * TRIANGLES_PER_QUAD as usize * r * r * 3,
    RHOMBUSES * r + 1,
  )
}

#[inline]
fn xz_tangent(position: Vec3) -> Vec4 {
  let xz = tangent_xz(position);
  Vec4::new(xz.x, 0.0, xz.y, -1.0)
}

/// Work item 0: pole rings and the seam meridian.
fn execute_poles_and_seam<S: MeshSink, const GEO: bool>(resolution: u32, sink: &S) {
  let r = resolution as i32;
  let rf = resolution as f32;

  let mut vertex = Vertex {
    tangent: Vec4::new(0.5f32.sqrt(), 0.0, 0.5f32.sqrt(), -1.0),
    tex_coord0: Vec2::new(0.125, 0.0),
    ..Vertex::default()
  };

  for i in 0..RHOMBUSES {
    vertex.position = Vec3::NEG_Y;
    vertex.normal = Vec3::NEG_Y;
    vertex.tex_coord0.y = 0.0;
    sink.set_vertex(SOUTH_POLE_INDEX + i, vertex);

    vertex.position = Vec3::Y;
    vertex.normal = Vec3::Y;
    vertex.tex_coord0.y = 1.0;
    sink.set_vertex(NORTH_POLE_INDEX + i, vertex);

    // Quarter turn per rhombus.
    vertex.tangent = xz_tangent(vertex.tangent.truncate());
    vertex.tex_coord0.x += 0.25;
  }

  vertex.tangent = Vec4::new(1.0, 0.0, 0.0, -1.0);
  vertex.tex_coord0.x = 0.0;

  for v in 1..2 * r {
    if GEO {
      let (z, y) = (PI + PI * v as f32 / (2.0 * rf)).sin_cos();
      vertex.position = Vec3::new(0.0, y, z);
      vertex.tex_coord0.y = v as f32 / (2.0 * rf);
    } else {
      vertex.position = if v < r {
        Vec3::NEG_Y.lerp(Vec3::NEG_Z, v as f32 / rf).normalize()
      } else {
        Vec3::NEG_Z.lerp(Vec3::Y, (v - r) as f32 / rf).normalize()
      };
      vertex.tex_coord0.y = sphere_tex_coord(vertex.position).y;
    }
    vertex.normal = vertex.position;
    sink.set_vertex((v + SEAM_START - 1) as usize, vertex);
  }
}

/// Work items `1..`: one rhombus column each.
fn execute_column<S: MeshSink, const GEO: bool>(resolution: u32, index: usize, sink: &S) {
  let r = resolution as i32;
  let rf = resolution as f32;
  let u = (index / RHOMBUSES) as i32;
  let id = (index % RHOMBUSES) as i32;
  let (left, right) = RHOMBUS_CORNERS[id as usize];

  let mut vi = r * (r * id + u + 2) + 7;
  let mut ti = r * (r * id + u) * TRIANGLES_PER_QUAD;

  let first_column = u == 0;
  let mut quad = IVec4::new(
    vi,
    if first_column { id } else { vi - r },
    match (first_column, id) {
      (true, 0) => SEAM_START,
      (true, _) => vi - r * (r + u),
      _ => vi - r + 1,
    },
    vi + 1,
  );

  let u = u + 1;
  let uf = u as f32;

  let bottom_dir = right - Vec3::NEG_Y;
  let bottom_start = Vec3::NEG_Y + bottom_dir * uf / rf;
  let bottom_end = left + bottom_dir * uf / rf;

  let top_dir = Vec3::Y - left;
  let top_start = right + top_dir * (uf / rf - 1.0);
  let top_end = left + top_dir * uf / rf;

  let mut vertex = Vertex::default();
  if GEO {
    let (sine, y) = (PI + PI * uf / (2.0 * rf)).sin_cos();
    vertex.position = Vec3::new(0.0, y, 0.0) - sine * right;
    vertex.tex_coord0 = Vec2::new(id as f32 * 0.25 + 0.25, uf / (2.0 * rf));
  } else {
    vertex.position = bottom_start.normalize();
    vertex.tex_coord0 = sphere_tex_coord(vertex.position);
  }
  vertex.normal = vertex.position;
  vertex.tangent = xz_tangent(vertex.position);
  sink.set_vertex(vi as usize, vertex);
  vi += 1;

  let z_step = if first_column && id != 0 { r } else { 1 };

  for v in 1..r {
    let vf = v as f32;
    vertex.position = if GEO {
      let height = uf + vf;
      let (sine, y) = (PI + PI * height / (2.0 * rf)).sin_cos();
      let center = Vec3::new(0.0, y, 0.0);
      let left_position = center - sine * left;
      let right_position = center - sine * right;
      let t = if v <= r - u {
        vf / height
      } else {
        (rf - uf) / (2.0 * rf - height)
      };
      rotate_towards(right_position, left_position, t)
    } else if v <= r - u {
      bottom_start.lerp(bottom_end, vf / rf).normalize()
    } else {
      top_start.lerp(top_end, vf / rf).normalize()
    };

    vertex.normal = vertex.position;
    vertex.tangent = xz_tangent(vertex.position);
    vertex.tex_coord0 = sphere_tex_coord(vertex.position);
    sink.set_vertex(vi as usize, vertex);

    sink.set_triangle(ti as usize, quad.truncate());
    sink.set_triangle(ti as usize + 1, IVec3::new(quad.x, quad.z, quad.w));

    quad.y = quad.z;
    quad += IVec4::new(1, 0, z_step, 1);

    vi += 1;
    ti += TRIANGLES_PER_QUAD;
  }

  if first_column && id == 0 {
    quad.w = quad.z + 1;
  }
  quad.z = r * r * id + r + u + 6;
  quad.w = if u < r { quad.z + 1 } else { id + NORTH_POLE_INDEX as i32 };

  sink.set_triangle(ti as usize, quad.truncate());
  sink.set_triangle(ti as usize + 1, IVec3::new(quad.x, quad.z, quad.w));
}

fn execute_octa<S: MeshSink, const GEO: bool>(resolution: u32, index: usize, sink: &S) {
  if index == 0 {
    execute_poles_and_seam::<S, GEO>(resolution, sink);
  } else {
    execute_column::<S, GEO>(resolution, index - 1, sink);
  }
}

/// Octahedron sphere with linear interpolation and normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctaSphere {
  resolution: u32,
}

/// Octahedron sphere with great-circle vertex placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeoOctaSphere {
  resolution: u32,
}

// SAFETY: work item 0 owns vertices `[0, 7 + 2R)`. Column `u` of rhombus `k`
// owns vertices `[R(Rk + u + 2) + 7, R(Rk + u + 3) + 7)` and triangle slots
// `[2R(Rk + u), 2R(Rk + u + 1))`.
unsafe impl MeshGenerator for OctaSphere {
  const TOPOLOGY: Topology = Topology::OctaSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    octa_counts(self.resolution).0
  }

  fn index_count(&self) -> usize {
    octa_counts(self.resolution).1
  }

  fn job_length(&self) -> usize {
    octa_counts(self.resolution).2
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0))
  }

  fn execute<S: MeshSink>(&self, index: usize, sink: &S) {
    execute_octa::<S, false>(self.resolution, index, sink);
  }
}

// SAFETY: same partition as `OctaSphere`.
unsafe impl MeshGenerator for GeoOctaSphere {
  const TOPOLOGY: Topology = Topology::GeoOctaSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    octa_counts(self.resolution).0
  }

  fn index_count(&self) -> usize {
    octa_counts(self.resolution).1
  }

  fn job_length(&self) -> usize {
    octa_counts(self.resolution).2
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0))
  }

  fn execute<S: MeshSink>(&self, index: usize, sink: &S) {
    execute_octa::<S, true>(self.resolution, index, sink);
  }
}
