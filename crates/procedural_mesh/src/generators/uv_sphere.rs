//! Latitude/longitude sphere.
//!
//! `4R` columns around, `2R` rows from pole to pole. Every column carries
//! its own copy of both poles so texture coordinates can pinch per column.
//!
//! ```text
//!   work item 0      seam meridian interior      vertices 0 .. 2R-2
//!   work item u>0    column u:
//!                      south pole copy           vertex (2R+1)u - 2
//!                      interior rows 1..2R-1
//!                      north pole copy           vertex (2R+1)u - 2 + 2R
//!                      1 pole triangle, 2 per interior quad, 1 pole triangle
//! ```
//!
//! Column `u` stitches to column `u - 1`, which for `u == 1` is the seam
//! meridian written by work item 0.

use std::f32::consts::{PI, TAU};

use glam::{IVec3, Vec2, Vec3, Vec4};

use super::{MeshGenerator, Topology, GRID_TANGENT};
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UvSphere {
  resolution: u32,
}

impl UvSphere {
  fn resolution_u(&self) -> i32 {
    4 * self.resolution as i32
  }

  fn resolution_v(&self) -> i32 {
    2 * self.resolution as i32
  }

  fn execute_seam<S: MeshSink>(&self, sink: &S) {
    let rv = self.resolution_v();
    let mut vertex = Vertex {
      tangent: GRID_TANGENT,
      ..Vertex::default()
    };

    for v in 1..rv {
      let (sin, cos) = (PI + PI * v as f32 / rv as f32).sin_cos();
      vertex.position = Vec3::new(0.0, cos, sin);
      vertex.normal = vertex.position;
      vertex.tex_coord0.y = v as f32 / rv as f32;
      sink.set_vertex(v as usize - 1, vertex);
    }
  }

  fn execute_column<S: MeshSink>(&self, u: i32, sink: &S) {
    let ru = self.resolution_u();
    let rv = self.resolution_v();
    let mut vi = (rv + 1) * u - 2;
    let mut ti = (u - 1) * 2 * (rv - 1);

    // Pole copies sit between the column's texture coordinates.
    let (tangent_z, tangent_x) = (TAU * (u as f32 - 0.5) / ru as f32).sin_cos();
    let mut vertex = Vertex {
      position: Vec3::NEG_Y,
      normal: Vec3::NEG_Y,
      tangent: Vec4::new(tangent_x, 0.0, tangent_z, -1.0),
      tex_coord0: Vec2::new((u as f32 - 0.5) / ru as f32, 0.0),
    };
    sink.set_vertex(vi as usize, vertex);

    vertex.position = Vec3::Y;
    vertex.normal = Vec3::Y;
    vertex.tex_coord0.y = 1.0;
    sink.set_vertex((vi + rv) as usize, vertex);
    vi += 1;

    // The seam column has no pole copy of its own, so column 1 reaches one
    // vertex less far back.
    let shift_left = (if u == 1 { 0 } else { -1 }) - rv;
    let shift_left2 = shift_left - 1;

    sink.set_triangle(ti as usize, vi + IVec3::new(-1, shift_left, 0));
    ti += 1;

    let (circle_x, circle_y) = (TAU * u as f32 / ru as f32).sin_cos();
    vertex.tangent.x = circle_y;
    vertex.tangent.z = circle_x;
    vertex.tex_coord0.x = u as f32 / ru as f32;
    let circle = Vec2::new(circle_x, -circle_y);

    for v in 1..rv {
      let (radius, y) = (PI + PI * v as f32 / rv as f32).sin_cos();
      let xz = circle * -radius;
      vertex.position = Vec3::new(xz.x, y, xz.y);
      vertex.normal = vertex.position;
      vertex.tex_coord0.y = v as f32 / rv as f32;
      sink.set_vertex(vi as usize, vertex);

      if v > 1 {
        sink.set_triangle(ti as usize, vi + IVec3::new(shift_left2, shift_left, -1));
        sink.set_triangle(ti as usize + 1, vi + IVec3::new(-1, shift_left, 0));
        ti += 2;
      }

      vi += 1;
    }

    sink.set_triangle(ti as usize, vi + IVec3::new(shift_left2, 0, -1));
  }
}

// SAFETY: work item 0 owns vertices `[0, 2R-1)` and no triangles. Column
// `u >= 1` owns vertices `[(2R+1)u - 2, (2R+1)(u+1) - 2)` and triangle slots
// `[2(2R-1)(u-1), 2(2R-1)u)`; its shifts only reach column `u - 1`.
unsafe impl MeshGenerator for UvSphere {
  const TOPOLOGY: Topology = Topology::UvSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    if self.resolution == 0 {
      return 0;
    }
    let ru = self.resolution_u() as usize;
    let rv = self.resolution_v() as usize;
    (ru + 1) * (rv + 1) - 2
  }

  fn index_count(&self) -> usize {
    if self.resolution == 0 {
      return 0;
    }
    let ru = self.resolution_u() as usize;
    let rv = self.resolution_v() as usize;
    6 * ru * (rv - 1)
  }

  fn job_length(&self) -> usize {
    if self.resolution == 0 {
      return 0;
    }
    self.resolution_u() as usize + 1
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0))
  }

  fn execute<S: MeshSink>(&self, u: usize, sink: &S) {
    if u == 0 {
      self.execute_seam(sink);
    } else {
      self.execute_column(u as i32, sink);
    }
  }
}
