//! Cube sphere with independent quads.
//!
//! Each of the six cube sides is cut into `R × R` quads, warped onto the
//! sphere with [`cube_to_sphere`]. Work item `idx` is column `idx / 6` of
//! side `idx % 6`, so neighbouring work items land on different sides.
//!
//! ```text
//!            ┌─────┐
//!            │  5  │ up
//!      ┌─────┼─────┼─────┬─────┐
//!      │  4  │  0  │  1  │  3  │   left front right back
//!      └─────┼─────┼─────┴─────┘
//!            │  2  │ down
//!            └─────┘
//! ```

use glam::{IVec3, Vec2, Vec3};

use super::{cube_to_sphere, MeshGenerator, Topology};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

pub(super) const CUBE_SIDES: usize = 6;

const VERTICES_PER_QUAD: i32 = 4;

/// One face of the `[-1, 1]` cube, swept by `u_vector` then `v_vector`.
#[derive(Clone, Copy, Debug)]
pub(super) struct CubeSide {
  pub id: i32,
  pub origin: Vec3,
  pub u_vector: Vec3,
  pub v_vector: Vec3,
  /// Distance, in whole sides, to the side that continues this one's last
  /// column when vertices are shared.
  pub seam_step: i32,
}

impl CubeSide {
  /// Sides with even id start at the minimum corner pole.
  pub fn touches_minimum_pole(&self) -> bool {
    self.id & 1 == 0
  }
}

pub(super) const SIDES: [CubeSide; CUBE_SIDES] = [
  // front
  CubeSide {
    id: 0,
    origin: Vec3::NEG_ONE,
    u_vector: Vec3::new(2.0, 0.0, 0.0),
    v_vector: Vec3::new(0.0, 2.0, 0.0),
    seam_step: 4,
  },
  // right
  CubeSide {
    id: 1,
    origin: Vec3::new(1.0, -1.0, -1.0),
    u_vector: Vec3::new(0.0, 0.0, 2.0),
    v_vector: Vec3::new(0.0, 2.0, 0.0),
    seam_step: 4,
  },
  // down
  CubeSide {
    id: 2,
    origin: Vec3::NEG_ONE,
    u_vector: Vec3::new(0.0, 0.0, 2.0),
    v_vector: Vec3::new(2.0, 0.0, 0.0),
    seam_step: -2,
  },
  // back
  CubeSide {
    id: 3,
    origin: Vec3::new(-1.0, -1.0, 1.0),
    u_vector: Vec3::new(0.0, 2.0, 0.0),
    v_vector: Vec3::new(2.0, 0.0, 0.0),
    seam_step: -2,
  },
  // left
  CubeSide {
    id: 4,
    origin: Vec3::NEG_ONE,
    u_vector: Vec3::new(0.0, 2.0, 0.0),
    v_vector: Vec3::new(0.0, 0.0, 2.0),
    seam_step: -2,
  },
  // up
  CubeSide {
    id: 5,
    origin: Vec3::new(-1.0, 1.0, -1.0),
    u_vector: Vec3::new(2.0, 0.0, 0.0),
    v_vector: Vec3::new(0.0, 0.0, 2.0),
    seam_step: -2,
  },
];

/// Split a work index into `(column, side)`.
#[inline]
pub(super) fn column_and_side(index: usize) -> (i32, &'static CubeSide) {
  let u = index / CUBE_SIDES;
  (u as i32, &SIDES[index - CUBE_SIDES * u])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CubeSphere {
  resolution: u32,
}

// SAFETY: column `u` of side `s` owns the `R` quads starting at quad
// `R(Rs + u)`, four vertices and two triangle slots each, and references
// only those vertices.
unsafe impl MeshGenerator for CubeSphere {
  const TOPOLOGY: Topology = Topology::CubeSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    let r = self.resolution as usize;
    CUBE_SIDES * VERTICES_PER_QUAD as usize * r * r
  }

  fn index_count(&self) -> usize {
    let r = self.resolution as usize;
    CUBE_SIDES * TRIANGLES_PER_QUAD as usize * r * r * 3
  }

  fn job_length(&self) -> usize {
    CUBE_SIDES * self.resolution as usize
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0))
  }

  fn execute<S: MeshSink>(&self, index: usize, sink: &S) {
    let r = self.resolution as i32;
    let rf = self.resolution as f32;
    let (u, side) = column_and_side(index);
    let quad = r * (r * side.id + u);
    let mut vi = quad * VERTICES_PER_QUAD;
    let mut ti = quad * TRIANGLES_PER_QUAD;

    let u_a = side.origin + side.u_vector * u as f32 / rf;
    let u_b = side.origin + side.u_vector * (u + 1) as f32 / rf;
    let mut p_a = cube_to_sphere(u_a);
    let mut p_b = cube_to_sphere(u_b);

    let mut vertex = Vertex {
      tangent: (p_b - p_a).normalize().extend(-1.0),
      ..Vertex::default()
    };

    for v in 1..=r {
      let p_c = cube_to_sphere(u_a + side.v_vector * v as f32 / rf);
      let p_d = cube_to_sphere(u_b + side.v_vector * v as f32 / rf);
      let o = vi as usize;

      vertex.position = p_a;
      vertex.normal = (p_c - p_a).cross(vertex.tangent.truncate()).normalize();
      vertex.tex_coord0 = Vec2::ZERO;
      sink.set_vertex(o, vertex);

      vertex.position = p_b;
      vertex.normal = (p_d - p_b).cross(vertex.tangent.truncate()).normalize();
      vertex.tex_coord0 = Vec2::new(1.0, 0.0);
      sink.set_vertex(o + 1, vertex);

      // Upper edge runs along the next row.
      vertex.tangent = (p_d - p_c).normalize().extend(-1.0);
      vertex.position = p_c;
      vertex.normal = (p_c - p_a).cross(vertex.tangent.truncate()).normalize();
      vertex.tex_coord0 = Vec2::new(0.0, 1.0);
      sink.set_vertex(o + 2, vertex);

      vertex.position = p_d;
      vertex.normal = (p_d - p_b).cross(vertex.tangent.truncate()).normalize();
      vertex.tex_coord0 = Vec2::ONE;
      sink.set_vertex(o + 3, vertex);

      sink.set_triangle(ti as usize, vi + IVec3::new(0, 2, 1));
      sink.set_triangle(ti as usize + 1, vi + IVec3::new(1, 2, 3));

      vi += VERTICES_PER_QUAD;
      ti += TRIANGLES_PER_QUAD;
      p_a = p_c;
      p_b = p_d;
    }
  }
}
