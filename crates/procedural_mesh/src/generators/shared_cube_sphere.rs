//! Cube sphere with every vertex shared.
//!
//! Vertices 0 and 1 are the cube corners `-(1,1,1)` and `+(1,1,1)` warped
//! onto the sphere. Every other vertex belongs to exactly one column of one
//! side: column `u` of a side writes the `R` points of grid line `u + 1`.
//! Grid line 0 of every side is grid line `R` of a neighbour, so the first
//! column of each side stitches across a seam by index arithmetic alone.
//!
//! ```text
//!   seam step     sides 0, 1:  +4 sides      sides 2..5:  -2 sides
//!   min pole      even sides start at vertex 0 (the -(1,1,1) corner)
//!   max pole      odd sides end at vertex 1 on their last column
//! ```

use glam::{IVec3, Vec3};

use super::cube_sphere::{column_and_side, CUBE_SIDES};
use super::{cube_to_sphere, sphere_tangent, MeshGenerator, Topology};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

/// `sqrt(1/3)`: cube corner on the unit sphere.
const CORNER: f32 = 0.577_350_26;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedCubeSphere {
  resolution: u32,
}

fn sphere_vertex(position: Vec3) -> Vertex {
  Vertex {
    position,
    normal: position,
    tangent: sphere_tangent(position),
    ..Vertex::default()
  }
}

// SAFETY: work item 0 additionally owns vertices 0 and 1. Column `u` of side
// `s` owns vertices `[R(Rs + u) + 2, R(Rs + u + 1) + 2)` and triangle slots
// `[2R(Rs + u), 2R(Rs + u + 1))`.
unsafe impl MeshGenerator for SharedCubeSphere {
  const TOPOLOGY: Topology = Topology::SharedCubeSphere;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    let r = self.resolution as usize;
    CUBE_SIDES * r * r + 2
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
    let rr = r * r;
    let (u, side) = column_and_side(index);
    let mut vi = r * (r * side.id + u) + 2;
    let mut ti = r * (r * side.id + u) * TRIANGLES_PER_QUAD;
    let first_column = u == 0;
    let touches_min = side.touches_minimum_pole();
    let seam = side.seam_step;

    let u = u + 1;
    let start = side.origin + side.u_vector * u as f32 / rf;

    if index == 0 {
      sink.set_vertex(0, sphere_vertex(Vec3::splat(-CORNER)));
      sink.set_vertex(1, sphere_vertex(Vec3::splat(CORNER)));
    }

    sink.set_vertex(vi as usize, sphere_vertex(cube_to_sphere(start)));

    // Pole-side triangle, reaching the minimum pole or the seam neighbour.
    let mut triangle = IVec3::new(
      vi,
      if first_column && touches_min { 0 } else { vi - r },
      vi + match (first_column, touches_min) {
        (true, true) => seam * rr,
        (true, false) if r == 1 => seam,
        _ => -r + 1,
      },
    );
    sink.set_triangle(ti as usize, triangle);
    vi += 1;
    ti += 1;

    let z_offset = if first_column && touches_min { r } else { 1 };
    let z_last_offset = match (first_column, touches_min) {
      (true, true) => r,
      (false, false) => r * ((seam + 1) * r - u) + u,
      _ => (seam + 1) * rr - r + 1,
    };

    for v in 1..r {
      let position = cube_to_sphere(start + side.v_vector * v as f32 / rf);
      sink.set_vertex(vi as usize, sphere_vertex(position));

      triangle.x += 1;
      triangle.y = triangle.z;
      triangle.z += if v == r - 1 { z_last_offset } else { z_offset };
      sink.set_triangle(
        ti as usize,
        IVec3::new(triangle.x - 1, triangle.y, triangle.x),
      );
      sink.set_triangle(ti as usize + 1, triangle);

      vi += 1;
      ti += TRIANGLES_PER_QUAD;
    }

    // Far-pole triangle.
    let far = if touches_min {
      triangle.z + r
    } else if u == r {
      1
    } else {
      triangle.z + 1
    };
    sink.set_triangle(ti as usize, IVec3::new(triangle.x, triangle.z, far));
  }
}
