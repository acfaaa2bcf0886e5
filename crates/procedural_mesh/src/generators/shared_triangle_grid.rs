//! Equilateral triangle grid with shared vertices.
//!
//! Same indexing as [`SharedSquareGrid`](super::SharedSquareGrid), but rows
//! are `√3/2` apart and alternate a quarter cell left and right, so each
//! row pair flips the diagonal of its quads.
//!
//! ```text
//!   odd      ●───●───●───●
//!           ╱ ╲ ╱ ╲ ╱ ╲ ╱
//!   even   ●───●───●───●
//! ```

use glam::{IVec3, Vec2, Vec3};

use super::{MeshGenerator, Topology, GRID_TANGENT};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

const ROW_HEIGHT: f32 = 0.866_025_4; // √3 / 2

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedTriangleGrid {
  resolution: u32,
}

// SAFETY: identical ownership to `SharedSquareGrid`; only the triangle
// offsets within the same two rows differ.
unsafe impl MeshGenerator for SharedTriangleGrid {
  const TOPOLOGY: Topology = Topology::SharedTriangleGrid;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    let r = self.resolution as usize;
    (r + 1) * (r + 1)
  }

  fn index_count(&self) -> usize {
    let r = self.resolution as usize;
    6 * r * r
  }

  fn job_length(&self) -> usize {
    self.resolution as usize + 1
  }

  /// Width grows by the half-cell row shift.
  fn bounds(&self) -> Bounds {
    let rf = self.resolution.max(1) as f32;
    Bounds::from_center_size(Vec3::ZERO, Vec3::new(1.0 + 0.5 / rf, 0.0, ROW_HEIGHT))
  }

  fn execute<S: MeshSink>(&self, z: usize, sink: &S) {
    let r = self.resolution as i32;
    let rf = self.resolution as f32;
    let z = z as i32;
    let mut vi = (r + 1) * z;
    let mut ti = (z - 1) * 2 * r;

    let p00 = -r - 2;
    let p10 = -r - 1;
    let p01 = -1;
    let p11 = 0;

    let (x_offset, u_offset, tri_a, tri_b) = if z & 1 == 1 {
      (
        0.25,
        0.5 / (rf + 0.5),
        IVec3::new(p00, p01, p10),
        IVec3::new(p10, p01, p11),
      )
    } else {
      (-0.25, 0.0, IVec3::new(p00, p01, p11), IVec3::new(p00, p11, p10))
    };
    let x_offset = x_offset / rf - 0.5;

    let pz = (z as f32 / rf - 0.5) * ROW_HEIGHT;
    let mut vertex = Vertex {
      position: Vec3::new(x_offset, 0.0, pz),
      normal: Vec3::Y,
      tangent: GRID_TANGENT,
      tex_coord0: Vec2::new(u_offset, pz / (1.0 + 0.5 / rf) + 0.5),
    };
    sink.set_vertex(vi as usize, vertex);
    vi += 1;

    for x in 1..=r {
      vertex.position.x = x as f32 / rf + x_offset;
      vertex.tex_coord0.x = x as f32 / (rf + 0.5) + u_offset;
      sink.set_vertex(vi as usize, vertex);

      if z > 0 {
        sink.set_triangle(ti as usize, vi + tri_a);
        sink.set_triangle(ti as usize + 1, vi + tri_b);
      }

      vi += 1;
      ti += TRIANGLES_PER_QUAD;
    }
  }
}
