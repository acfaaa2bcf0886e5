//! Quad grid sharing one vertex per grid point.
//!
//! Work item `z` writes grid line `z` and, for `z > 0`, the quads between
//! lines `z - 1` and `z`. Triangles reach the previous line through negative
//! offsets from the current vertex index.
//!
//! ```text
//!   line z     ── -1 ──── 0 ──     (current vertex = 0)
//!                  │ ╲    │
//!                  │   ╲  │
//!   line z-1   ─ -R-2 ── -R-1 ─
//! ```

use glam::{IVec3, Vec2, Vec3};

use super::{MeshGenerator, Topology, GRID_TANGENT};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedSquareGrid {
  resolution: u32,
}

// SAFETY: line `z` owns vertices `[(R+1)z, (R+1)(z+1))` and, for `z > 0`,
// triangle slots `[2R(z-1), 2Rz)`. Offsets only reach line `z - 1`.
unsafe impl MeshGenerator for SharedSquareGrid {
  const TOPOLOGY: Topology = Topology::SharedSquareGrid;

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

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0))
  }

  fn execute<S: MeshSink>(&self, z: usize, sink: &S) {
    let r = self.resolution as i32;
    let rf = self.resolution as f32;
    let z = z as i32;
    let mut vi = (r + 1) * z;
    let mut ti = (z - 1) * 2 * r;

    let mut vertex = Vertex {
      position: Vec3::new(-0.5, 0.0, z as f32 / rf - 0.5),
      normal: Vec3::Y,
      tangent: GRID_TANGENT,
      tex_coord0: Vec2::new(0.0, z as f32 / rf),
    };
    sink.set_vertex(vi as usize, vertex);
    vi += 1;

    let tri_a = IVec3::new(-r - 2, -1, -r - 1);
    let tri_b = IVec3::new(-r - 1, -1, 0);

    for x in 1..=r {
      vertex.position.x = x as f32 / rf - 0.5;
      vertex.tex_coord0.x = x as f32 / rf;
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
