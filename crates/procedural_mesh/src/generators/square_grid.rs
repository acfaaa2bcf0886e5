//! Quad grid with four independent vertices per quad.
//!
//! ```text
//!   2 ─── 3      one work item per row (z), R quads per row
//!   │ ╲   │      triangles: (0, 2, 1) (1, 2, 3)
//!   │   ╲ │      texture coordinates span each quad
//!   0 ─── 1
//! ```

use glam::{IVec3, Vec2, Vec3};

use super::{MeshGenerator, Topology, GRID_TANGENT};
use crate::constants::TRIANGLES_PER_QUAD;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

const VERTICES_PER_QUAD: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareGrid {
  resolution: u32,
}

// SAFETY: row `z` owns vertices `[4Rz, 4R(z+1))` and triangle slots
// `[2Rz, 2R(z+1))`, and only references its own vertices.
unsafe impl MeshGenerator for SquareGrid {
  const TOPOLOGY: Topology = Topology::SquareGrid;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    let r = self.resolution as usize;
    VERTICES_PER_QUAD as usize * r * r
  }

  fn index_count(&self) -> usize {
    let r = self.resolution as usize;
    6 * r * r
  }

  fn job_length(&self) -> usize {
    self.resolution as usize
  }

  fn bounds(&self) -> Bounds {
    Bounds::from_center_size(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0))
  }

  fn execute<S: MeshSink>(&self, z: usize, sink: &S) {
    let r = self.resolution as i32;
    let rf = self.resolution as f32;
    let z = z as i32;
    let mut vi = r * z * VERTICES_PER_QUAD;
    let mut ti = r * z * TRIANGLES_PER_QUAD;

    let z0 = z as f32 / rf - 0.5;
    let z1 = (z + 1) as f32 / rf - 0.5;

    let mut vertex = Vertex {
      normal: Vec3::Y,
      tangent: GRID_TANGENT,
      ..Vertex::default()
    };

    for x in 0..r {
      let x0 = x as f32 / rf - 0.5;
      let x1 = (x + 1) as f32 / rf - 0.5;
      let v = vi as usize;

      vertex.position = Vec3::new(x0, 0.0, z0);
      vertex.tex_coord0 = Vec2::ZERO;
      sink.set_vertex(v, vertex);

      vertex.position.x = x1;
      vertex.tex_coord0 = Vec2::new(1.0, 0.0);
      sink.set_vertex(v + 1, vertex);

      vertex.position = Vec3::new(x0, 0.0, z1);
      vertex.tex_coord0 = Vec2::new(0.0, 1.0);
      sink.set_vertex(v + 2, vertex);

      vertex.position.x = x1;
      vertex.tex_coord0 = Vec2::ONE;
      sink.set_vertex(v + 3, vertex);

      let t = ti as usize;
      sink.set_triangle(t, vi + IVec3::new(0, 2, 1));
      sink.set_triangle(t + 1, vi + IVec3::new(1, 2, 3));

      vi += VERTICES_PER_QUAD;
      ti += TRIANGLES_PER_QUAD;
    }
  }
}
