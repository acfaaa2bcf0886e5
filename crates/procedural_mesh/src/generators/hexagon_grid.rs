//! Hexagon grids, pointy-top and flat-top.
//!
//! Every hexagon is an independent fan of 7 vertices and 6 triangles around
//! its center. Alternate rows (pointy) or columns (flat) shift half a cell so
//! the hexagons interlock.
//!
//! ```text
//!   pointy:    1          flat:    6 ─── 5
//!            ╱   ╲               ╱       ╲
//!           2     6             1    0    4
//!           │  0  │              ╲       ╱
//!           3     5                2 ─── 3
//!            ╲   ╱
//!              4
//! ```

use glam::{IVec3, Vec2, Vec3};

use super::{MeshGenerator, Topology, GRID_TANGENT};
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

const VERTICES_PER_HEXAGON: i32 = 7;
const TRIANGLES_PER_HEXAGON: i32 = 6;

/// Center-to-side distance of a hexagon of unit corner-to-corner height,
/// `√3 / 4`.
const HEIGHT: f32 = 0.433_012_7;

/// Fan triangles around vertex 0.
const FAN: [IVec3; 6] = [
  IVec3::new(0, 1, 2),
  IVec3::new(0, 2, 3),
  IVec3::new(0, 3, 4),
  IVec3::new(0, 4, 5),
  IVec3::new(0, 5, 6),
  IVec3::new(0, 6, 1),
];

fn hexagon_counts(resolution: u32) -> (usize, usize) {
  let r = resolution as usize;
  (
    VERTICES_PER_HEXAGON as usize * r * r,
    3 * TRIANGLES_PER_HEXAGON as usize * r * r,
  )
}

/// Long side of the grid, which gains half a hexagon when rows interlock.
fn staggered_extent(resolution: u32) -> f32 {
  let rf = resolution.max(1) as f32;
  let half = if resolution > 1 { 0.5 + 0.25 / rf } else { 0.5 };
  half * 3f32.sqrt()
}

/// Shift of row (or column) `line` so the grid is centered on the origin.
fn stagger_offset(resolution: u32, line: i32) -> (f32, f32) {
  if resolution <= 1 {
    return (0.0, 0.0);
  }
  let rf = resolution as f32;
  let shift = if line & 1 == 0 { 0.5 } else { 1.5 };
  ((shift - rf) * HEIGHT, -0.375 * (rf - 1.0))
}

fn emit_hexagon<S: MeshSink>(sink: &S, vi: i32, ti: i32, corners: [(Vec2, Vec2); 7]) {
  let mut vertex = Vertex {
    normal: Vec3::Y,
    tangent: GRID_TANGENT,
    ..Vertex::default()
  };
  for (k, (xz, uv)) in corners.into_iter().enumerate() {
    vertex.position = Vec3::new(xz.x, 0.0, xz.y);
    vertex.tex_coord0 = uv;
    sink.set_vertex(vi as usize + k, vertex);
  }
  for (k, fan) in FAN.iter().enumerate() {
    sink.set_triangle(ti as usize + k, vi + *fan);
  }
}

// =============================================================================
// Pointy-top
// =============================================================================

/// Hexagons with a corner pointing along ±Z, one work item per row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointyHexagonGrid {
  resolution: u32,
}

// SAFETY: row `z` owns vertices `[7Rz, 7R(z+1))` and triangle slots
// `[6Rz, 6R(z+1))`; each fan references only its own 7 vertices.
unsafe impl MeshGenerator for PointyHexagonGrid {
  const TOPOLOGY: Topology = Topology::PointyHexagonGrid;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    hexagon_counts(self.resolution).0
  }

  fn index_count(&self) -> usize {
    hexagon_counts(self.resolution).1
  }

  fn job_length(&self) -> usize {
    self.resolution as usize
  }

  fn bounds(&self) -> Bounds {
    let rf = self.resolution.max(1) as f32;
    Bounds::from_center_size(
      Vec3::ZERO,
      Vec3::new(staggered_extent(self.resolution), 0.0, 0.75 + 0.25 / rf),
    )
  }

  fn execute<S: MeshSink>(&self, z: usize, sink: &S) {
    let r = self.resolution as i32;
    let rf = self.resolution as f32;
    let z = z as i32;
    let mut vi = r * z * VERTICES_PER_HEXAGON;
    let mut ti = r * z * TRIANGLES_PER_HEXAGON;

    let (offset_x, offset_z) = stagger_offset(self.resolution, z);

    for x in 0..r {
      let center = Vec2::new(
        2.0 * HEIGHT * x as f32 + offset_x,
        0.75 * z as f32 + offset_z,
      ) / rf;
      let xs = [center.x - HEIGHT / rf, center.x + HEIGHT / rf];
      let zs = [-0.5, -0.25, 0.25, 0.5].map(|d| center.y + d / rf);

      emit_hexagon(
        sink,
        vi,
        ti,
        [
          (center, Vec2::splat(0.5)),
          (Vec2::new(center.x, zs[0]), Vec2::new(0.5, 0.0)),
          (Vec2::new(xs[0], zs[1]), Vec2::new(0.5 - HEIGHT, 0.25)),
          (Vec2::new(xs[0], zs[2]), Vec2::new(0.5 - HEIGHT, 0.75)),
          (Vec2::new(center.x, zs[3]), Vec2::new(0.5, 1.0)),
          (Vec2::new(xs[1], zs[2]), Vec2::new(0.5 + HEIGHT, 0.75)),
          (Vec2::new(xs[1], zs[1]), Vec2::new(0.5 + HEIGHT, 0.25)),
        ],
      );

      vi += VERTICES_PER_HEXAGON;
      ti += TRIANGLES_PER_HEXAGON;
    }
  }
}

// =============================================================================
// Flat-top
// =============================================================================

/// Hexagons with a corner pointing along ±X, one work item per column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatHexagonGrid {
  resolution: u32,
}

// SAFETY: column `x` owns vertices `[7Rx, 7R(x+1))` and triangle slots
// `[6Rx, 6R(x+1))`; each fan references only its own 7 vertices.
unsafe impl MeshGenerator for FlatHexagonGrid {
  const TOPOLOGY: Topology = Topology::FlatHexagonGrid;

  fn with_resolution(resolution: u32) -> Self {
    Self { resolution }
  }

  fn resolution(&self) -> u32 {
    self.resolution
  }

  fn vertex_count(&self) -> usize {
    hexagon_counts(self.resolution).0
  }

  fn index_count(&self) -> usize {
    hexagon_counts(self.resolution).1
  }

  fn job_length(&self) -> usize {
    self.resolution as usize
  }

  fn bounds(&self) -> Bounds {
    let rf = self.resolution.max(1) as f32;
    Bounds::from_center_size(
      Vec3::ZERO,
      Vec3::new(0.75 + 0.25 / rf, 0.0, staggered_extent(self.resolution)),
    )
  }

  fn execute<S: MeshSink>(&self, x: usize, sink: &S) {
    let r = self.resolution as i32;
    let rf = self.resolution as f32;
    let x = x as i32;
    let mut vi = r * x * VERTICES_PER_HEXAGON;
    let mut ti = r * x * TRIANGLES_PER_HEXAGON;

    // Same stagger as the pointy grid with the axes swapped.
    let (offset_z, offset_x) = stagger_offset(self.resolution, x);

    for z in 0..r {
      let center = Vec2::new(
        0.75 * x as f32 + offset_x,
        2.0 * HEIGHT * z as f32 + offset_z,
      ) / rf;
      let xs = [-0.5, -0.25, 0.25, 0.5].map(|d| center.x + d / rf);
      let zs = [center.y + HEIGHT / rf, center.y - HEIGHT / rf];

      emit_hexagon(
        sink,
        vi,
        ti,
        [
          (center, Vec2::splat(0.5)),
          (Vec2::new(xs[0], center.y), Vec2::new(0.0, 0.5)),
          (Vec2::new(xs[1], zs[0]), Vec2::new(0.25, 0.5 + HEIGHT)),
          (Vec2::new(xs[2], zs[0]), Vec2::new(0.75, 0.5 + HEIGHT)),
          (Vec2::new(xs[3], center.y), Vec2::new(1.0, 0.5)),
          (Vec2::new(xs[2], zs[1]), Vec2::new(0.75, 0.5 - HEIGHT)),
          (Vec2::new(xs[1], zs[1]), Vec2::new(0.25, 0.5 - HEIGHT)),
        ],
      );

      vi += VERTICES_PER_HEXAGON;
      ti += TRIANGLES_PER_HEXAGON;
    }
  }
}
