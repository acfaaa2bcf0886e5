//! Mesh generators: one stateless topology per type.
//!
//! A generator knows its sizes up front and fills a stream through
//! `execute(work_index, sink)`, one independent slice per work index.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           WORK PARTITIONING                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  work index:    0          1          2         ...   job_length - 1    │
//! │               ┌──────────┬──────────┬──────────┬────┬──────────┐        │
//! │  vertices:    │ v0 .. va │ va .. vb │ vb .. vc │ .. │ .. vN-1  │        │
//! │               └──────────┴──────────┴──────────┴────┴──────────┘        │
//! │               ┌──────────┬──────────┬──────────┬────┬──────────┐        │
//! │  triangles:   │ t0 .. ta │ ta .. tb │ tb .. tc │ .. │ .. tM-1  │        │
//! │               └──────────┴──────────┴──────────┴────┴──────────┘        │
//! │                                                                         │
//! │  Each slice is computed from the work index alone. Triangles may        │
//! │  reference vertices of other slices; they never write them.             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Topologies
//!
//! | Topology            | Vertices          | Indices  | Work items |
//! |---------------------|-------------------|----------|------------|
//! | `SquareGrid`        | 4R²               | 6R²      | R          |
//! | `SharedSquareGrid`  | (R+1)²            | 6R²      | R+1        |
//! | `SharedTriangleGrid`| (R+1)²            | 6R²      | R+1        |
//! | `PointyHexagonGrid` | 7R²               | 18R²     | R          |
//! | `FlatHexagonGrid`   | 7R²               | 18R²     | R          |
//! | `UvSphere`          | (4R+1)(2R+1) - 2  | 24R(2R-1)| 4R+1       |
//! | `CubeSphere`        | 24R²              | 36R²     | 6R         |
//! | `SharedCubeSphere`  | 6R² + 2           | 36R²     | 6R         |
//! | `OctaSphere`        | 4R² + 2R + 7      | 24R²     | 4R+1       |
//! | `GeoOctaSphere`     | 4R² + 2R + 7      | 24R²     | 4R+1       |
//! | `IcoSphere`         | 10R² + 2          | 60R²     | 5R         |
//! | `GeoIcoSphere`      | 10R² + 2          | 60R²     | 5R         |

mod cube_sphere;
mod hexagon_grid;
mod ico_sphere;
mod octa_sphere;
mod shared_cube_sphere;
mod shared_square_grid;
mod shared_triangle_grid;
mod square_grid;
mod uv_sphere;

#[cfg(test)]
pub mod test_utils;

use glam::{Quat, Vec2, Vec3, Vec4};

pub use cube_sphere::CubeSphere;
pub use hexagon_grid::{FlatHexagonGrid, PointyHexagonGrid};
pub use ico_sphere::{GeoIcoSphere, IcoSphere};
pub use octa_sphere::{GeoOctaSphere, OctaSphere};
pub use shared_cube_sphere::SharedCubeSphere;
pub use shared_square_grid::SharedSquareGrid;
pub use shared_triangle_grid::SharedTriangleGrid;
pub use square_grid::SquareGrid;
pub use uv_sphere::UvSphere;

use crate::constants::{fits_u16_indices, MIN_RESOLUTION, RESOLUTION_SEARCH_LIMIT};
use crate::error::MeshError;
use crate::stream::MeshSink;
use crate::types::Bounds;

/// A procedural topology.
///
/// # Safety
///
/// Streams write without bounds or overlap checks in release builds, so
/// implementors must guarantee that for every `index in 0..job_length()`:
///
/// - `execute(index, ..)` only writes vertex indices below `vertex_count()`
///   and triangle slots below `index_count() / 3`;
/// - no vertex index or triangle slot is written by two different work
///   indices;
/// - together the work indices write every vertex and every triangle slot.
///
/// Triangle values must reference vertex indices below `vertex_count()`.
pub unsafe trait MeshGenerator: Copy + Send + Sync + 'static {
  const TOPOLOGY: Topology;

  /// Generator for `resolution`. Never fails; resolution is validated by
  /// the dispatcher.
  fn with_resolution(resolution: u32) -> Self;

  fn resolution(&self) -> u32;

  fn vertex_count(&self) -> usize;

  fn index_count(&self) -> usize;

  /// Number of independent work items.
  fn job_length(&self) -> usize;

  /// Declared bounds of the finished mesh.
  fn bounds(&self) -> Bounds;

  /// Write the vertices and triangles owned by work item `index`.
  fn execute<S: MeshSink>(&self, index: usize, sink: &S);

  fn counts(&self) -> MeshCounts {
    MeshCounts {
      vertex_count: self.vertex_count(),
      index_count: self.index_count(),
      job_length: self.job_length(),
      bounds: self.bounds(),
    }
  }
}

/// Sizing facts of a topology at one resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshCounts {
  pub vertex_count: usize,
  pub index_count: usize,
  pub job_length: usize,
  pub bounds: Bounds,
}

impl MeshCounts {
  pub fn triangle_count(&self) -> usize {
    self.index_count / 3
  }
}

/// Every supported topology, one per generator type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
  #[default]
  SquareGrid,
  SharedSquareGrid,
  SharedTriangleGrid,
  PointyHexagonGrid,
  FlatHexagonGrid,
  UvSphere,
  CubeSphere,
  SharedCubeSphere,
  OctaSphere,
  GeoOctaSphere,
  IcoSphere,
  GeoIcoSphere,
}

impl Topology {
  pub const ALL: [Topology; 12] = [
    Topology::SquareGrid,
    Topology::SharedSquareGrid,
    Topology::SharedTriangleGrid,
    Topology::PointyHexagonGrid,
    Topology::FlatHexagonGrid,
    Topology::UvSphere,
    Topology::CubeSphere,
    Topology::SharedCubeSphere,
    Topology::OctaSphere,
    Topology::GeoOctaSphere,
    Topology::IcoSphere,
    Topology::GeoIcoSphere,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Topology::SquareGrid => "square_grid",
      Topology::SharedSquareGrid => "shared_square_grid",
      Topology::SharedTriangleGrid => "shared_triangle_grid",
      Topology::PointyHexagonGrid => "pointy_hexagon_grid",
      Topology::FlatHexagonGrid => "flat_hexagon_grid",
      Topology::UvSphere => "uv_sphere",
      Topology::CubeSphere => "cube_sphere",
      Topology::SharedCubeSphere => "shared_cube_sphere",
      Topology::OctaSphere => "octa_sphere",
      Topology::GeoOctaSphere => "geo_octa_sphere",
      Topology::IcoSphere => "ico_sphere",
      Topology::GeoIcoSphere => "geo_ico_sphere",
    }
  }

  /// Closed surfaces (spheres) as opposed to flat grids.
  pub fn is_sphere(self) -> bool {
    !matches!(
      self,
      Topology::SquareGrid
        | Topology::SharedSquareGrid
        | Topology::SharedTriangleGrid
        | Topology::PointyHexagonGrid
        | Topology::FlatHexagonGrid
    )
  }

  /// Sizes at `resolution`, without building anything.
  pub fn counts(self, resolution: u32) -> MeshCounts {
    match self {
      Topology::SquareGrid => SquareGrid::with_resolution(resolution).counts(),
      Topology::SharedSquareGrid => SharedSquareGrid::with_resolution(resolution).counts(),
      Topology::SharedTriangleGrid => SharedTriangleGrid::with_resolution(resolution).counts(),
      Topology::PointyHexagonGrid => PointyHexagonGrid::with_resolution(resolution).counts(),
      Topology::FlatHexagonGrid => FlatHexagonGrid::with_resolution(resolution).counts(),
      Topology::UvSphere => UvSphere::with_resolution(resolution).counts(),
      Topology::CubeSphere => CubeSphere::with_resolution(resolution).counts(),
      Topology::SharedCubeSphere => SharedCubeSphere::with_resolution(resolution).counts(),
      Topology::OctaSphere => OctaSphere::with_resolution(resolution).counts(),
      Topology::GeoOctaSphere => GeoOctaSphere::with_resolution(resolution).counts(),
      Topology::IcoSphere => IcoSphere::with_resolution(resolution).counts(),
      Topology::GeoIcoSphere => GeoIcoSphere::with_resolution(resolution).counts(),
    }
  }

  /// Check `resolution` against the minimum and the 16-bit index ceiling.
  ///
  /// Resolutions above `RESOLUTION_SEARCH_LIMIT` are rejected without
  /// computing counts and report a saturated `usize::MAX` vertex count.
  pub fn validate(self, resolution: u32) -> Result<MeshCounts, MeshError> {
    if resolution < MIN_RESOLUTION {
      return Err(MeshError::InvalidResolution {
        topology: self,
        resolution,
      });
    }
    // Counts can wrap in usize far above this; every topology has long
    // outgrown 16-bit indices by then.
    if resolution > RESOLUTION_SEARCH_LIMIT {
      return Err(MeshError::vertex_overflow(self, resolution, usize::MAX));
    }
    let counts = self.counts(resolution);
    if !fits_u16_indices(counts.vertex_count) {
      return Err(MeshError::vertex_overflow(self, resolution, counts.vertex_count));
    }
    Ok(counts)
  }

  /// Largest resolution whose vertex count fits 16-bit indices.
  pub fn max_resolution(self) -> u32 {
    (MIN_RESOLUTION..=RESOLUTION_SEARCH_LIMIT)
      .take_while(|&resolution| fits_u16_indices(self.counts(resolution).vertex_count))
      .last()
      .unwrap_or(MIN_RESOLUTION)
  }
}

impl std::fmt::Display for Topology {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

// =============================================================================
// Shared geometry helpers
// =============================================================================

/// Tangent used by every flat grid.
pub(crate) const GRID_TANGENT: Vec4 = Vec4::new(1.0, 0.0, 0.0, -1.0);

/// Warp a point on the `[-1, 1]` cube onto the unit sphere with near-uniform
/// cell area.
///
/// `p' = p * sqrt(1 - (p².yxx + p².zzy) / 2 + p².yxx * p².zzy / 3)`
#[inline]
pub(crate) fn cube_to_sphere(p: Vec3) -> Vec3 {
  let p2 = p * p;
  let a = Vec3::new(p2.y, p2.x, p2.x);
  let b = Vec3::new(p2.z, p2.z, p2.y);
  let scale = (Vec3::ONE - (a + b) * 0.5 + a * b / 3.0).max(Vec3::ZERO);
  p * Vec3::new(scale.x.sqrt(), scale.y.sqrt(), scale.z.sqrt())
}

/// Horizontal tangent direction `(-z, x)` of a sphere point, as XZ.
#[inline]
pub(crate) fn tangent_xz(position: Vec3) -> Vec2 {
  Vec2::new(-position.z, position.x).normalize_or_zero()
}

/// Latitude tangent `(-z, 0, x, -1)` of a sphere point; `(1, 0, 0, -1)` on
/// the poles.
#[inline]
pub(crate) fn sphere_tangent(position: Vec3) -> Vec4 {
  let xz = tangent_xz(position);
  if xz == Vec2::ZERO {
    GRID_TANGENT
  } else {
    Vec4::new(xz.x, 0.0, xz.y, -1.0)
  }
}

/// Equirectangular texture coordinates of a unit sphere point.
///
/// The seam sits at `u = 1`.
#[inline]
pub(crate) fn sphere_tex_coord(position: Vec3) -> Vec2 {
  let mut u = position.x.atan2(position.z) / (-std::f32::consts::TAU) + 0.5;
  let v = position.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI + 0.5;
  if u < 1e-6 {
    u = 1.0;
  }
  Vec2::new(u, v)
}

/// Rotate `point` by `angle` radians around `axis`.
#[inline]
pub(crate) fn rotate(axis: Vec3, angle: f32, point: Vec3) -> Vec3 {
  Quat::from_axis_angle(axis, angle) * point
}

/// Great-circle interpolation from unit vector `from` towards `to`.
#[inline]
pub(crate) fn rotate_towards(from: Vec3, to: Vec3, t: f32) -> Vec3 {
  let axis = from.cross(to).normalize_or_zero();
  if axis == Vec3::ZERO {
    return from;
  }
  let angle = from.dot(to).clamp(-1.0, 1.0).acos();
  rotate(axis, angle * t, from)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
