//! Sizing constants shared by generators, streams and dispatch.
//!
//! # Index Width
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       16-BIT TRIANGLE BUFFER                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Triangle slot:   0        1        2      ...   IndexCount/3 - 1       │
//! │                 ┌────────┬────────┬────────┬───┬────────┐               │
//! │                 │ a b c  │ a b c  │ a b c  │...│ a b c  │  u16 × 3      │
//! │                 └────────┴────────┴────────┴───┴────────┘               │
//! │                                                                         │
//! │  Largest index: 65 535  →  at most 65 536 vertices per mesh             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ceiling is checked once, before any buffer is allocated. Nothing in
//! the write path checks it again.
//!
//! # Coordinate System
//!
//! ```text
//!         +Y (normal of flat grids, north pole of spheres)
//!          │
//!          │
//!          │
//!          └───────── +X
//!         /
//!        /
//!       +Z
//! ```
//!
//! Grids lie in the XZ plane centered on the origin. Spheres are unit spheres
//! centered on the origin.

/// Largest vertex count addressable by a 16-bit index buffer.
pub const MAX_VERTEX_COUNT_U16: usize = 1 << 16;

/// Smallest accepted resolution for every topology.
pub const MIN_RESOLUTION: u32 = 1;

/// Default number of work items handed to a rayon worker at once.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Two triangles split every quad.
pub const TRIANGLES_PER_QUAD: i32 = 2;

/// Indices per triangle.
pub const INDICES_PER_TRIANGLE: usize = 3;

/// Upper bound probed by `Topology::max_resolution`.
///
/// Every topology overflows 16-bit indices well before this.
pub const RESOLUTION_SEARCH_LIMIT: u32 = 2048;

/// Check that a vertex count fits the 16-bit index ceiling.
#[inline(always)]
pub const fn fits_u16_indices(vertex_count: usize) -> bool {
  vertex_count <= MAX_VERTEX_COUNT_U16
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
