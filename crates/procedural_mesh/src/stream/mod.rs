//! Output streams: vertex/index buffer memory layouts.
//!
//! A stream owns the buffers of one mesh. It is sized once by `setup`, filled
//! through a [`MeshSink`] by many work items in parallel, then handed to the
//! host as [`MeshBuffers`].
//!
//! ```text
//! ┌───────────────┬──────────────────────────────────────────────────────┐
//! │ Layout        │ Vertex memory (4 vertices shown)                     │
//! ├───────────────┼──────────────────────────────────────────────────────┤
//! │ Single        │ PNTX PNTX PNTX PNTX          (one interleaved buffer)│
//! │ Multi         │ PPPP | NNNN | TTTT | XXXX    (four parallel buffers) │
//! │ Position      │ PPPP                         (positions only)        │
//! └───────────────┴──────────────────────────────────────────────────────┘
//!   P = position (3 × f32)   N = normal (3 × f32)
//!   T = tangent (4 × f32)    X = texture coordinate 0 (2 × f32)
//! ```
//!
//! Every layout writes triangles into the same 16-bit index buffer, so
//! positions and indices are bit-identical across layouts for a given
//! generator and resolution.
//!
//! # Parallel Writes
//!
//! Sinks write through [`SliceWriter`] views without locks or atomics. The
//! only guard is the disjointness promised by
//! [`MeshGenerator`](crate::generators::MeshGenerator) implementors, which is
//! why obtaining a sink from a stream is `unsafe`.

mod buffers;
mod multi;
mod position;
mod single;

use std::marker::PhantomData;

use glam::IVec3;

pub use buffers::{InterleavedVertex, MeshBuffers, SeparateAttributes, VertexBuffer};
pub use multi::{MultiSink, MultiStream};
pub use position::{PositionSink, PositionStream};
pub use single::{SingleSink, SingleStream};

use crate::constants::{fits_u16_indices, INDICES_PER_TRIANGLE};
use crate::error::MeshError;
use crate::types::{Bounds, Vertex};

/// Write side of a stream, shared by every work item of a dispatch.
pub trait MeshSink: Sync {
  /// Write vertex `index`.
  fn set_vertex(&self, index: usize, vertex: Vertex);

  /// Write triangle slot `index`, narrowing each vertex index to 16 bits.
  fn set_triangle(&self, index: usize, triangle: IVec3);
}

/// Vertex buffer layout variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamLayout {
  /// One interleaved buffer: position, normal, tangent, texture coordinate.
  #[default]
  Single,
  /// Four separate attribute buffers.
  Multi,
  /// Positions only.
  Position,
}

impl StreamLayout {
  pub const ALL: [StreamLayout; 3] = [
    StreamLayout::Single,
    StreamLayout::Multi,
    StreamLayout::Position,
  ];

  pub fn name(self) -> &'static str {
    match self {
      StreamLayout::Single => "single",
      StreamLayout::Multi => "multi",
      StreamLayout::Position => "position",
    }
  }
}

impl std::fmt::Display for StreamLayout {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// A vertex/index buffer layout.
pub trait MeshStream: Default + Send + 'static {
  const LAYOUT: StreamLayout;

  /// Borrowing write view handed to work items.
  type Sink<'a>: MeshSink
  where
    Self: 'a;

  /// Validate the counts and allocate zeroed buffers of exactly that size.
  ///
  /// Must run before `sink`. Fails without allocating when the vertex count
  /// exceeds 16-bit indices or the index count is not a multiple of 3.
  fn setup(&mut self, vertex_count: usize, index_count: usize, bounds: Bounds) -> Result<(), MeshError>;

  /// Write view over the buffers allocated by `setup`.
  ///
  /// # Safety
  ///
  /// Callers must only write indices inside the counts passed to `setup`,
  /// and must never write the same vertex or triangle slot from two threads
  /// at once. Both are unchecked in release builds.
  unsafe fn sink(&mut self) -> Self::Sink<'_>;

  /// Transfer the filled buffers to the host.
  fn into_buffers(self) -> MeshBuffers;
}

/// Shared precondition of every `MeshStream::setup`.
///
/// Returns the triangle count.
pub(crate) fn validate_setup(vertex_count: usize, index_count: usize) -> Result<usize, MeshError> {
  if !fits_u16_indices(vertex_count) {
    return Err(MeshError::StreamCapacityExceeded { vertex_count });
  }
  if index_count % INDICES_PER_TRIANGLE != 0 {
    return Err(MeshError::IndexCountNotTriangles { index_count });
  }
  Ok(index_count / INDICES_PER_TRIANGLE)
}

/// Unsynchronized write view over a pre-sized buffer.
///
/// Captured once after allocation; the borrow keeps the buffer alive and
/// unaliased for the duration of a dispatch.
pub struct SliceWriter<'a, T> {
  ptr: *mut T,
  len: usize,
  _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T> SliceWriter<'a, T> {
  pub fn new(slice: &'a mut [T]) -> Self {
    Self {
      ptr: slice.as_mut_ptr(),
      len: slice.len(),
      _marker: PhantomData,
    }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Store `value` at `index`.
  ///
  /// # Safety
  ///
  /// `index < self.len()`, and no other thread reads or writes `index`
  /// while this call runs.
  #[inline(always)]
  pub unsafe fn write(&self, index: usize, value: T) {
    debug_assert!(
      index < self.len,
      "write index {} out of range {}",
      index,
      self.len
    );
    // SAFETY: in range and unaliased per the caller contract.
    unsafe { self.ptr.add(index).write(value) }
  }
}

// SAFETY: the writer only moves `T` values into the buffer; concurrent
// writers touch disjoint indices per the `write` contract.
unsafe impl<T: Send> Send for SliceWriter<'_, T> {}
unsafe impl<T: Send> Sync for SliceWriter<'_, T> {}
