//! Interleaved single-buffer stream.

use bytemuck::Zeroable;
use glam::IVec3;

use super::{validate_setup, InterleavedVertex, MeshBuffers, MeshSink, MeshStream, SliceWriter, StreamLayout, VertexBuffer};
use crate::error::MeshError;
use crate::types::{Bounds, TriangleU16, Vertex};

/// One interleaved vertex buffer (`PNTX PNTX ...`) plus 16-bit triangles.
#[derive(Default)]
pub struct SingleStream {
  vertices: Vec<InterleavedVertex>,
  triangles: Vec<TriangleU16>,
  bounds: Bounds,
}

pub struct SingleSink<'a> {
  vertices: SliceWriter<'a, InterleavedVertex>,
  triangles: SliceWriter<'a, TriangleU16>,
}

impl MeshSink for SingleSink<'_> {
  #[inline(always)]
  fn set_vertex(&self, index: usize, vertex: Vertex) {
    // SAFETY: sinks are only created through `MeshStream::sink`, whose
    // caller guarantees in-range, thread-disjoint indices.
    unsafe { self.vertices.write(index, InterleavedVertex::from(vertex)) }
  }

  #[inline(always)]
  fn set_triangle(&self, index: usize, triangle: IVec3) {
    // SAFETY: see `set_vertex`.
    unsafe { self.triangles.write(index, TriangleU16::from_ivec3(triangle)) }
  }
}

impl MeshStream for SingleStream {
  const LAYOUT: StreamLayout = StreamLayout::Single;

  type Sink<'a> = SingleSink<'a>;

  fn setup(&mut self, vertex_count: usize, index_count: usize, bounds: Bounds) -> Result<(), MeshError> {
    let triangle_count = validate_setup(vertex_count, index_count)?;
    self.vertices = vec![InterleavedVertex::zeroed(); vertex_count];
    self.triangles = vec![TriangleU16::zeroed(); triangle_count];
    self.bounds = bounds;
    Ok(())
  }

  unsafe fn sink(&mut self) -> SingleSink<'_> {
    SingleSink {
      vertices: SliceWriter::new(&mut self.vertices),
      triangles: SliceWriter::new(&mut self.triangles),
    }
  }

  fn into_buffers(self) -> MeshBuffers {
    MeshBuffers {
      vertices: VertexBuffer::Interleaved(self.vertices),
      triangles: self.triangles,
      bounds: self.bounds,
    }
  }
}
