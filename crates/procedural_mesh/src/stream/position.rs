//! Position-only stream (no normals, tangents or texture coordinates).

use bytemuck::Zeroable;
use glam::IVec3;

use super::{validate_setup, MeshBuffers, MeshSink, MeshStream, SliceWriter, StreamLayout, VertexBuffer};
use crate::error::MeshError;
use crate::types::{Bounds, TriangleU16, Vertex};

#[derive(Default)]
pub struct PositionStream {
  positions: Vec<[f32; 3]>,
  triangles: Vec<TriangleU16>,
  bounds: Bounds,
}

pub struct PositionSink<'a> {
  positions: SliceWriter<'a, [f32; 3]>,
  triangles: SliceWriter<'a, TriangleU16>,
}

impl MeshSink for PositionSink<'_> {
  #[inline(always)]
  fn set_vertex(&self, index: usize, vertex: Vertex) {
    // SAFETY: the `MeshStream::sink` caller guarantees in-range,
    // thread-disjoint indices.
    unsafe { self.positions.write(index, vertex.position.to_array()) }
  }

  #[inline(always)]
  fn set_triangle(&self, index: usize, triangle: IVec3) {
    // SAFETY: see `set_vertex`.
    unsafe { self.triangles.write(index, TriangleU16::from_ivec3(triangle)) }
  }
}

impl MeshStream for PositionStream {
  const LAYOUT: StreamLayout = StreamLayout::Position;

  type Sink<'a> = PositionSink<'a>;

  fn setup(&mut self, vertex_count: usize, index_count: usize, bounds: Bounds) -> Result<(), MeshError> {
    let triangle_count = validate_setup(vertex_count, index_count)?;
    self.positions = vec![[0.0; 3]; vertex_count];
    self.triangles = vec![TriangleU16::zeroed(); triangle_count];
    self.bounds = bounds;
    Ok(())
  }

  unsafe fn sink(&mut self) -> PositionSink<'_> {
    PositionSink {
      positions: SliceWriter::new(&mut self.positions),
      triangles: SliceWriter::new(&mut self.triangles),
    }
  }

  fn into_buffers(self) -> MeshBuffers {
    MeshBuffers {
      vertices: VertexBuffer::Positions(self.positions),
      triangles: self.triangles,
      bounds: self.bounds,
    }
  }
}
