//! Multi-stream layout: one buffer per vertex attribute.

use bytemuck::Zeroable;
use glam::IVec3;

use super::{validate_setup, MeshBuffers, MeshSink, MeshStream, SeparateAttributes, SliceWriter, StreamLayout, VertexBuffer};
use crate::error::MeshError;
use crate::types::{Bounds, TriangleU16, Vertex};

/// Four parallel attribute buffers (`PPPP NNNN TTTT XXXX`) plus 16-bit
/// triangles.
#[derive(Default)]
pub struct MultiStream {
  attributes: SeparateAttributes,
  triangles: Vec<TriangleU16>,
  bounds: Bounds,
}

pub struct MultiSink<'a> {
  positions: SliceWriter<'a, [f32; 3]>,
  normals: SliceWriter<'a, [f32; 3]>,
  tangents: SliceWriter<'a, [f32; 4]>,
  tex_coords0: SliceWriter<'a, [f32; 2]>,
  triangles: SliceWriter<'a, TriangleU16>,
}

impl MeshSink for MultiSink<'_> {
  #[inline(always)]
  fn set_vertex(&self, index: usize, vertex: Vertex) {
    // SAFETY: all four buffers share the vertex count checked at setup; the
    // `MeshStream::sink` caller guarantees in-range, thread-disjoint indices.
    unsafe {
      self.positions.write(index, vertex.position.to_array());
      self.normals.write(index, vertex.normal.to_array());
      self.tangents.write(index, vertex.tangent.to_array());
      self.tex_coords0.write(index, vertex.tex_coord0.to_array());
    }
  }

  #[inline(always)]
  fn set_triangle(&self, index: usize, triangle: IVec3) {
    // SAFETY: see `set_vertex`.
    unsafe { self.triangles.write(index, TriangleU16::from_ivec3(triangle)) }
  }
}

impl MeshStream for MultiStream {
  const LAYOUT: StreamLayout = StreamLayout::Multi;

  type Sink<'a> = MultiSink<'a>;

  fn setup(&mut self, vertex_count: usize, index_count: usize, bounds: Bounds) -> Result<(), MeshError> {
    let triangle_count = validate_setup(vertex_count, index_count)?;
    self.attributes = SeparateAttributes::zeroed(vertex_count);
    self.triangles = vec![TriangleU16::zeroed(); triangle_count];
    self.bounds = bounds;
    Ok(())
  }

  unsafe fn sink(&mut self) -> MultiSink<'_> {
    let SeparateAttributes {
      positions,
      normals,
      tangents,
      tex_coords0,
    } = &mut self.attributes;

    MultiSink {
      positions: SliceWriter::new(positions),
      normals: SliceWriter::new(normals),
      tangents: SliceWriter::new(tangents),
      tex_coords0: SliceWriter::new(tex_coords0),
      triangles: SliceWriter::new(&mut self.triangles),
    }
  }

  fn into_buffers(self) -> MeshBuffers {
    MeshBuffers {
      vertices: VertexBuffer::Separate(self.attributes),
      triangles: self.triangles,
      bounds: self.bounds,
    }
  }
}
