//! Filled buffers handed from a stream to the host.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::StreamLayout;
use crate::types::{Bounds, TriangleU16, Vertex};

/// Interleaved vertex record (`Single` layout), 48 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InterleavedVertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
  pub tangent: [f32; 4],
  pub tex_coord0: [f32; 2],
}

impl From<Vertex> for InterleavedVertex {
  #[inline(always)]
  fn from(vertex: Vertex) -> Self {
    Self {
      position: vertex.position.to_array(),
      normal: vertex.normal.to_array(),
      tangent: vertex.tangent.to_array(),
      tex_coord0: vertex.tex_coord0.to_array(),
    }
  }
}

/// Parallel attribute arrays (`Multi` layout).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeparateAttributes {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub tangents: Vec<[f32; 4]>,
  pub tex_coords0: Vec<[f32; 2]>,
}

impl SeparateAttributes {
  pub(crate) fn zeroed(vertex_count: usize) -> Self {
    Self {
      positions: vec![[0.0; 3]; vertex_count],
      normals: vec![[0.0; 3]; vertex_count],
      tangents: vec![[0.0; 4]; vertex_count],
      tex_coords0: vec![[0.0; 2]; vertex_count],
    }
  }
}

/// Vertex memory in the layout of the stream that produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum VertexBuffer {
  Interleaved(Vec<InterleavedVertex>),
  Separate(SeparateAttributes),
  Positions(Vec<[f32; 3]>),
}

impl Default for VertexBuffer {
  fn default() -> Self {
    VertexBuffer::Interleaved(Vec::new())
  }
}

impl VertexBuffer {
  pub fn layout(&self) -> StreamLayout {
    match self {
      VertexBuffer::Interleaved(_) => StreamLayout::Single,
      VertexBuffer::Separate(_) => StreamLayout::Multi,
      VertexBuffer::Positions(_) => StreamLayout::Position,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      VertexBuffer::Interleaved(vertices) => vertices.len(),
      VertexBuffer::Separate(attributes) => attributes.positions.len(),
      VertexBuffer::Positions(positions) => positions.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Position of vertex `index`, whatever the layout.
  pub fn position(&self, index: usize) -> Vec3 {
    match self {
      VertexBuffer::Interleaved(vertices) => Vec3::from_array(vertices[index].position),
      VertexBuffer::Separate(attributes) => Vec3::from_array(attributes.positions[index]),
      VertexBuffer::Positions(positions) => Vec3::from_array(positions[index]),
    }
  }

  /// Raw bytes of each GPU vertex stream, in stream-slot order.
  pub fn stream_bytes(&self) -> Vec<&[u8]> {
    match self {
      VertexBuffer::Interleaved(vertices) => vec![bytemuck::cast_slice(vertices)],
      VertexBuffer::Separate(attributes) => vec![
        bytemuck::cast_slice(&attributes.positions),
        bytemuck::cast_slice(&attributes.normals),
        bytemuck::cast_slice(&attributes.tangents),
        bytemuck::cast_slice(&attributes.tex_coords0),
      ],
      VertexBuffer::Positions(positions) => vec![bytemuck::cast_slice(positions)],
    }
  }
}

/// Fixed-size vertex and 16-bit index buffers of one generated mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
  pub vertices: VertexBuffer,
  pub triangles: Vec<TriangleU16>,
  /// Bounds declared by the generator (not recomputed from vertices).
  pub bounds: Bounds,
}

impl MeshBuffers {
  pub fn layout(&self) -> StreamLayout {
    self.vertices.layout()
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  pub fn index_count(&self) -> usize {
    self.triangles.len() * 3
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Flat 16-bit index view of the triangle buffer.
  pub fn indices(&self) -> &[u16] {
    bytemuck::cast_slice(&self.triangles)
  }

  pub fn index_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.triangles)
  }

  pub fn positions(&self) -> Vec<Vec3> {
    (0..self.vertex_count())
      .map(|i| self.vertices.position(i))
      .collect()
  }

  /// Total size of vertex and index memory.
  pub fn byte_size(&self) -> usize {
    let vertex_bytes: usize = self.vertices.stream_bytes().iter().map(|s| s.len()).sum();
    vertex_bytes + self.index_bytes().len()
  }
}
