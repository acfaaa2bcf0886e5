//! Configuration errors surfaced before a dispatch starts.
//!
//! Index-formula defects inside generators are not represented here: they
//! are logic errors that show up as corrupted geometry, and the property
//! tests in `generators` are what rules them out.

use thiserror::Error;

use crate::constants::MAX_VERTEX_COUNT_U16;
use crate::generators::Topology;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MeshError {
  /// Resolution below the minimum of 1.
  #[error("{topology} resolution must be at least 1, got {resolution}")]
  InvalidResolution { topology: Topology, resolution: u32 },

  /// Vertex count does not fit a 16-bit index buffer.
  #[error(
    "{topology} at resolution {resolution} needs {vertex_count} vertices, \
     more than the {limit} addressable by 16-bit indices"
  )]
  VertexCountOverflow {
    topology: Topology,
    resolution: u32,
    vertex_count: usize,
    limit: usize,
  },

  /// Stream setup received an index count that does not describe triangles.
  #[error("index count {index_count} is not a multiple of 3")]
  IndexCountNotTriangles { index_count: usize },

  /// Stream setup received more vertices than 16-bit indices can address.
  #[error("stream cannot address {vertex_count} vertices with 16-bit indices")]
  StreamCapacityExceeded { vertex_count: usize },

  /// A scheduled job's worker panicked before delivering its result.
  #[error("mesh job finished without delivering a result")]
  JobDisconnected,
}

impl MeshError {
  pub(crate) fn vertex_overflow(topology: Topology, resolution: u32, vertex_count: usize) -> Self {
    MeshError::VertexCountOverflow {
      topology,
      resolution,
      vertex_count,
      limit: MAX_VERTEX_COUNT_U16,
    }
  }

  /// True for errors the caller fixes by choosing another resolution.
  pub fn is_configuration_error(&self) -> bool {
    matches!(
      self,
      MeshError::InvalidResolution { .. } | MeshError::VertexCountOverflow { .. }
    )
  }
}
