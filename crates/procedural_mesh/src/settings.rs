//! Host-facing description of one mesh to generate.

use crate::constants::{DEFAULT_BATCH_SIZE, MIN_RESOLUTION};
use crate::error::MeshError;
use crate::generators::{MeshCounts, Topology};
use crate::stream::StreamLayout;

/// Which mesh to build, into which layout, and how to batch the work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeshSettings {
  pub topology: Topology,

  pub layout: StreamLayout,

  /// Subdivisions per topology unit. Must be at least 1.
  pub resolution: u32,

  /// Minimum number of consecutive work items per rayon task. 0 acts as 1.
  pub batch_size: usize,
}

impl Default for MeshSettings {
  fn default() -> Self {
    Self {
      topology: Topology::default(),
      layout: StreamLayout::default(),
      resolution: MIN_RESOLUTION,
      batch_size: DEFAULT_BATCH_SIZE,
    }
  }
}

impl MeshSettings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_topology(mut self, topology: Topology) -> Self {
    self.topology = topology;
    self
  }

  pub fn with_layout(mut self, layout: StreamLayout) -> Self {
    self.layout = layout;
    self
  }

  pub fn with_resolution(mut self, resolution: u32) -> Self {
    self.resolution = resolution;
    self
  }

  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  /// Batch size as dispatch will use it.
  pub fn effective_batch_size(&self) -> usize {
    self.batch_size.max(DEFAULT_BATCH_SIZE)
  }

  /// Sizing facts for these settings, or the reason they cannot be built.
  pub fn validate(&self) -> Result<MeshCounts, MeshError> {
    let result = self.topology.validate(self.resolution);
    #[cfg(feature = "tracing")]
    {
      if let Err(err) = &result {
        tracing::warn!(
          topology = self.topology.name(),
          layout = self.layout.name(),
          resolution = self.resolution,
          "rejected mesh settings: {}",
          err
        );
      }
    }
    result
  }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;
