//! Task queue for batches of mesh requests.
//!
//! Following the stage pattern: Enqueue → Tick → Completions
//!
//! Each tick generates every pending request in parallel on the rayon pool.
//! A request with unusable settings completes with its error; the rest of
//! the batch is unaffected.

use rayon::prelude::*;
use web_time::Instant;

use crate::error::MeshError;
use crate::metrics::MeshMetrics;
use crate::procedural::{self, GeneratedMesh};
use crate::settings::MeshSettings;

/// Request to generate one mesh.
#[derive(Clone, Debug)]
pub struct MeshRequest {
  /// Unique identifier for this request
  pub id: u64,
  pub settings: MeshSettings,
}

/// Completed mesh result.
#[derive(Debug)]
pub struct MeshCompletion {
  /// Request ID this completion corresponds to
  pub id: u64,
  pub result: Result<GeneratedMesh, MeshError>,
  /// Time spent on this request in microseconds, including validation
  pub mesh_time_us: u64,
}

/// Meshing stage that processes requests in parallel.
pub struct MeshingStage {
  pending: Vec<MeshRequest>,
  completed: Vec<MeshCompletion>,
  next_id: u64,
  metrics: MeshMetrics,
}

impl Default for MeshingStage {
  fn default() -> Self {
    Self::new()
  }
}

impl MeshingStage {
  pub fn new() -> Self {
    Self {
      pending: Vec::new(),
      completed: Vec::new(),
      next_id: 0,
      metrics: MeshMetrics::new(),
    }
  }

  /// Enqueue a mesh request, returning the assigned ID.
  pub fn enqueue(&mut self, settings: MeshSettings) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    self.pending.push(MeshRequest { id, settings });
    id
  }

  /// Process pending requests in parallel and move completions to output.
  /// Returns the number of requests processed this tick.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "task_queue::tick"))]
  pub fn tick(&mut self) -> usize {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let count = requests.len();

    let completions: Vec<MeshCompletion> = requests
      .into_par_iter()
      .map(|req| {
        let start = Instant::now();
        let result = procedural::generate(&req.settings);
        let mesh_time_us = start.elapsed().as_micros() as u64;
        MeshCompletion {
          id: req.id,
          result,
          mesh_time_us,
        }
      })
      .collect();

    for completion in &completions {
      match &completion.result {
        Ok(mesh) => self.metrics.record_mesh(mesh),
        Err(_) => self.metrics.record_failure(),
      }
    }

    self.completed.extend(completions);
    count
  }

  /// Take all completed meshes, in request order within each tick.
  pub fn drain_completions(&mut self) -> Vec<MeshCompletion> {
    std::mem::take(&mut self.completed)
  }

  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// Number of completed results waiting to be drained.
  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }

  /// Statistics over every mesh this stage has produced.
  pub fn metrics(&self) -> &MeshMetrics {
    &self.metrics
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
