//! Engine-agnostic statistics for generated meshes.
//!
//! Feature-gated and runtime-toggled: without the `metrics` feature every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use procedural_mesh::metrics::{MeshMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Record each finished mesh:
//! metrics.record_mesh(&mesh);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::generators::Topology;
use crate::procedural::GeneratedMesh;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity window of the most recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().copied().min()?;
    let max = self.buffer.iter().copied().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128)
  }
}

/// Cumulative counters and recent timings over every recorded mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshMetrics {
  /// Meshes generated per topology, indexed like [`Topology::ALL`].
  pub meshes_per_topology: [u64; Topology::ALL.len()],
  pub total_meshes: u64,
  /// Requests rejected before any buffer was allocated.
  pub failed_meshes: u64,
  pub total_vertices: u64,
  pub total_indices: u64,
  /// Vertex and index memory handed to the host.
  pub total_bytes: u64,

  /// Rolling window of generation times in microseconds.
  pub mesh_timings: RollingWindow<u64>,
  pub last_mesh_us: u64,
}

impl MeshMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset timings. Counters are cumulative and survive.
  pub fn reset_timings(&mut self) {
    self.mesh_timings.clear();
    self.last_mesh_us = 0;
  }

  pub fn record_mesh(&mut self, mesh: &GeneratedMesh) {
    if !is_enabled() {
      return;
    }
    self.meshes_per_topology[mesh.topology as usize] += 1;
    self.total_meshes += 1;
    self.total_vertices += mesh.buffers.vertex_count() as u64;
    self.total_indices += mesh.buffers.index_count() as u64;
    self.total_bytes += mesh.buffers.byte_size() as u64;
    self.record_mesh_timing(mesh.generation_time_us);
  }

  pub fn record_mesh_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.mesh_timings.push(timing_us);
      self.last_mesh_us = timing_us;
    }
  }

  pub fn record_failure(&mut self) {
    if is_enabled() {
      self.failed_meshes += 1;
    }
  }

  pub fn meshes_for(&self, topology: Topology) -> u64 {
    self.meshes_per_topology[topology as usize]
  }

  pub fn avg_mesh_timing_us(&self) -> f64 {
    self.mesh_timings.average()
  }

  pub fn total_triangles(&self) -> u64 {
    self.total_indices / 3
  }

  pub fn total_mb(&self) -> f64 {
    self.total_bytes as f64 / 1_048_576.0
  }
}
