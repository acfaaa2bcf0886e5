//! Parallel dispatch of a generator into a stream.
//!
//! ```text
//! validate ──► setup ──► execute(0) ┐
//!  (counts)   (alloc)    execute(1) ├─► into_buffers
//!                        ...        │
//!                        execute(n) ┘
//! ```
//!
//! Work items run on the rayon pool in batches of at least `batch_size`
//! consecutive indices. Configuration errors are reported before any buffer
//! is allocated.

use std::marker::PhantomData;

use crossbeam_channel::{Receiver, TryRecvError};
use rayon::prelude::*;

use crate::constants::DEFAULT_BATCH_SIZE;
use crate::error::MeshError;
use crate::generators::MeshGenerator;
use crate::stream::{MeshBuffers, MeshStream};

/// A generator `G` bound to a stream layout `S`.
pub struct MeshJob<G, S> {
  generator: G,
  batch_size: usize,
  _stream: PhantomData<fn() -> S>,
}

impl<G: MeshGenerator, S: MeshStream> MeshJob<G, S> {
  /// Bind a generator at `resolution`. A batch size of 0 is treated as 1.
  pub fn new(resolution: u32, batch_size: usize) -> Self {
    Self {
      generator: G::with_resolution(resolution),
      batch_size: batch_size.max(DEFAULT_BATCH_SIZE),
      _stream: PhantomData,
    }
  }

  pub fn generator(&self) -> &G {
    &self.generator
  }

  pub fn batch_size(&self) -> usize {
    self.batch_size
  }

  /// Generate a mesh and block until every work item has run.
  pub fn run(resolution: u32, batch_size: usize) -> Result<MeshBuffers, MeshError> {
    Self::new(resolution, batch_size).execute()
  }

  /// Validate and allocate now, fill on the rayon pool.
  pub fn schedule(resolution: u32, batch_size: usize) -> Result<MeshJobHandle<MeshBuffers>, MeshError> {
    Self::new(resolution, batch_size).spawn(|buffers| buffers)
  }

  /// Blocking dispatch of this job.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh_job::execute"))]
  pub fn execute(self) -> Result<MeshBuffers, MeshError> {
    let mut stream = self.prepare()?;
    self.fill(&mut stream);
    Ok(stream.into_buffers())
  }

  /// Non-blocking dispatch. `finish` runs on the worker once the buffers
  /// are filled and its result is delivered through the handle. A panic in
  /// the generator or in `finish` surfaces as `MeshError::JobDisconnected`.
  pub fn spawn<T, F>(self, finish: F) -> Result<MeshJobHandle<T>, MeshError>
  where
    T: Send + 'static,
    F: FnOnce(MeshBuffers) -> T + Send + 'static,
  {
    let mut stream = self.prepare()?;
    let (sender, receiver) = crossbeam_channel::bounded(1);
    rayon::spawn(move || {
      let filled = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        self.fill(&mut stream);
        finish(stream.into_buffers())
      }));
      // A panic drops the sender unsent, which the handle reports as
      // `JobDisconnected`. A dropped handle leaves nobody to tell.
      if let Ok(value) = filled {
        let _ = sender.send(value);
      }
    });
    Ok(MeshJobHandle { receiver })
  }

  fn prepare(&self) -> Result<S, MeshError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("setup", topology = G::TOPOLOGY.name(), layout = S::LAYOUT.name()).entered();

    let counts = G::TOPOLOGY.validate(self.generator.resolution())?;
    let mut stream = S::default();
    stream.setup(counts.vertex_count, counts.index_count, counts.bounds)?;
    Ok(stream)
  }

  fn fill(&self, stream: &mut S) {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("execute", job_length = self.generator.job_length()).entered();

    let generator = self.generator;
    // SAFETY: the stream was set up with the generator's own counts, and
    // `MeshGenerator` implementors guarantee every work item writes only
    // in-range slots that no other work item touches.
    let sink = unsafe { stream.sink() };
    (0..generator.job_length())
      .into_par_iter()
      .with_min_len(self.batch_size)
      .for_each(|index| generator.execute(index, &sink));
  }
}

// =============================================================================
// Completion handle
// =============================================================================

/// Receives the result of a scheduled job.
pub struct MeshJobHandle<T> {
  receiver: Receiver<T>,
}

impl<T> MeshJobHandle<T> {
  /// Block until the job completes. Fails with `JobDisconnected` if the
  /// worker panicked.
  pub fn wait(self) -> Result<T, MeshError> {
    self.receiver.recv().map_err(|_| MeshError::JobDisconnected)
  }

  /// Take the result if the job has completed, without blocking.
  pub fn try_wait(&mut self) -> Option<Result<T, MeshError>> {
    match self.receiver.try_recv() {
      Ok(value) => Some(Ok(value)),
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => Some(Err(MeshError::JobDisconnected)),
    }
  }

  /// True once a result is waiting to be taken.
  pub fn is_complete(&self) -> bool {
    !self.receiver.is_empty()
  }
}

#[cfg(test)]
#[path = "job_test.rs"]
mod job_test;
