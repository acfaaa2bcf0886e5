use super::*;
use crate::generators::{GeoIcoSphere, SharedSquareGrid, SquareGrid, Topology, UvSphere};
use crate::stream::{MeshSink, MultiStream, PositionStream, SingleStream, StreamLayout};
use crate::types::Bounds;

/// Square grid sizes, but work item 1 panics before writing anything.
#[derive(Clone, Copy)]
struct PanickingGrid(SquareGrid);

// SAFETY: writes nothing at all.
unsafe impl MeshGenerator for PanickingGrid {
  const TOPOLOGY: Topology = Topology::SquareGrid;

  fn with_resolution(resolution: u32) -> Self {
    Self(SquareGrid::with_resolution(resolution))
  }

  fn resolution(&self) -> u32 {
    self.0.resolution()
  }

  fn vertex_count(&self) -> usize {
    self.0.vertex_count()
  }

  fn index_count(&self) -> usize {
    self.0.index_count()
  }

  fn job_length(&self) -> usize {
    self.0.job_length()
  }

  fn bounds(&self) -> Bounds {
    self.0.bounds()
  }

  fn execute<S: MeshSink>(&self, index: usize, _sink: &S) {
    if index == 1 {
      panic!("work item {} failed", index);
    }
  }
}

#[test]
fn test_run_fills_declared_counts() {
  let buffers = MeshJob::<UvSphere, SingleStream>::run(3, 4).expect("run");
  let counts = Topology::UvSphere.counts(3);
  assert_eq!(buffers.vertex_count(), counts.vertex_count);
  assert_eq!(buffers.index_count(), counts.index_count);
  assert_eq!(buffers.bounds, counts.bounds);
  assert_eq!(buffers.layout(), StreamLayout::Single);
  let max = buffers.indices().iter().copied().max().unwrap_or(0) as usize;
  assert!(max < buffers.vertex_count());
}

#[test]
fn test_repeated_runs_are_identical() {
  let first = MeshJob::<GeoIcoSphere, SingleStream>::run(6, 1).expect("run");
  for batch_size in [1, 3, 64] {
    let again = MeshJob::<GeoIcoSphere, SingleStream>::run(6, batch_size).expect("run");
    assert_eq!(first, again, "batch size {}", batch_size);
  }
}

#[test]
fn test_layouts_agree() {
  let single = MeshJob::<UvSphere, SingleStream>::run(5, 2).expect("run");
  let multi = MeshJob::<UvSphere, MultiStream>::run(5, 2).expect("run");
  let position = MeshJob::<UvSphere, PositionStream>::run(5, 2).expect("run");

  assert_eq!(single.indices(), multi.indices());
  assert_eq!(single.indices(), position.indices());
  assert_eq!(single.positions(), multi.positions());
  assert_eq!(single.positions(), position.positions());
}

#[test]
fn test_zero_batch_size_is_one() {
  let job = MeshJob::<SquareGrid, SingleStream>::new(2, 0);
  assert_eq!(job.batch_size(), 1);
  assert_eq!(job.generator().resolution(), 2);
  assert!(job.execute().is_ok());
}

#[test]
fn test_invalid_resolution_fails_before_dispatch() {
  assert_eq!(
    MeshJob::<SquareGrid, SingleStream>::run(0, 1),
    Err(MeshError::InvalidResolution {
      topology: Topology::SquareGrid,
      resolution: 0,
    })
  );
  let err = MeshJob::<SharedSquareGrid, PositionStream>::run(256, 1).unwrap_err();
  assert!(matches!(err, MeshError::VertexCountOverflow { vertex_count: 66_049, .. }));
}

#[test]
fn test_schedule_errors_synchronously() {
  let result = MeshJob::<UvSphere, MultiStream>::schedule(91, 1);
  assert!(matches!(result, Err(MeshError::VertexCountOverflow { .. })));
}

#[test]
fn test_schedule_matches_run() {
  let handle = MeshJob::<SharedSquareGrid, MultiStream>::schedule(8, 2).expect("schedule");
  let scheduled = handle.wait().expect("wait");
  let direct = MeshJob::<SharedSquareGrid, MultiStream>::run(8, 2).expect("run");
  assert_eq!(scheduled, direct);
}

#[test]
fn test_try_wait_eventually_completes() {
  let mut handle = MeshJob::<SquareGrid, PositionStream>::new(4, 1)
    .spawn(|buffers| buffers.vertex_count())
    .expect("spawn");
  let vertex_count = loop {
    if let Some(result) = handle.try_wait() {
      break result.expect("completed");
    }
    std::thread::yield_now();
  };
  assert_eq!(vertex_count, 64);
  assert!(!handle.is_complete());
}

#[test]
fn test_panicking_generator_reports_disconnected() {
  let handle = MeshJob::<PanickingGrid, SingleStream>::schedule(4, 1).expect("schedule");
  assert_eq!(handle.wait(), Err(MeshError::JobDisconnected));
}

#[test]
fn test_panicking_finish_reports_disconnected() {
  let handle = MeshJob::<SquareGrid, PositionStream>::new(2, 1)
    .spawn(|buffers| -> usize {
      if buffers.vertex_count() > 0 {
        panic!("finish failed");
      }
      0
    })
    .expect("spawn");
  assert_eq!(handle.wait(), Err(MeshError::JobDisconnected));
}
