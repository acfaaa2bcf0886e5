//! Runtime entry points: pick the generator and stream from [`MeshSettings`].
//!
//! Every `(Topology, StreamLayout)` pair maps to one monomorphized
//! [`MeshJob`], so the inner loop of each dispatch is static.

use web_time::Instant;

use crate::error::MeshError;
use crate::generators::{
  CubeSphere, FlatHexagonGrid, GeoIcoSphere, GeoOctaSphere, IcoSphere, MeshGenerator, OctaSphere,
  PointyHexagonGrid, SharedCubeSphere, SharedSquareGrid, SharedTriangleGrid, SquareGrid, Topology,
  UvSphere,
};
use crate::job::{MeshJob, MeshJobHandle};
use crate::settings::MeshSettings;
use crate::stream::{MeshBuffers, MeshStream, MultiStream, PositionStream, SingleStream, StreamLayout};

/// A finished mesh together with the settings that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMesh {
  pub topology: Topology,
  pub layout: StreamLayout,
  pub resolution: u32,
  pub buffers: MeshBuffers,
  /// Wall time from the start of setup until the buffers were filled.
  pub generation_time_us: u64,
}

impl GeneratedMesh {
  fn new(settings: &MeshSettings, buffers: MeshBuffers, start: Instant) -> Self {
    Self {
      topology: settings.topology,
      layout: settings.layout,
      resolution: settings.resolution,
      buffers,
      generation_time_us: start.elapsed().as_micros() as u64,
    }
  }
}

/// Generate a mesh on the rayon pool and wait for it.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "procedural::generate"))]
pub fn generate(settings: &MeshSettings) -> Result<GeneratedMesh, MeshError> {
  settings.validate()?;
  let start = Instant::now();
  let buffers = match settings.topology {
    Topology::SquareGrid => run_layout::<SquareGrid>(settings),
    Topology::SharedSquareGrid => run_layout::<SharedSquareGrid>(settings),
    Topology::SharedTriangleGrid => run_layout::<SharedTriangleGrid>(settings),
    Topology::PointyHexagonGrid => run_layout::<PointyHexagonGrid>(settings),
    Topology::FlatHexagonGrid => run_layout::<FlatHexagonGrid>(settings),
    Topology::UvSphere => run_layout::<UvSphere>(settings),
    Topology::CubeSphere => run_layout::<CubeSphere>(settings),
    Topology::SharedCubeSphere => run_layout::<SharedCubeSphere>(settings),
    Topology::OctaSphere => run_layout::<OctaSphere>(settings),
    Topology::GeoOctaSphere => run_layout::<GeoOctaSphere>(settings),
    Topology::IcoSphere => run_layout::<IcoSphere>(settings),
    Topology::GeoIcoSphere => run_layout::<GeoIcoSphere>(settings),
  }?;
  Ok(GeneratedMesh::new(settings, buffers, start))
}

/// Validate and allocate now, generate in the background.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "procedural::schedule"))]
pub fn schedule(settings: &MeshSettings) -> Result<MeshJobHandle<GeneratedMesh>, MeshError> {
  settings.validate()?;
  match settings.topology {
    Topology::SquareGrid => spawn_layout::<SquareGrid>(settings),
    Topology::SharedSquareGrid => spawn_layout::<SharedSquareGrid>(settings),
    Topology::SharedTriangleGrid => spawn_layout::<SharedTriangleGrid>(settings),
    Topology::PointyHexagonGrid => spawn_layout::<PointyHexagonGrid>(settings),
    Topology::FlatHexagonGrid => spawn_layout::<FlatHexagonGrid>(settings),
    Topology::UvSphere => spawn_layout::<UvSphere>(settings),
    Topology::CubeSphere => spawn_layout::<CubeSphere>(settings),
    Topology::SharedCubeSphere => spawn_layout::<SharedCubeSphere>(settings),
    Topology::OctaSphere => spawn_layout::<OctaSphere>(settings),
    Topology::GeoOctaSphere => spawn_layout::<GeoOctaSphere>(settings),
    Topology::IcoSphere => spawn_layout::<IcoSphere>(settings),
    Topology::GeoIcoSphere => spawn_layout::<GeoIcoSphere>(settings),
  }
}

fn run_layout<G: MeshGenerator>(settings: &MeshSettings) -> Result<MeshBuffers, MeshError> {
  match settings.layout {
    StreamLayout::Single => job::<G, SingleStream>(settings).execute(),
    StreamLayout::Multi => job::<G, MultiStream>(settings).execute(),
    StreamLayout::Position => job::<G, PositionStream>(settings).execute(),
  }
}

fn spawn_layout<G: MeshGenerator>(settings: &MeshSettings) -> Result<MeshJobHandle<GeneratedMesh>, MeshError> {
  match settings.layout {
    StreamLayout::Single => spawn::<G, SingleStream>(settings),
    StreamLayout::Multi => spawn::<G, MultiStream>(settings),
    StreamLayout::Position => spawn::<G, PositionStream>(settings),
  }
}

fn job<G: MeshGenerator, S: MeshStream>(settings: &MeshSettings) -> MeshJob<G, S> {
  MeshJob::new(settings.resolution, settings.batch_size)
}

fn spawn<G: MeshGenerator, S: MeshStream>(
  settings: &MeshSettings,
) -> Result<MeshJobHandle<GeneratedMesh>, MeshError> {
  let start = Instant::now();
  let settings = *settings;
  job::<G, S>(&settings).spawn(move |buffers| GeneratedMesh::new(&settings, buffers, start))
}

#[cfg(test)]
#[path = "procedural_test.rs"]
mod procedural_test;
