//! procedural_mesh - Framework/engine independent procedural mesh generation
//!
//! Builds grids and spheres at a chosen resolution by splitting each mesh
//! into independent work items that run in parallel on the rayon pool, all
//! writing straight into preallocated vertex and 16-bit index buffers.
//!
//! # Features
//!
//! - **Grids**: square, shared-vertex square, triangle, pointy and flat
//!   hexagon grids in the XZ plane
//! - **Spheres**: UV, cube (duplicated and shared vertices), octahedron and
//!   icosahedron spheres, with geodesic variants of the last two
//! - **Stream layouts**: interleaved, separate attribute buffers, or
//!   positions only, all `bytemuck`-castable for upload
//! - **Dispatch**: blocking `generate`, background `schedule`, and a
//!   batched `MeshingStage`
//!
//! # Example
//!
//! ```ignore
//! use procedural_mesh::{generate, MeshSettings, StreamLayout, Topology};
//!
//! let settings = MeshSettings::new()
//!   .with_topology(Topology::GeoIcoSphere)
//!   .with_layout(StreamLayout::Multi)
//!   .with_resolution(16);
//!
//! let mesh = generate(&settings)?;
//! println!("Generated {} vertices, {} triangles",
//!     mesh.buffers.vertex_count(), mesh.buffers.triangle_count());
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{DEFAULT_BATCH_SIZE, MAX_VERTEX_COUNT_U16, MIN_RESOLUTION};
pub use error::MeshError;
pub use types::{Bounds, TriangleU16, Vertex};

// Vertex/index buffer layouts
pub mod stream;
pub use stream::{MeshBuffers, MeshSink, MeshStream, MultiStream, PositionStream, SingleStream, StreamLayout};

// One generator per topology
pub mod generators;
pub use generators::{
  CubeSphere, FlatHexagonGrid, GeoIcoSphere, GeoOctaSphere, IcoSphere, MeshCounts, MeshGenerator,
  OctaSphere, PointyHexagonGrid, SharedCubeSphere, SharedSquareGrid, SharedTriangleGrid,
  SquareGrid, Topology, UvSphere,
};

// Parallel dispatch
pub mod job;
pub use job::{MeshJob, MeshJobHandle};

pub mod settings;
pub use settings::MeshSettings;

// Runtime topology/layout selection
pub mod procedural;
pub use procedural::{generate, schedule, GeneratedMesh};

// Task queue for batches of meshes
pub mod task_queue;
pub use task_queue::{MeshCompletion, MeshRequest, MeshingStage};

// Engine-agnostic metrics (feature-gated)
pub mod metrics;
pub use metrics::MeshMetrics;
