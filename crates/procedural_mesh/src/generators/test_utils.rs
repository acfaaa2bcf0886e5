//! Test utilities for generator tests.
//!
//! `RecordingSink` logs every write behind a mutex and flags anything a
//! real stream would silently corrupt: out-of-range indices, slots written
//! twice, slots never written. The `assert_*` helpers check the geometric
//! properties every topology must hold.

use std::collections::HashMap;
use std::sync::Mutex;

use glam::{IVec3, Vec3};
use rayon::prelude::*;

use super::MeshGenerator;
use crate::stream::MeshSink;
use crate::types::{Bounds, Vertex};

/// Distance under which two positions count as the same point.
pub const WELD_TOLERANCE: f32 = 1e-4;

// =============================================================================
// Recording sink
// =============================================================================

pub struct RecordingSink {
  vertices: Mutex<Vec<Option<Vertex>>>,
  triangles: Mutex<Vec<Option<IVec3>>>,
  errors: Mutex<Vec<String>>,
}

impl RecordingSink {
  pub fn new(vertex_count: usize, triangle_count: usize) -> Self {
    Self {
      vertices: Mutex::new(vec![None; vertex_count]),
      triangles: Mutex::new(vec![None; triangle_count]),
      errors: Mutex::new(Vec::new()),
    }
  }

  fn error(&self, message: String) {
    self.errors.lock().unwrap().push(message);
  }

  /// Finished recording, or every problem found.
  pub fn finish(self) -> Result<Recording, Vec<String>> {
    let mut errors = self.errors.into_inner().unwrap();
    let vertices = self.vertices.into_inner().unwrap();
    let triangles = self.triangles.into_inner().unwrap();

    let missing_vertices: Vec<usize> = (0..vertices.len()).filter(|&i| vertices[i].is_none()).collect();
    if !missing_vertices.is_empty() {
      errors.push(format!("vertices never written: {:?}", first_few(&missing_vertices)));
    }
    let missing_triangles: Vec<usize> = (0..triangles.len()).filter(|&i| triangles[i].is_none()).collect();
    if !missing_triangles.is_empty() {
      errors.push(format!("triangles never written: {:?}", first_few(&missing_triangles)));
    }

    if !errors.is_empty() {
      return Err(errors);
    }
    Ok(Recording {
      vertices: vertices.into_iter().flatten().collect(),
      triangles: triangles.into_iter().flatten().collect(),
    })
  }
}

fn first_few(indices: &[usize]) -> &[usize] {
  &indices[..indices.len().min(10)]
}

impl MeshSink for RecordingSink {
  fn set_vertex(&self, index: usize, vertex: Vertex) {
    let mut vertices = self.vertices.lock().unwrap();
    match vertices.get_mut(index) {
      None => {
        let len = vertices.len();
        drop(vertices);
        self.error(format!("vertex {} out of range {}", index, len));
      }
      Some(Some(_)) => {
        drop(vertices);
        self.error(format!("vertex {} written twice", index));
      }
      Some(slot) => *slot = Some(vertex),
    }
  }

  fn set_triangle(&self, index: usize, triangle: IVec3) {
    let mut triangles = self.triangles.lock().unwrap();
    match triangles.get_mut(index) {
      None => {
        let len = triangles.len();
        drop(triangles);
        self.error(format!("triangle {} out of range {}", index, len));
      }
      Some(Some(_)) => {
        drop(triangles);
        self.error(format!("triangle {} written twice", index));
      }
      Some(slot) => *slot = Some(triangle),
    }
  }
}

/// Everything a generator wrote, in slot order.
pub struct Recording {
  pub vertices: Vec<Vertex>,
  pub triangles: Vec<IVec3>,
}

impl Recording {
  pub fn positions(&self) -> Vec<Vec3> {
    self.vertices.iter().map(|v| v.position).collect()
  }

  fn corners(&self, triangle: IVec3) -> [Vec3; 3] {
    [
      self.vertices[triangle.x as usize].position,
      self.vertices[triangle.y as usize].position,
      self.vertices[triangle.z as usize].position,
    ]
  }
}

/// Run every work item of `generator` in parallel and collect the writes.
///
/// Panics with the list of problems if any slot is out of range, written
/// twice or never written.
pub fn record<G: MeshGenerator>(generator: &G) -> Recording {
  let sink = RecordingSink::new(generator.vertex_count(), generator.index_count() / 3);
  (0..generator.job_length())
    .into_par_iter()
    .for_each(|index| generator.execute(index, &sink));
  finish_or_panic::<G>(generator, sink)
}

/// Same as `record`, executing work items one by one from last to first.
pub fn record_reversed<G: MeshGenerator>(generator: &G) -> Recording {
  let sink = RecordingSink::new(generator.vertex_count(), generator.index_count() / 3);
  for index in (0..generator.job_length()).rev() {
    generator.execute(index, &sink);
  }
  finish_or_panic::<G>(generator, sink)
}

fn finish_or_panic<G: MeshGenerator>(generator: &G, sink: RecordingSink) -> Recording {
  match sink.finish() {
    Ok(recording) => recording,
    Err(errors) => panic!(
      "{} at resolution {}: {:#?}",
      G::TOPOLOGY,
      generator.resolution(),
      &errors[..errors.len().min(10)]
    ),
  }
}

// =============================================================================
// Property checks
// =============================================================================

pub fn assert_indices_valid(recording: &Recording) {
  let count = recording.vertices.len() as i32;
  for (slot, triangle) in recording.triangles.iter().enumerate() {
    for index in triangle.to_array() {
      assert!(
        (0..count).contains(&index),
        "triangle {} {:?} references vertex outside 0..{}",
        slot,
        triangle,
        count
      );
    }
  }
}

pub fn assert_within_bounds(recording: &Recording, bounds: &Bounds) {
  for (i, vertex) in recording.vertices.iter().enumerate() {
    assert!(
      bounds.contains(vertex.position, WELD_TOLERANCE),
      "vertex {} at {:?} outside {:?}",
      i,
      vertex.position,
      bounds
    );
  }
}

/// Vertex extents reach the declared bounds on every axis.
pub fn assert_bounds_tight(recording: &Recording, bounds: &Bounds) {
  let mut actual = Bounds::empty();
  for vertex in &recording.vertices {
    actual.encapsulate(vertex.position);
  }
  assert!(
    (actual.min - bounds.min).abs().max_element() < WELD_TOLERANCE
      && (actual.max - bounds.max).abs().max_element() < WELD_TOLERANCE,
    "vertex extents {:?} differ from declared {:?}",
    actual,
    bounds
  );
}

pub fn assert_unit_radius(recording: &Recording) {
  for (i, vertex) in recording.vertices.iter().enumerate() {
    let length = vertex.position.length();
    assert!(
      (length - 1.0).abs() < 1e-4,
      "vertex {} at {:?} has radius {}",
      i,
      vertex.position,
      length
    );
  }
}

pub fn assert_unit_normals(recording: &Recording) {
  for (i, vertex) in recording.vertices.iter().enumerate() {
    let length = vertex.normal.length();
    assert!(
      (length - 1.0).abs() < 1e-3,
      "vertex {} normal {:?} has length {}",
      i,
      vertex.normal,
      length
    );
  }
}

/// Every triangle of a flat grid faces +Y.
pub fn assert_faces_up(recording: &Recording) {
  for (slot, triangle) in recording.triangles.iter().enumerate() {
    let [a, b, c] = recording.corners(*triangle);
    let normal = (b - a).cross(c - a);
    assert!(normal.y > 0.0, "triangle {} {:?} faces {:?}", slot, triangle, normal);
  }
}

/// Every non-degenerate triangle of a sphere faces away from the center.
pub fn assert_faces_outward(recording: &Recording) {
  for (slot, triangle) in recording.triangles.iter().enumerate() {
    let [a, b, c] = recording.corners(*triangle);
    let normal = (b - a).cross(c - a);
    if normal.length() < 1e-9 {
      continue;
    }
    let centroid = (a + b + c) / 3.0;
    assert!(
      normal.dot(centroid) > 0.0,
      "triangle {} {:?} faces inward",
      slot,
      triangle
    );
  }
}

/// Map every vertex to the first vertex within `tolerance` of it.
///
/// Returns the mapping and the number of distinct points.
pub fn weld(positions: &[Vec3], tolerance: f32) -> (Vec<usize>, usize) {
  let mut points: Vec<Vec3> = Vec::new();
  let mapping = positions
    .iter()
    .map(|p| match points.iter().position(|q| q.distance(*p) <= tolerance) {
      Some(i) => i,
      None => {
        points.push(*p);
        points.len() - 1
      }
    })
    .collect();
  (mapping, points.len())
}

/// After welding coincident positions the surface is closed, every edge is
/// shared by exactly two consistently wound triangles, and the Euler
/// characteristic is 2.
pub fn assert_closed_manifold(recording: &Recording) {
  let (mapping, point_count) = weld(&recording.positions(), WELD_TOLERANCE);

  let mut edges: HashMap<(usize, usize), usize> = HashMap::new();
  let mut faces = 0;
  for triangle in &recording.triangles {
    let [a, b, c] = triangle.to_array().map(|i| mapping[i as usize]);
    if a == b || b == c || c == a {
      continue;
    }
    faces += 1;
    for edge in [(a, b), (b, c), (c, a)] {
      *edges.entry(edge).or_insert(0) += 1;
    }
  }

  let repeated: Vec<_> = edges.iter().filter(|&(_, &n)| n != 1).map(|(e, _)| *e).collect();
  assert!(repeated.is_empty(), "directed edges used twice: {:?}", first_edges(&repeated));

  let open: Vec<_> = edges.keys().filter(|(a, b)| !edges.contains_key(&(*b, *a))).copied().collect();
  assert!(open.is_empty(), "edges without a twin: {:?}", first_edges(&open));

  let euler = point_count as i64 - (edges.len() / 2) as i64 + faces as i64;
  assert_eq!(euler, 2, "V {} E {} F {}", point_count, edges.len() / 2, faces);
}

fn first_edges(edges: &[(usize, usize)]) -> &[(usize, usize)] {
  &edges[..edges.len().min(5)]
}

/// No two vertices share a position.
pub fn assert_no_duplicate_positions(recording: &Recording) {
  let (_, point_count) = weld(&recording.positions(), WELD_TOLERANCE);
  assert_eq!(point_count, recording.vertices.len(), "duplicated vertex positions");
}

/// Largest distance between any two vertices.
pub fn max_pairwise_distance(recording: &Recording) -> f32 {
  let positions = recording.positions();
  let mut max = 0.0f32;
  for (i, a) in positions.iter().enumerate() {
    for b in &positions[i + 1..] {
      max = max.max(a.distance(*b));
    }
  }
  max
}
