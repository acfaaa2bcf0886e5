use glam::{IVec3, Vec3};

use super::test_utils::*;
use super::*;
use crate::constants::{MAX_VERTEX_COUNT_U16, RESOLUTION_SEARCH_LIMIT};

const RESOLUTIONS: [u32; 4] = [1, 2, 3, 7];

/// Checks shared by every topology.
fn check_common<G: MeshGenerator>(resolution: u32) -> Recording {
  let generator = G::with_resolution(resolution);
  assert_eq!(generator.resolution(), resolution);
  assert_eq!(generator.index_count() % 3, 0);

  let recording = record(&generator);
  assert_eq!(recording.vertices.len(), generator.vertex_count());
  assert_eq!(recording.triangles.len(), generator.index_count() / 3);
  assert_indices_valid(&recording);
  assert_within_bounds(&recording, &generator.bounds());
  recording
}

fn check_grid<G: MeshGenerator>() {
  for resolution in RESOLUTIONS {
    let recording = check_common::<G>(resolution);
    let bounds = G::with_resolution(resolution).bounds();
    assert_faces_up(&recording);
    assert_bounds_tight(&recording, &bounds);
    assert!(recording.vertices.iter().all(|v| v.normal == Vec3::Y));
    assert!(recording.vertices.iter().all(|v| v.position.y == 0.0));
  }
}

fn check_sphere<G: MeshGenerator>() {
  for resolution in RESOLUTIONS {
    let recording = check_common::<G>(resolution);
    assert_unit_radius(&recording);
    assert_unit_normals(&recording);
    assert_faces_outward(&recording);
    assert_closed_manifold(&recording);

    // Opposite points of a unit sphere are as far apart as the bounds are
    // wide.
    let width = G::with_resolution(resolution).bounds().size().x;
    let reach = max_pairwise_distance(&recording);
    assert!(reach <= width + WELD_TOLERANCE, "{} exceeds {}", reach, width);
    assert!(reach > width - 0.01, "{} falls short of {}", reach, width);
  }
}

/// Writes must not depend on which work item runs first.
fn check_order_independent<G: MeshGenerator>(resolution: u32) {
  let generator = G::with_resolution(resolution);
  let parallel = record(&generator);
  let reversed = record_reversed(&generator);
  assert_eq!(parallel.vertices, reversed.vertices);
  assert_eq!(parallel.triangles, reversed.triangles);
}

/// At the largest 16-bit resolution every slot is still written exactly
/// once with valid indices.
fn check_max_resolution<G: MeshGenerator>() {
  let resolution = G::TOPOLOGY.max_resolution();
  let generator = G::with_resolution(resolution);
  assert!(generator.vertex_count() <= MAX_VERTEX_COUNT_U16);
  let recording = record(&generator);
  assert_indices_valid(&recording);
  assert!(recording
    .triangles
    .iter()
    .all(|t| t.max_element() <= u16::MAX as i32));
}

// =============================================================================
// Grids
// =============================================================================

#[test]
fn test_square_grid() {
  check_grid::<SquareGrid>();
  check_order_independent::<SquareGrid>(4);
}

#[test]
fn test_square_grid_single_quad() {
  let recording = check_common::<SquareGrid>(1);
  assert_eq!(recording.vertices.len(), 4);
  assert_eq!(recording.triangles, vec![IVec3::new(0, 2, 1), IVec3::new(1, 2, 3)]);

  let positions = recording.positions();
  assert_eq!(positions[0], Vec3::new(-0.5, 0.0, -0.5));
  assert_eq!(positions[3], Vec3::new(0.5, 0.0, 0.5));
  assert_eq!(recording.vertices[1].tex_coord0, glam::Vec2::new(1.0, 0.0));
  assert_eq!(recording.vertices[0].tangent, GRID_TANGENT);
}

#[test]
fn test_shared_square_grid() {
  check_grid::<SharedSquareGrid>();
  check_order_independent::<SharedSquareGrid>(5);
  for resolution in RESOLUTIONS {
    assert_no_duplicate_positions(&check_common::<SharedSquareGrid>(resolution));
  }
}

#[test]
fn test_shared_square_grid_first_line_has_no_triangles() {
  let grid = SharedSquareGrid::with_resolution(1);
  assert_eq!(grid.job_length(), 2);
  let recording = record(&grid);
  assert_eq!(recording.triangles, vec![IVec3::new(0, 2, 1), IVec3::new(1, 2, 3)]);
}

#[test]
fn test_shared_triangle_grid() {
  check_grid::<SharedTriangleGrid>();
  check_order_independent::<SharedTriangleGrid>(5);
  for resolution in RESOLUTIONS {
    assert_no_duplicate_positions(&check_common::<SharedTriangleGrid>(resolution));
  }
}

#[test]
fn test_shared_triangle_grid_is_equilateral() {
  let recording = check_common::<SharedTriangleGrid>(4);
  for triangle in &recording.triangles {
    let [a, b, c] = triangle.to_array().map(|i| recording.vertices[i as usize].position);
    let edges = [a.distance(b), b.distance(c), c.distance(a)];
    for edge in edges {
      assert!((edge - 0.25).abs() < 1e-5, "edge {} in {:?}", edge, triangle);
    }
  }
}

#[test]
fn test_pointy_hexagon_grid() {
  check_grid::<PointyHexagonGrid>();
  check_order_independent::<PointyHexagonGrid>(3);
}

#[test]
fn test_flat_hexagon_grid() {
  check_grid::<FlatHexagonGrid>();
  check_order_independent::<FlatHexagonGrid>(3);
}

#[test]
fn test_hexagon_grids_mirror_each_other() {
  let pointy = check_common::<PointyHexagonGrid>(3);
  let flat = check_common::<FlatHexagonGrid>(3);
  let pointy_bounds = PointyHexagonGrid::with_resolution(3).bounds().size();
  let flat_bounds = FlatHexagonGrid::with_resolution(3).bounds().size();
  assert_eq!(pointy_bounds.x, flat_bounds.z);
  assert_eq!(pointy_bounds.z, flat_bounds.x);
  assert_eq!(pointy.triangles, flat.triangles);
}

// =============================================================================
// Spheres
// =============================================================================

#[test]
fn test_uv_sphere() {
  check_sphere::<UvSphere>();
  check_order_independent::<UvSphere>(3);
}

#[test]
fn test_uv_sphere_seam_and_pole_copies() {
  let recording = check_common::<UvSphere>(2);
  // Seam meridian interior: 2R - 1 vertices at x = 0 on the -Z side.
  for vertex in &recording.vertices[..3] {
    assert_eq!(vertex.position.x, 0.0);
    assert!(vertex.position.z < 0.0);
    assert_eq!(vertex.tex_coord0.x, 0.0);
  }
  // Each of the 4R columns carries a south and a north pole copy.
  let south = recording.vertices.iter().filter(|v| v.position == Vec3::NEG_Y).count();
  let north = recording.vertices.iter().filter(|v| v.position == Vec3::Y).count();
  assert_eq!(south, 8);
  assert_eq!(north, 8);
}

#[test]
fn test_cube_sphere() {
  check_sphere::<CubeSphere>();
  check_order_independent::<CubeSphere>(3);
}

#[test]
fn test_cube_sphere_quads_restart_tex_coords() {
  let recording = check_common::<CubeSphere>(3);
  for quad in recording.vertices.chunks(4) {
    assert_eq!(quad[0].tex_coord0, glam::Vec2::ZERO);
    assert_eq!(quad[3].tex_coord0, glam::Vec2::ONE);
  }
}

#[test]
fn test_shared_cube_sphere() {
  check_sphere::<SharedCubeSphere>();
  check_order_independent::<SharedCubeSphere>(3);
  for resolution in RESOLUTIONS {
    assert_no_duplicate_positions(&check_common::<SharedCubeSphere>(resolution));
  }
}

#[test]
fn test_shared_cube_sphere_resolution_one_is_a_cube() {
  let recording = check_common::<SharedCubeSphere>(1);
  assert_eq!(recording.vertices.len(), 8);
  assert_eq!(recording.triangles.len(), 12);

  let corner = (1.0f32 / 3.0).sqrt();
  assert!(recording.vertices[0].position.distance(Vec3::splat(-corner)) < 1e-6);
  assert!(recording.vertices[1].position.distance(Vec3::splat(corner)) < 1e-6);
  for vertex in &recording.vertices {
    let p = vertex.position.abs();
    assert!((p - Vec3::splat(corner)).abs().max_element() < 1e-5);
  }
}

#[test]
fn test_octa_sphere() {
  check_sphere::<OctaSphere>();
  check_order_independent::<OctaSphere>(3);
}

#[test]
fn test_geo_octa_sphere() {
  check_sphere::<GeoOctaSphere>();
  check_order_independent::<GeoOctaSphere>(3);
}

#[test]
fn test_octa_sphere_pole_rings() {
  let recording = check_common::<OctaSphere>(2);
  for i in 0..4 {
    assert_eq!(recording.vertices[i].position, Vec3::NEG_Y);
    assert_eq!(recording.vertices[i + 4].position, Vec3::Y);
    let u = recording.vertices[i].tex_coord0.x;
    assert!((u - (0.125 + 0.25 * i as f32)).abs() < 1e-6);
  }
}

#[test]
fn test_octa_variants_share_topology() {
  for resolution in RESOLUTIONS {
    let flat = check_common::<OctaSphere>(resolution);
    let geo = check_common::<GeoOctaSphere>(resolution);
    assert_eq!(flat.triangles, geo.triangles);
  }
}

#[test]
fn test_ico_sphere() {
  check_sphere::<IcoSphere>();
  check_order_independent::<IcoSphere>(3);
  for resolution in RESOLUTIONS {
    assert_no_duplicate_positions(&check_common::<IcoSphere>(resolution));
  }
}

#[test]
fn test_geo_ico_sphere() {
  check_sphere::<GeoIcoSphere>();
  check_order_independent::<GeoIcoSphere>(3);
  for resolution in RESOLUTIONS {
    assert_no_duplicate_positions(&check_common::<GeoIcoSphere>(resolution));
  }
}

#[test]
fn test_ico_sphere_resolution_one_is_an_icosahedron() {
  let recording = check_common::<GeoIcoSphere>(1);
  assert_eq!(recording.vertices.len(), 12);
  assert_eq!(recording.triangles.len(), 20);

  // All 30 edges have the same length.
  let mut lengths: Vec<f32> = Vec::new();
  for triangle in &recording.triangles {
    let [a, b, c] = triangle.to_array().map(|i| recording.vertices[i as usize].position);
    lengths.extend([a.distance(b), b.distance(c), c.distance(a)]);
  }
  let first = lengths[0];
  assert!(lengths.iter().all(|l| (l - first).abs() < 1e-4), "{:?}", lengths);
}

#[test]
fn test_ico_variants_share_topology() {
  for resolution in RESOLUTIONS {
    let flat = check_common::<IcoSphere>(resolution);
    let geo = check_common::<GeoIcoSphere>(resolution);
    assert_eq!(flat.triangles, geo.triangles);
  }
}

#[test]
fn test_geodesic_spreads_vertices_more_evenly() {
  fn shortest_edge(recording: &Recording) -> f32 {
    recording
      .triangles
      .iter()
      .flat_map(|t| {
        let [a, b, c] = t.to_array().map(|i| recording.vertices[i as usize].position);
        [a.distance(b), b.distance(c), c.distance(a)]
      })
      .filter(|l| *l > WELD_TOLERANCE)
      .fold(f32::INFINITY, f32::min)
  }

  let flat = check_common::<IcoSphere>(7);
  let geo = check_common::<GeoIcoSphere>(7);
  assert!(shortest_edge(&geo) > shortest_edge(&flat));

  let flat = check_common::<OctaSphere>(7);
  let geo = check_common::<GeoOctaSphere>(7);
  assert!(shortest_edge(&geo) > shortest_edge(&flat));
}

// =============================================================================
// Large resolutions
// =============================================================================

#[test]
fn test_max_resolution_fills_u16_range() {
  check_max_resolution::<SquareGrid>();
  check_max_resolution::<SharedSquareGrid>();
  check_max_resolution::<SharedTriangleGrid>();
  check_max_resolution::<PointyHexagonGrid>();
  check_max_resolution::<FlatHexagonGrid>();
  check_max_resolution::<UvSphere>();
  check_max_resolution::<CubeSphere>();
  check_max_resolution::<SharedCubeSphere>();
  check_max_resolution::<OctaSphere>();
  check_max_resolution::<GeoOctaSphere>();
  check_max_resolution::<IcoSphere>();
  check_max_resolution::<GeoIcoSphere>();
}

#[test]
fn test_resolution_fifty_where_it_fits() {
  for topology in Topology::ALL {
    if topology.max_resolution() < 50 {
      continue;
    }
    let counts = topology.validate(50).expect("fits");
    assert_eq!(counts, topology.counts(50));
  }
  check_common::<SharedCubeSphere>(50);
  check_common::<UvSphere>(50);
}

// =============================================================================
// Topology
// =============================================================================

#[test]
fn test_topology_counts_match_generators() {
  assert_eq!(
    Topology::SquareGrid.counts(3),
    SquareGrid::with_resolution(3).counts()
  );
  assert_eq!(Topology::UvSphere.counts(2).vertex_count, 43);
  assert_eq!(Topology::UvSphere.counts(2).index_count, 6 * 8 * 3);
  assert_eq!(Topology::OctaSphere.counts(2).vertex_count, 27);
  assert_eq!(Topology::IcoSphere.counts(2).vertex_count, 42);
  assert_eq!(Topology::SharedCubeSphere.counts(2).vertex_count, 26);
  assert_eq!(Topology::CubeSphere.counts(2).job_length, 12);
  assert_eq!(Topology::PointyHexagonGrid.counts(2).index_count, 72);
}

#[test]
fn test_topology_constants_match_generators() {
  assert_eq!(SquareGrid::TOPOLOGY, Topology::SquareGrid);
  assert_eq!(GeoIcoSphere::TOPOLOGY, Topology::GeoIcoSphere);
  assert_eq!(Topology::ALL.len(), 12);
  assert_eq!(Topology::default(), Topology::SquareGrid);
}

#[test]
fn test_max_resolution() {
  assert_eq!(Topology::SquareGrid.max_resolution(), 128);
  assert_eq!(Topology::SharedSquareGrid.max_resolution(), 255);
  assert_eq!(Topology::SharedTriangleGrid.max_resolution(), 255);
  assert_eq!(Topology::PointyHexagonGrid.max_resolution(), 96);
  assert_eq!(Topology::FlatHexagonGrid.max_resolution(), 96);
  assert_eq!(Topology::UvSphere.max_resolution(), 90);
  assert_eq!(Topology::CubeSphere.max_resolution(), 52);
  assert_eq!(Topology::SharedCubeSphere.max_resolution(), 104);
  assert_eq!(Topology::OctaSphere.max_resolution(), 127);
  assert_eq!(Topology::GeoOctaSphere.max_resolution(), 127);
  assert_eq!(Topology::IcoSphere.max_resolution(), 80);
  assert_eq!(Topology::GeoIcoSphere.max_resolution(), 80);
}

#[test]
fn test_validate_rejects_zero_resolution() {
  assert_eq!(
    Topology::IcoSphere.validate(0),
    Err(MeshError::InvalidResolution {
      topology: Topology::IcoSphere,
      resolution: 0,
    })
  );
}

#[test]
fn test_validate_rejects_overflow() {
  let err = Topology::SquareGrid.validate(129).unwrap_err();
  assert_eq!(
    err,
    MeshError::VertexCountOverflow {
      topology: Topology::SquareGrid,
      resolution: 129,
      vertex_count: 4 * 129 * 129,
      limit: MAX_VERTEX_COUNT_U16,
    }
  );
  assert!(err.is_configuration_error());
  assert!(err.to_string().contains("square_grid"));
}

#[test]
fn test_validate_rejects_resolutions_that_wrap_counts() {
  for topology in Topology::ALL {
    for resolution in [RESOLUTION_SEARCH_LIMIT + 1, 1 << 31, u32::MAX] {
      assert_eq!(
        topology.validate(resolution),
        Err(MeshError::VertexCountOverflow {
          topology,
          resolution,
          vertex_count: usize::MAX,
          limit: MAX_VERTEX_COUNT_U16,
        }),
        "{} at {}",
        topology,
        resolution
      );
    }
    assert!(topology.validate(RESOLUTION_SEARCH_LIMIT).is_err());
  }
}

#[test]
fn test_is_sphere() {
  let spheres = Topology::ALL.iter().filter(|t| t.is_sphere()).count();
  assert_eq!(spheres, 7);
  assert!(!Topology::FlatHexagonGrid.is_sphere());
  assert!(Topology::GeoOctaSphere.is_sphere());
}

// =============================================================================
// Helpers
// =============================================================================

#[test]
fn test_cube_to_sphere_keeps_face_centers_and_corners() {
  assert!((cube_to_sphere(Vec3::X) - Vec3::X).length() < 1e-6);
  let corner = cube_to_sphere(Vec3::ONE);
  assert!((corner.length() - 1.0).abs() < 1e-6);
  assert!((corner.x - corner.y).abs() < 1e-6);
}

#[test]
fn test_sphere_tangent_falls_back_on_poles() {
  assert_eq!(sphere_tangent(Vec3::Y), GRID_TANGENT);
  let t = sphere_tangent(Vec3::X);
  assert!((t - glam::Vec4::new(0.0, 0.0, 1.0, -1.0)).length() < 1e-6);
}

#[test]
fn test_sphere_tex_coord_seam() {
  // -Z sits on the seam, which is pushed to u = 1.
  assert_eq!(sphere_tex_coord(Vec3::NEG_Z).x, 1.0);
  assert!((sphere_tex_coord(Vec3::Z).x - 0.5).abs() < 1e-6);
  assert!((sphere_tex_coord(Vec3::Y).y - 1.0).abs() < 1e-6);
}

#[test]
fn test_rotate_towards() {
  let halfway = rotate_towards(Vec3::X, Vec3::Z, 0.5);
  let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
  assert!((halfway - expected).length() < 1e-6);
  assert_eq!(rotate_towards(Vec3::Y, Vec3::Y, 0.5), Vec3::Y);
}
