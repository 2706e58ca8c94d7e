use pathways_map_core::{AdvancePolicy, GridConfig, LegKind, MapConfig, MapError, MapScene, Point};
use pathways_test_fixtures as fixtures;

#[test]
fn compact_fixture_overrides_everything_it_names() {
    let cfg = MapConfig::from_json_str(&fixtures::maps::json("compact").unwrap()).unwrap();
    assert_eq!(cfg.scale_factor(), 2.0);
    assert_eq!(cfg.rotation_deg, 45.0);
    assert_eq!(cfg.building_offset, Point::ORIGIN);
    assert_eq!(cfg.animator.advance, AdvancePolicy::CatchUp);
    assert_eq!(cfg.route.len(), 4);
    assert_eq!(cfg.route[3].leg, LegKind::Deliver);
    // Unnamed fields keep their defaults.
    assert_eq!(cfg.grid.extent_min, -3.0);
    assert_eq!(cfg.palette.background, "#1a1a2e");
}

#[test]
fn overrides_fixture_keeps_the_default_route() {
    let cfg = MapConfig::from_json_str(&fixtures::maps::json("default_overrides").unwrap()).unwrap();
    assert_eq!(cfg.rotation_deg, 0.0);
    assert_eq!(cfg.palette.vehicle, "#22c55e");
    assert_eq!(cfg.palette.pin, "#ef4444");
    assert_eq!(cfg.route, MapConfig::default().route);
}

#[test]
fn route_path_is_in_render_space() {
    let cfg = MapConfig::from_json_str(r#"{ "rotation_deg": 0 }"#).unwrap();
    let path = cfg.route_path().unwrap();
    // (150, 50) + (-20, 40) = (130, 90), times 2.5.
    assert_eq!(path.waypoints()[0].point, Point::new(325.0, 225.0));
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(matches!(
        MapConfig::from_json_str("{ not json"),
        Err(MapError::Parse { .. })
    ));
    assert_eq!(
        MapConfig::from_json_str(r#"{ "view_box": { "width": 0, "height": 100 } }"#).unwrap_err(),
        MapError::InvalidViewBox {
            width: 0.0,
            height: 100.0
        }
    );
    assert_eq!(
        MapConfig::from_json_str(r#"{ "logical_base_width": 0 }"#).unwrap_err(),
        MapError::InvalidScale {
            value: f64::INFINITY
        }
    );
    assert_eq!(
        MapConfig::from_json_str(r#"{ "route": [ { "point": [0, 0], "durationMs": 5 } ] }"#)
            .unwrap_err(),
        MapError::TooFewWaypoints { count: 1 }
    );
}

#[test]
fn grid_extents_must_be_finite_and_ordered() {
    assert_eq!(
        MapConfig::from_json_str(r#"{ "grid": { "extent_min": 2, "extent_max": 2 } }"#)
            .unwrap_err(),
        MapError::InvalidGridExtent { min: 2.0, max: 2.0 }
    );
    assert_eq!(
        MapConfig::from_json_str(r#"{ "grid": { "extent_min": 4, "extent_max": -3 } }"#)
            .unwrap_err(),
        MapError::InvalidGridExtent {
            min: 4.0,
            max: -3.0
        }
    );
    let mut cfg = MapConfig::default();
    cfg.grid.extent_max = f64::INFINITY;
    assert!(matches!(
        cfg.validate(),
        Err(MapError::InvalidGridExtent { .. })
    ));
}

#[test]
fn oversized_grids_are_rejected_before_building() {
    let limit = GridConfig::MAX_LINES;
    assert_eq!(
        MapConfig::from_json_str(r#"{ "grid": { "extent_max": 1e300 } }"#).unwrap_err(),
        MapError::GridTooDense { limit }
    );
    assert_eq!(
        MapConfig::from_json_str(r#"{ "grid": { "cell_size": 1e-9 } }"#).unwrap_err(),
        MapError::GridTooDense { limit }
    );
    let mut cfg = MapConfig::default();
    cfg.grid.cell_size = 1e-9;
    assert!(MapScene::build(&cfg).is_err());

    // A dense but bounded grid still builds.
    let cfg = MapConfig::from_json_str(r#"{ "grid": { "cell_size": 2 } }"#).unwrap();
    let scene = MapScene::build(&cfg).unwrap();
    // 7000 / 5 + 1 per axis.
    assert_eq!(scene.grid.len(), 2 * 1401);
}
