use pathways_dashboard_core::{
    reduce, Dashboard, DashboardAction, DashboardConfig, DashboardError, DashboardState,
    Instruction,
};
use pathways_map_core::{LegKind, MapConfig, Path, PathAnimator};
use pathways_test_fixtures as fixtures;

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "expected {b}, got {a}");
}

fn route() -> Path {
    MapConfig::default().route_path().unwrap()
}

fn apply(state: DashboardState, actions: &[DashboardAction], path: &Path) -> DashboardState {
    let cfg = DashboardConfig::default();
    actions
        .iter()
        .fold(state, |s, a| reduce(s, *a, path, &cfg))
}

#[test]
fn initial_state_counts_down_to_the_door() {
    let path = route();
    let state = DashboardState::initial(&path, &DashboardConfig::default());
    assert_eq!(state.segment_index, 0);
    assert_eq!(state.status, "En route");
    // Segments 0..=6 before the hand-over.
    assert_eq!(state.eta_ms, Some(7450));
    assert_eq!(state.eta_text(), "0:07");
    assert_eq!(state.window_text(), "20:00");
    assert_eq!(state.feed, vec!["Head east along the north road"]);
    assert_eq!(state.cost_text(), "$0.00");
}

#[test]
fn cost_accrues_only_while_driving() {
    let path = route();
    let state = DashboardState::initial(&path, &DashboardConfig::default());
    let state = apply(
        state,
        &[DashboardAction::ClockAdvanced { elapsed_ms: 750.0 }],
        &path,
    );
    approx(state.cost, 0.85 * 750.0 / 60_000.0, 1e-12);
    assert_eq!(state.eta_ms, Some(6700));
    assert_eq!(state.window_remaining_ms, (20 * 60_000 - 750) as f64);

    let waiting = apply(
        state.clone(),
        &[
            DashboardAction::SegmentEntered { index: 2 },
            DashboardAction::ClockAdvanced { elapsed_ms: 500.0 },
        ],
        &path,
    );
    assert_eq!(waiting.status, "Waiting");
    assert_eq!(waiting.cost, state.cost);
    assert_eq!(waiting.window_remaining_ms, (20 * 60_000 - 1250) as f64);
}

#[test]
fn feed_is_newest_first_and_bounded() {
    let path = route();
    let actions: Vec<_> = [2, 3, 5, 6, 7]
        .into_iter()
        .map(|index| DashboardAction::SegmentEntered { index })
        .collect();
    let state = apply(
        DashboardState::initial(&path, &DashboardConfig::default()),
        &actions,
        &path,
    );
    assert_eq!(state.feed.len(), 5);
    assert_eq!(state.feed[0], "Hand over package: Large and Bulky");
    assert_eq!(state.feed[4], "Hold for the loading bay gate");
    assert_eq!(state.status, "Delivering package");
    assert_eq!(state.eta_ms, Some(0));
}

#[test]
fn leaving_the_door_completes_a_delivery() {
    let path = route();
    let cfg = DashboardConfig::default();
    let mut state = DashboardState::initial(&path, &cfg);
    state = reduce(state, DashboardAction::SegmentEntered { index: 7 }, &path, &cfg);
    state = reduce(
        state,
        DashboardAction::ClockAdvanced { elapsed_ms: 60_000.0 },
        &path,
        &cfg,
    );
    assert_eq!(state.deliveries_completed, 0);
    state = reduce(state, DashboardAction::SegmentEntered { index: 8 }, &path, &cfg);
    assert_eq!(state.deliveries_completed, 1);
    assert_eq!(state.window_remaining_ms, cfg.delivery_window_ms as f64);
    assert_eq!(state.leg, LegKind::Walk);
    // Next hand-over is a full loop away.
    assert_eq!(state.eta_ms, Some(path.cycle_duration_ms() - 1500));
}

#[test]
fn window_saturates_and_flags_lateness() {
    let path = route();
    let state = apply(
        DashboardState::initial(&path, &DashboardConfig::default()),
        &[DashboardAction::ClockAdvanced {
            elapsed_ms: 5_000_000.0,
        }],
        &path,
    );
    assert_eq!(state.window_remaining_ms, 0.0);
    assert_eq!(state.status, "Running late");
    // Progress is capped at the end of the segment.
    assert_eq!(state.eta_ms, Some(5950));
}

#[test]
fn bad_input_leaves_state_alone() {
    let path = route();
    let initial = DashboardState::initial(&path, &DashboardConfig::default());
    let state = apply(
        initial.clone(),
        &[
            DashboardAction::SegmentEntered { index: 99 },
            DashboardAction::ClockAdvanced { elapsed_ms: -5.0 },
            DashboardAction::ClockAdvanced {
                elapsed_ms: f64::NAN,
            },
        ],
        &path,
    );
    assert_eq!(state, initial);
}

#[test]
fn driven_by_the_animator_for_one_loop() {
    let path = route();
    let mut anim = PathAnimator::new(path.clone());
    let mut dash = Dashboard::new(path, DashboardConfig::default()).unwrap();

    let mut now = 0.0;
    let mut prev = now;
    while anim.loops_completed() == 0 && now < 30_000.0 {
        let events = anim.tick(now).to_vec();
        dash.observe(now - prev, &events);
        prev = now;
        now += 16.0;
    }
    let state = dash.state();
    assert_eq!(state.segment_index, 0);
    assert_eq!(state.deliveries_completed, 1);
    assert_eq!(state.feed.len(), 5);
    assert_eq!(state.feed[0], "Head east along the north road");
    // Roughly ten seconds of driving at 0.85 per minute.
    assert!(state.cost > 0.14 && state.cost < 0.145, "cost {}", state.cost);
}

#[test]
fn config_is_checked_against_the_path() {
    let path = route();
    let mut cfg = DashboardConfig::default();
    cfg.instructions.push(Instruction::new(13, "off the end"));
    assert_eq!(
        Dashboard::new(path.clone(), cfg).unwrap_err(),
        DashboardError::InstructionOutOfRange {
            segment: 13,
            len: 13
        }
    );

    let cfg = DashboardConfig::from_json_str(r#"{ "feed_capacity": 0 }"#).unwrap();
    assert_eq!(cfg.validate(&path), Err(DashboardError::EmptyFeed));

    let cfg = DashboardConfig::from_json_str(r#"{ "cost_per_minute": -1 }"#).unwrap();
    assert!(matches!(
        cfg.validate(&path),
        Err(DashboardError::InvalidCostRate { .. })
    ));

    assert!(matches!(
        DashboardConfig::from_json_str(r#"{ "feed_capacity": "five" }"#),
        Err(DashboardError::Parse { .. })
    ));
}

#[test]
fn works_on_paths_without_deliveries() {
    let path = Path::from_json_str(&fixtures::paths::json("triangle").unwrap()).unwrap();
    let cfg = DashboardConfig {
        instructions: vec![Instruction::new(1, "Second leg")],
        ..DashboardConfig::default()
    };
    let mut dash = Dashboard::new(path, cfg).unwrap();
    assert!(dash.state().feed.is_empty());
    assert_eq!(dash.state().eta_text(), "--");
    dash.dispatch(DashboardAction::SegmentEntered { index: 1 });
    assert_eq!(dash.state().feed, vec!["Second leg"]);
    dash.reset();
    assert!(dash.state().feed.is_empty());
}

#[test]
fn window_countdown_does_not_drift_at_sixty_fps() {
    let path = route();
    let cfg = DashboardConfig::default();
    let mut state = DashboardState::initial(&path, &cfg);
    // Just under a minute of 60 fps frames; rounding each to 17 ms would
    // show 18:58.
    for _ in 0..3600 {
        state = reduce(
            state,
            DashboardAction::ClockAdvanced { elapsed_ms: 16.666 },
            &path,
            &cfg,
        );
    }
    approx(
        state.window_remaining_ms,
        cfg.delivery_window_ms as f64 - 3600.0 * 16.666,
        1e-6,
    );
    assert_eq!(state.window_text(), "19:00");
}
