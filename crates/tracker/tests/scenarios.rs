use std::time::{Duration, Instant};

use model::{path_length_km, Coordinate, LogEntry};
use tracker::{
    animation::AnimationPhase,
    drawing::{DrawingMode, DrawingSession, PointOutcome},
    map::{MapCall, RecordingMap},
    storage::MemoryStore,
    AppController, AppEvent, EntryForm, TrackerConfig,
};
use utility::id::Id;

type App = AppController<RecordingMap, MemoryStore>;

fn c(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new_unchecked(latitude, longitude)
}

fn route(app: &mut App, points: &[Coordinate]) -> Id<LogEntry> {
    app.start_route().unwrap();
    for point in points {
        app.on_map_click(*point).unwrap();
    }
    app.on_map_double_click().unwrap();
    match app.submit_form(EntryForm::default()).unwrap() {
        AppEvent::EntryAdded(id) => id,
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn live_distance_matches_full_recomputation() {
    for len in 2..24 {
        let mut session = DrawingSession::new();
        session.start(DrawingMode::Route).unwrap();
        session.add_point(c(0.0, 0.0)).unwrap();
        for i in 1..len {
            let i = i as f64;
            let outcome = session
                .add_point(c(0.003 * i, 0.002 * ((i * i) % 7.0)))
                .unwrap();
            assert!(matches!(outcome, PointOutcome::Appended { .. }));
        }
        let expected = path_length_km(session.points());
        assert!(
            (session.live_distance_km() - expected).abs() < 1e-9,
            "{} != {}",
            session.live_distance_km(),
            expected
        );
    }
}

#[test]
fn switching_selection_stops_the_previous_animation_once() {
    let mut app = AppController::new(
        TrackerConfig::default(),
        MemoryStore::new(),
        RecordingMap::new(),
    );
    let a = route(&mut app, &[c(28.6, 77.2), c(28.61, 77.21)]);
    let b = route(&mut app, &[c(28.62, 77.2), c(28.63, 77.22)]);
    app.map_mut().take_calls();

    let now = Instant::now();
    app.select_entry(&a, now).unwrap();
    app.select_entry(&b, now).unwrap();

    let removed = |id: &Id<LogEntry>| {
        app.map()
            .count(|call| *call == MapCall::RemoveOverlay(id.clone()))
    };
    assert_eq!(removed(&a), 1);
    assert_eq!(removed(&b), 0);
    assert_eq!(app.animations().phase(&a), AnimationPhase::None);
    assert_eq!(app.animations().phase(&b), AnimationPhase::Progress);
    assert_eq!(app.selected_id(), Some(&b));
}

#[test]
fn hovering_the_selection_leaves_its_animation_alone() {
    let mut app = AppController::new(
        TrackerConfig::default(),
        MemoryStore::new(),
        RecordingMap::new(),
    );
    let a = route(&mut app, &[c(28.6, 77.2), c(28.61, 77.21)]);
    let t0 = Instant::now();
    app.select_entry(&a, t0).unwrap();
    app.frame(t0 + Duration::from_millis(2500));
    let token = app.animations().token(&a);

    app.hover_entry(&a, t0 + Duration::from_millis(2600)).unwrap();
    app.unhover_entry(&a).unwrap();

    assert_eq!(app.animations().token(&a), token);
    assert_eq!(app.animations().phase(&a), AnimationPhase::Stripes);
    assert_eq!(app.selected_id(), Some(&a));
}

#[test]
fn a_session_survives_a_reload() {
    let config = TrackerConfig::default();
    let mut app = AppController::new(config.clone(), MemoryStore::new(), RecordingMap::new());
    let loop_id = {
        app.start_route().unwrap();
        app.on_map_click(c(0.0, 0.0)).unwrap();
        app.on_map_click(c(0.0, 0.001)).unwrap();
        assert_eq!(
            app.on_map_click(c(0.00002, 0.00002)).unwrap(),
            AppEvent::FormRequested(model::EntryKind::Route)
        );
        match app
            .submit_form(EntryForm {
                title: Some("   ".to_owned()),
                duration_min: Some(3),
                notes: Some("tiny loop".to_owned()),
            })
            .unwrap()
        {
            AppEvent::EntryAdded(id) => id,
            other => panic!("unexpected event {:?}", other),
        }
    };

    let storage = app.storage().clone();
    let reloaded = AppController::new(config, storage, RecordingMap::new());
    let original = app.store().get(&loop_id).unwrap();
    let restored = reloaded.store().get(&loop_id).unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored.title(), model::route::DEFAULT_ROUTE_TITLE);
    assert_eq!(restored.coordinates().len(), 3);
}
