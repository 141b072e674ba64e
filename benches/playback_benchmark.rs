use bevy::prelude::*;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use waypoint_flight::playback::{Choreographer, FlightSettings, compile_flight_plan};
use waypoint_flight::route::{Route, RouteEntry};
use waypoint_flight::waypoint::{AnchorPose, RouteAnchors, WaypointBehavior, WaypointCatalog};

/// Zig-zag survey of `count` waypoints, every fourth one a recording stop
fn setup_survey(count: u32) -> (Route, WaypointCatalog, RouteAnchors) {
    let mut catalog = WaypointCatalog::default();
    let mut route = Route::from_entries([RouteEntry::Entry]);

    for i in 0..count {
        let x = i as f32 * 2.0;
        let z = if i % 2 == 0 { -3.0 } else { 3.0 };
        let behavior = if i % 4 == 3 {
            WaypointBehavior::Record360 {
                hold_time: 1.0,
                recording_position: Some(Vec3::new(x, 4.0, z)),
            }
        } else {
            WaypointBehavior::StopTurnGo { hold_time: 1.0 }
        };
        let id = catalog.place(Vec3::new(x, 1.5, z), 0.0, behavior).unwrap();
        route.append(id.into());
    }
    route.append(RouteEntry::Exit);

    let anchors = RouteAnchors::new(
        AnchorPose::new(Vec3::new(-2.0, 0.0, 0.0), 0.0),
        AnchorPose::new(Vec3::new(count as f32 * 2.0, 0.0, 0.0), 90.0),
    );
    (route, catalog, anchors)
}

fn bench_compile_flight_plan(c: &mut Criterion) {
    // 500 waypoints, ~2500 motion primitives
    let (route, catalog, anchors) = setup_survey(500);
    let settings = FlightSettings::default();

    c.bench_function("compile_flight_plan", |b| {
        b.iter(|| compile_flight_plan(black_box(&route), &catalog, &anchors, &settings))
    });
}

fn bench_full_playback(c: &mut Criterion) {
    let (route, catalog, anchors) = setup_survey(100);
    let settings = FlightSettings::default();

    c.bench_function("playback_60hz", |b| {
        b.iter(|| {
            let mut choreographer = Choreographer::default();
            if choreographer
                .play(&route, &catalog, &anchors, &settings)
                .is_err()
            {
                return 0;
            }
            let mut frames = 0;
            while !choreographer.is_idle() {
                choreographer.tick(1.0 / 60.0);
                black_box(choreographer.drain_events());
                frames += 1;
            }
            frames
        })
    });
}

criterion_group!(benches, bench_compile_flight_plan, bench_full_playback);
criterion_main!(benches);
