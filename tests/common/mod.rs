use bevy::prelude::*;
use std::time::Duration;
use waypoint_flight::LogicPlugins;
use waypoint_flight::messages::FlightEvent;
use waypoint_flight::playback::Choreographer;
use waypoint_flight::waypoint::{AnchorPose, RouteAnchors};

/// Flight logic in a bare app whose clock only moves through `step`.
/// Entry sits at the origin facing -Z, Exit at (10, 0, 0).
pub fn create_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(LogicPlugins);
    app.insert_resource(RouteAnchors::new(
        AnchorPose::new(Vec3::ZERO, 0.0),
        AnchorPose::new(Vec3::new(10.0, 0.0, 0.0), 0.0),
    ));
    app
}

/// Helper function to advance the clock and run one frame
/// Every frame must go through here, `Time` keeps the last delta otherwise
pub fn step(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

/// Flight events with the clock reading of the frame that emitted them
#[derive(Resource, Default)]
pub struct FlightLog(pub Vec<(f32, FlightEvent)>);

pub fn record_flight_events(app: &mut App) {
    app.init_resource::<FlightLog>()
        .add_systems(PostUpdate, collect_flight_events);
}

fn collect_flight_events(
    time: Res<Time>,
    mut events: MessageReader<FlightEvent>,
    mut log: ResMut<FlightLog>,
) {
    let now = time.elapsed_secs();
    log.0.extend(events.read().map(|event| (now, *event)));
}

pub fn flight_log(app: &App) -> Vec<(f32, FlightEvent)> {
    app.world().resource::<FlightLog>().0.clone()
}

/// Step in fixed frames until playback goes idle; returns the number of frames run
pub fn run_until_idle(app: &mut App, frame: f32, max_frames: usize) -> usize {
    let mut frames = 0;
    while !app.world().resource::<Choreographer>().is_idle() && frames < max_frames {
        step(app, frame);
        frames += 1;
    }
    frames
}
