//! Testing utilities for Waypoint Flight
//!
//! Helpers for driving the plugins inside a bare `App` with a hand-advanced
//! clock, so frame timing in tests is exact.

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;
use std::time::Duration;

use crate::LogicPlugins;
use crate::waypoint::{AnchorPose, RouteAnchors};

/// Every message of type `M` seen since the recorder was installed
#[derive(Resource)]
pub struct Recorded<M: Message>(pub Vec<M>);

impl<M: Message> Default for Recorded<M> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

/// App with the flight logic and a manual `Time` resource (no real clock).
/// Entry sits at the origin, Exit at (10, 0, 0).
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(LogicPlugins);
    app.insert_resource(RouteAnchors::new(
        AnchorPose::new(Vec3::ZERO, 0.0),
        AnchorPose::new(Vec3::new(10.0, 0.0, 0.0), 0.0),
    ));
    app
}

/// Start recording messages of type `M` into `Recorded<M>`
pub fn record_messages<M: Message + Clone>(app: &mut App) {
    app.init_resource::<Recorded<M>>()
        .add_systems(PostUpdate, collect_messages::<M>);
}

fn collect_messages<M: Message + Clone>(
    mut reader: MessageReader<M>,
    mut recorded: ResMut<Recorded<M>>,
) {
    recorded.0.extend(reader.read().cloned());
}

pub fn recorded<M: Message + Clone>(app: &App) -> Vec<M> {
    app.world().resource::<Recorded<M>>().0.clone()
}

/// Advance the clock by `seconds` and run one frame
pub fn step(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}
