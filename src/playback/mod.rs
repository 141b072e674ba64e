use bevy::prelude::*;

// Flight tuning
pub mod settings;
pub use settings::FlightSettings;

// Route compilation
pub mod segments;
pub use segments::{
    FlightPlan, FlightStop, MotionPrimitive, MotionSegment, VehiclePose, compile_flight_plan,
    heading_towards, snapshot_stops,
};

// State machine
pub mod choreographer;
pub use choreographer::{Choreographer, PlaybackState};

use crate::error::FlightError;
use crate::messages::playback::{FlightEvent, PlaybackCommand, SetSpeedMultiplier};
use crate::route::{Route, RouteEditSet};
use crate::waypoint::{RouteAnchors, WaypointCatalog};

/// Marker for the simulated vehicle entity that mirrors the playback pose
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct FlightVehicle;

/// System set for playback; runs after route edits in the same frame
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct PlaybackSet;

/// Plugin driving the choreographer from the frame clock
pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightSettings>()
            .init_resource::<Choreographer>()
            .register_type::<FlightSettings>()
            .register_type::<FlightVehicle>()
            .register_type::<PlaybackState>();

        app.add_message::<PlaybackCommand>()
            .add_message::<SetSpeedMultiplier>()
            .add_message::<FlightEvent>();

        app.configure_sets(Update, PlaybackSet.after(RouteEditSet));

        app.add_systems(
            Update,
            (
                apply_speed_changes,
                handle_playback_commands,
                advance_playback,
                sync_flight_vehicle,
            )
                .chain()
                .in_set(PlaybackSet),
        );
    }
}

pub fn apply_speed_changes(
    mut requests: MessageReader<SetSpeedMultiplier>,
    mut settings: ResMut<FlightSettings>,
) {
    for request in requests.read() {
        settings.set_speed_multiplier(request.0);
        info!("Speed multiplier set to {:.2}", settings.speed_multiplier());
    }
}

pub fn handle_playback_commands(
    mut commands: MessageReader<PlaybackCommand>,
    mut choreographer: ResMut<Choreographer>,
    route: Res<Route>,
    catalog: Res<WaypointCatalog>,
    anchors: Res<RouteAnchors>,
    settings: Res<FlightSettings>,
) {
    for command in commands.read() {
        let result = match command {
            PlaybackCommand::Play => choreographer.play(&route, &catalog, &anchors, &settings),
            PlaybackCommand::Pause => choreographer.pause(),
            PlaybackCommand::Restart => {
                choreographer.restart(&route, &catalog, &anchors, &settings)
            }
            PlaybackCommand::Stop => choreographer.stop(),
        };

        match result {
            Ok(()) => {}
            Err(FlightError::AlreadyTerminal) => {
                debug!("{:?} ignored: flight not running", command)
            }
            Err(error) => warn!("{:?} failed: {}", command, error),
        }
    }
}

pub fn advance_playback(
    time: Res<Time>,
    mut choreographer: ResMut<Choreographer>,
    mut events: MessageWriter<FlightEvent>,
) {
    choreographer.tick(time.delta_secs());
    for event in choreographer.drain_events() {
        events.write(event);
    }
}

/// Spawn, move and despawn the vehicle entity to follow the choreographer
pub fn sync_flight_vehicle(
    mut commands: Commands,
    choreographer: Res<Choreographer>,
    mut vehicles: Query<(Entity, &mut Transform), With<FlightVehicle>>,
) {
    let pose = choreographer.pose().filter(|_| !choreographer.is_idle());

    let Some(pose) = pose else {
        for (entity, _) in vehicles.iter() {
            commands.entity(entity).despawn();
        }
        return;
    };

    if let Some((_, mut transform)) = vehicles.iter_mut().next() {
        *transform = pose.transform();
    } else {
        commands.spawn((FlightVehicle, Name::new("Flight vehicle"), pose.transform()));
    }
}
