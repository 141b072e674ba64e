use bevy::prelude::*;

use crate::waypoint::WaypointId;

/// Playback control requests
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Start from the current route, or resume when paused
    Play,
    Pause,
    /// Stop, then play the current route from the start
    Restart,
    Stop,
}

/// Change the flight speed multiplier. Takes effect on the next compiled flight.
#[derive(Message, Debug, Clone, Copy)]
pub struct SetSpeedMultiplier(pub f32);

/// Lifecycle events of a flight, in the order they happen
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEvent {
    FlightStarted,
    WaypointArrived(WaypointId),
    RecordingStarted,
    RecordingEnded,
    FlightCompleted { success: bool },
}
