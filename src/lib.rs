//! Waypoint Flight - operator-authored flight routes and their timed playback
//!
//! The library owns the route model and its validation rules, and a playback
//! choreographer that replays a route as timed motion for a simulated vehicle.
//! Rendering, input and persistence live with the host application and talk to
//! this crate through messages and resources only.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::playback::PlaybackPlugin;
use crate::route::RoutePlugin;

pub mod constants;
pub mod error;
pub mod messages;
pub mod playback;
pub mod route;
pub mod waypoint;

pub use error::{CatalogError, ConnectionRejected, FlightError};

/// Plugin group for route editing and playback (headless-compatible)
pub struct LogicPlugins;

impl PluginGroup for LogicPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(RoutePlugin)
            .add(PlaybackPlugin)
    }
}

/// Headless app ticking at 60 Hz, with logging and the flight logic
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
        LogPlugin::default(),
    ))
    .add_plugins(LogicPlugins);
    app
}

#[cfg(test)]
pub mod test_utils;
