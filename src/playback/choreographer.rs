use bevy::prelude::*;

use super::segments::{FlightPlan, MotionPrimitive, VehiclePose, compile_flight_plan};
use super::settings::FlightSettings;
use crate::error::FlightError;
use crate::messages::playback::FlightEvent;
use crate::route::Route;
use crate::waypoint::{RouteAnchors, WaypointCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Playback state machine, advanced by an external time step.
///
/// Holds the current primitive and the time spent inside it. Pausing stops the
/// clock without touching either; stopping drops the plan and the vehicle pose.
#[derive(Resource, Debug, Default)]
pub struct Choreographer {
    state: PlaybackState,
    plan: Option<FlightPlan>,
    cursor: usize,
    elapsed_in_primitive: f32,
    flight_time: f32,
    pose: Option<VehiclePose>,
    outbox: Vec<FlightEvent>,
}

impl Choreographer {
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlaybackState::Idle
    }

    /// Current vehicle pose; the last pose stays readable after a completed flight
    pub fn pose(&self) -> Option<VehiclePose> {
        self.pose
    }

    pub fn plan(&self) -> Option<&FlightPlan> {
        self.plan.as_ref()
    }

    /// Flight time accumulated while playing
    pub fn elapsed(&self) -> f32 {
        self.flight_time
    }

    pub fn total_duration(&self) -> Option<f32> {
        self.plan.as_ref().map(FlightPlan::total_duration)
    }

    /// Resume when paused; otherwise snapshot the route and start flying it
    pub fn play(
        &mut self,
        route: &Route,
        catalog: &WaypointCatalog,
        anchors: &RouteAnchors,
        settings: &FlightSettings,
    ) -> Result<(), FlightError> {
        match self.state {
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                info!("Flight resumed");
                Ok(())
            }
            PlaybackState::Playing => Ok(()),
            PlaybackState::Idle => {
                let plan = compile_flight_plan(route, catalog, anchors, settings)?;
                self.start(plan);
                Ok(())
            }
        }
    }

    /// Start an already compiled plan, replacing any running flight
    pub fn start(&mut self, plan: FlightPlan) {
        if !self.is_idle() {
            let _ = self.stop();
        }
        info!(
            "Flight started: {} stops, {:.2}s",
            plan.stops.len(),
            plan.total_duration()
        );
        self.pose = Some(plan.start);
        self.plan = Some(plan);
        self.cursor = 0;
        self.elapsed_in_primitive = 0.0;
        self.flight_time = 0.0;
        self.state = PlaybackState::Playing;
        self.outbox.push(FlightEvent::FlightStarted);
        // Fire leading signals such as the arrival at a first waypoint
        self.advance(0.0);
    }

    pub fn pause(&mut self) -> Result<(), FlightError> {
        if self.state != PlaybackState::Playing {
            return Err(FlightError::AlreadyTerminal);
        }
        self.state = PlaybackState::Paused;
        info!("Flight paused at {:.2}s", self.flight_time);
        Ok(())
    }

    /// Cancel the flight and discard the vehicle
    pub fn stop(&mut self) -> Result<(), FlightError> {
        if self.is_idle() {
            return Err(FlightError::AlreadyTerminal);
        }
        self.reset();
        self.outbox.push(FlightEvent::FlightCompleted { success: false });
        info!("Flight stopped");
        Ok(())
    }

    pub fn restart(
        &mut self,
        route: &Route,
        catalog: &WaypointCatalog,
        anchors: &RouteAnchors,
        settings: &FlightSettings,
    ) -> Result<(), FlightError> {
        let _ = self.stop();
        self.play(route, catalog, anchors, settings)
    }

    /// Advance the flight by `delta` seconds. No-op unless playing.
    pub fn tick(&mut self, delta: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.flight_time += delta;
        self.advance(delta);
    }

    /// Events produced since the last call
    pub fn drain_events(&mut self) -> Vec<FlightEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn advance(&mut self, delta: f32) {
        let mut budget = delta.max(0.0);

        loop {
            let Some(primitive) = self
                .plan
                .as_ref()
                .and_then(|plan| plan.primitives.get(self.cursor))
                .copied()
            else {
                self.complete();
                return;
            };

            if let MotionPrimitive::Signal(event) = primitive {
                self.outbox.push(event);
                self.cursor += 1;
                continue;
            }

            let remaining = primitive.duration() - self.elapsed_in_primitive;
            if budget < remaining {
                self.elapsed_in_primitive += budget;
                self.pose = primitive.sample(self.elapsed_in_primitive).or(self.pose);
                return;
            }

            // Finish this primitive and carry the leftover into the next one
            budget -= remaining.max(0.0);
            self.pose = primitive.sample(primitive.duration()).or(self.pose);
            self.elapsed_in_primitive = 0.0;
            self.cursor += 1;
            debug!("Primitive {} done", self.cursor);
        }
    }

    fn complete(&mut self) {
        let pose = self.pose;
        self.reset();
        self.pose = pose;
        self.outbox.push(FlightEvent::FlightCompleted { success: true });
        info!("Flight completed after {:.2}s", self.flight_time);
    }

    fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.plan = None;
        self.cursor = 0;
        self.elapsed_in_primitive = 0.0;
        self.pose = None;
    }
}
