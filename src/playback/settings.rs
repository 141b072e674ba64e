use bevy::prelude::*;

use crate::constants::{
    DEFAULT_BASE_SPEED, DEFAULT_CLEARANCE_RADIUS, DETOUR_PAUSE, DETOUR_SPEED,
    MAX_SPEED_MULTIPLIER, MIN_SPEED_MULTIPLIER, RECORDING_EPSILON, ROTATION_360_DURATION,
};

/// Flight tuning, read when a route is compiled and when connections are validated
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct FlightSettings {
    /// Cruise speed between waypoints (m/s)
    pub base_speed: f32,
    speed_multiplier: f32,
    pub clearance_radius: f32,
    /// Duration of the recording spin, independent of the multiplier
    pub rotation_360_duration: f32,
    pub detour_pause: f32,
    pub detour_speed: f32,
    pub recording_epsilon: f32,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            base_speed: DEFAULT_BASE_SPEED,
            speed_multiplier: 1.0,
            clearance_radius: DEFAULT_CLEARANCE_RADIUS,
            rotation_360_duration: ROTATION_360_DURATION,
            detour_pause: DETOUR_PAUSE,
            detour_speed: DETOUR_SPEED,
            recording_epsilon: RECORDING_EPSILON,
        }
    }
}

impl FlightSettings {
    pub fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.set_speed_multiplier(multiplier);
        self
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Clamp into the accepted range; NaN falls back to 1.0
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = if multiplier.is_nan() {
            1.0
        } else {
            multiplier.clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER)
        };
    }

    /// Speed of an inter-waypoint leg; `target_speed` overrides the base speed
    pub fn leg_speed(&self, target_speed: Option<f32>) -> f32 {
        let base = target_speed
            .filter(|speed| *speed > 0.0)
            .unwrap_or(self.base_speed);
        base * self.speed_multiplier
    }
}
