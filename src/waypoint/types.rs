use bevy::prelude::*;
use std::fmt;

use crate::constants::{DEFAULT_ACCEPTANCE_RADIUS, DEFAULT_HOLD_TIME, MAX_WAYPOINT_ID};

/// Caller-assigned, strictly positive waypoint identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct WaypointId(pub u32);

impl WaypointId {
    /// Zero is the gap marker; ids past `MAX_WAYPOINT_ID` have no raw form
    pub fn is_valid(self) -> bool {
        (1..=MAX_WAYPOINT_ID).contains(&self.0)
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the vehicle does when it reaches a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum WaypointBehavior {
    /// Hold for half the hold time, then turn toward the next stop over the other half
    StopTurnGo { hold_time: f32 },
    /// Climb to the recording position, spin a full turn, come back down
    Record360 {
        hold_time: f32,
        /// Secondary position for the recording spin; the anchor itself when unset
        recording_position: Option<Vec3>,
    },
}

impl Default for WaypointBehavior {
    fn default() -> Self {
        WaypointBehavior::StopTurnGo {
            hold_time: DEFAULT_HOLD_TIME,
        }
    }
}

impl WaypointBehavior {
    pub fn record_360() -> Self {
        WaypointBehavior::Record360 {
            hold_time: DEFAULT_HOLD_TIME,
            recording_position: None,
        }
    }

    pub fn hold_time(&self) -> f32 {
        match self {
            WaypointBehavior::StopTurnGo { hold_time } => *hold_time,
            WaypointBehavior::Record360 { hold_time, .. } => *hold_time,
        }
    }
}

/// A placed waypoint. Immutable once placed, except for the recording position.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub acceptance_radius: f32,
    /// Overrides the base speed for the leg flown into this waypoint
    pub target_speed: Option<f32>,
    pub behavior: WaypointBehavior,
}

impl Waypoint {
    pub fn new(
        id: WaypointId,
        position: Vec3,
        yaw_degrees: f32,
        behavior: WaypointBehavior,
    ) -> Self {
        Self {
            id,
            position,
            yaw_degrees,
            acceptance_radius: DEFAULT_ACCEPTANCE_RADIUS,
            target_speed: None,
            behavior,
        }
    }

    pub fn with_target_speed(mut self, speed: f32) -> Self {
        self.target_speed = Some(speed);
        self
    }

    pub fn with_acceptance_radius(mut self, radius: f32) -> Self {
        self.acceptance_radius = radius;
        self
    }

    pub fn pose(&self) -> AnchorPose {
        AnchorPose::new(self.position, self.yaw_degrees)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.position.distance(point) <= self.acceptance_radius
    }
}

/// Resolved position and heading of a route entry
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AnchorPose {
    pub position: Vec3,
    pub yaw_degrees: f32,
}

impl AnchorPose {
    pub fn new(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            yaw_degrees,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw_degrees.to_radians())
    }
}
