//! Compilation of a route into timed motion primitives
//!
//! A route is first snapshotted into resolved stops, then into motion segments
//! (legs between stops and arrival protocols at waypoints), and finally into a
//! flat list of primitives the choreographer steps through.

use bevy::prelude::*;
use std::f32::consts::TAU;

use super::settings::FlightSettings;
use crate::constants::HEADING_EPSILON;
use crate::error::FlightError;
use crate::messages::playback::FlightEvent;
use crate::route::{Route, RouteEntry};
use crate::waypoint::{
    AnchorPose, CatalogResolver, PositionResolver, RouteAnchors, WaypointBehavior,
    WaypointCatalog, WaypointId,
};

/// Position and orientation of the simulated vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl VehiclePose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }
}

/// Heading that faces along the horizontal projection of `direction`.
/// `None` when the direction is (nearly) vertical.
pub fn heading_towards(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length() < HEADING_EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

/// A resolved route entry captured at play time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStop {
    pub entry: RouteEntry,
    pub pose: AnchorPose,
    /// `None` for the Entry/Exit anchors, which have no arrival protocol
    pub behavior: Option<WaypointBehavior>,
    pub target_speed: Option<f32>,
}

/// One compiled unit of motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSegment {
    Leg {
        from: Vec3,
        to: Vec3,
        reorient: bool,
        speed: f32,
    },
    Arrival {
        waypoint: WaypointId,
        position: Vec3,
        behavior: WaypointBehavior,
        next: Option<Vec3>,
    },
}

/// Smallest timed step of a flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionPrimitive {
    Translate {
        from: Vec3,
        to: Vec3,
        from_heading: Quat,
        to_heading: Quat,
        duration: f32,
    },
    Hold {
        at: Vec3,
        heading: Quat,
        duration: f32,
    },
    Turn {
        at: Vec3,
        from: Quat,
        to: Quat,
        duration: f32,
    },
    /// Full turn about the vertical axis, ending on the starting heading
    Spin {
        at: Vec3,
        heading: Quat,
        duration: f32,
    },
    /// Zero-length step that only emits a lifecycle event
    Signal(FlightEvent),
}

impl MotionPrimitive {
    /// Straight leg at `speed`. With `reorient` the heading turns to face the
    /// horizontal travel direction; otherwise it is held for the whole leg.
    pub fn fly_to(from: Vec3, to: Vec3, heading: Quat, reorient: bool, speed: f32) -> Self {
        let duration = if speed > 0.0 {
            from.distance(to) / speed
        } else {
            0.0
        };
        let to_heading = if reorient {
            heading_towards(to - from).unwrap_or(heading)
        } else {
            heading
        };
        MotionPrimitive::Translate {
            from,
            to,
            from_heading: heading,
            to_heading,
            duration,
        }
    }

    pub fn duration(&self) -> f32 {
        match self {
            MotionPrimitive::Translate { duration, .. }
            | MotionPrimitive::Hold { duration, .. }
            | MotionPrimitive::Turn { duration, .. }
            | MotionPrimitive::Spin { duration, .. } => *duration,
            MotionPrimitive::Signal(_) => 0.0,
        }
    }

    /// Pose `elapsed` seconds into this primitive. Signals have no pose.
    pub fn sample(&self, elapsed: f32) -> Option<VehiclePose> {
        let progress = if self.duration() > 0.0 {
            (elapsed / self.duration()).clamp(0.0, 1.0)
        } else {
            1.0
        };

        match *self {
            MotionPrimitive::Translate {
                from,
                to,
                from_heading,
                to_heading,
                ..
            } => Some(VehiclePose::new(
                from.lerp(to, progress),
                from_heading.slerp(to_heading, progress),
            )),
            MotionPrimitive::Hold { at, heading, .. } => Some(VehiclePose::new(at, heading)),
            MotionPrimitive::Turn { at, from, to, .. } => {
                Some(VehiclePose::new(at, from.slerp(to, progress)))
            }
            MotionPrimitive::Spin { at, heading, .. } => Some(VehiclePose::new(
                at,
                heading * Quat::from_rotation_y(TAU * progress),
            )),
            MotionPrimitive::Signal(_) => None,
        }
    }
}

/// Immutable snapshot of a flight
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub stops: Vec<FlightStop>,
    pub segments: Vec<MotionSegment>,
    pub primitives: Vec<MotionPrimitive>,
    pub start: VehiclePose,
}

impl FlightPlan {
    pub fn total_duration(&self) -> f32 {
        self.primitives.iter().map(MotionPrimitive::duration).sum()
    }
}

/// Resolve the route into stops. The flight never crosses a gap marker: it covers
/// the first segment holding a resolvable entry and ends at the gap after it.
/// Unresolved entries are dropped with a warning, back-to-back repeats collapse.
pub fn snapshot_stops(
    route: &Route,
    catalog: &WaypointCatalog,
    anchors: &RouteAnchors,
) -> Vec<FlightStop> {
    let resolver = CatalogResolver::new(catalog, anchors);
    let mut stops: Vec<FlightStop> = Vec::with_capacity(route.len());

    for entry in route.entries().iter().copied() {
        if entry.is_gap() {
            if stops.is_empty() {
                continue;
            }
            debug!("Flight ends at the gap after {}", stops.len());
            break;
        }
        let Some(pose) = resolver.resolve(entry) else {
            warn!("Dropping route entry {} with no position", entry);
            continue;
        };
        if stops.last().is_some_and(|stop| stop.entry == entry) {
            continue;
        }
        let waypoint = entry.waypoint().and_then(|id| catalog.get(id));
        stops.push(FlightStop {
            entry,
            pose,
            behavior: waypoint.map(|w| w.behavior),
            target_speed: waypoint.and_then(|w| w.target_speed),
        });
    }
    stops
}

/// Compile the current route into a flight plan
pub fn compile_flight_plan(
    route: &Route,
    catalog: &WaypointCatalog,
    anchors: &RouteAnchors,
    settings: &FlightSettings,
) -> Result<FlightPlan, FlightError> {
    let stops = snapshot_stops(route, catalog, anchors);
    if stops.len() < 2 {
        return Err(FlightError::InsufficientRoute {
            resolved: stops.len(),
        });
    }

    let segments = plan_segments(&stops, settings);
    let start = VehiclePose::new(stops[0].pose.position, stops[0].pose.orientation());
    let primitives = expand_segments(&segments, start.orientation, settings);

    Ok(FlightPlan {
        stops,
        segments,
        primitives,
        start,
    })
}

fn plan_segments(stops: &[FlightStop], settings: &FlightSettings) -> Vec<MotionSegment> {
    let mut segments = Vec::with_capacity(stops.len() * 2);

    for (index, stop) in stops.iter().enumerate() {
        if index > 0 {
            segments.push(MotionSegment::Leg {
                from: stops[index - 1].pose.position,
                to: stop.pose.position,
                reorient: false,
                speed: settings.leg_speed(stop.target_speed),
            });
        }

        if let (Some(behavior), Some(waypoint)) = (stop.behavior, stop.entry.waypoint()) {
            segments.push(MotionSegment::Arrival {
                waypoint,
                position: stop.pose.position,
                behavior,
                next: stops.get(index + 1).map(|next| next.pose.position),
            });
        }
    }
    segments
}

fn expand_segments(
    segments: &[MotionSegment],
    start_heading: Quat,
    settings: &FlightSettings,
) -> Vec<MotionPrimitive> {
    let mut primitives = Vec::new();
    let mut heading = start_heading;

    for segment in segments {
        match *segment {
            MotionSegment::Leg {
                from,
                to,
                reorient,
                speed,
            } => {
                let leg = MotionPrimitive::fly_to(from, to, heading, reorient, speed);
                if let MotionPrimitive::Translate { to_heading, .. } = leg {
                    heading = to_heading;
                }
                primitives.push(leg);
            }
            MotionSegment::Arrival {
                waypoint,
                position,
                behavior,
                next,
            } => {
                primitives.push(MotionPrimitive::Signal(FlightEvent::WaypointArrived(
                    waypoint,
                )));
                heading = expand_arrival(
                    &mut primitives,
                    position,
                    behavior,
                    next,
                    heading,
                    settings,
                );
            }
        }
    }
    primitives
}

// Returns the heading the vehicle leaves the waypoint with
fn expand_arrival(
    primitives: &mut Vec<MotionPrimitive>,
    at: Vec3,
    behavior: WaypointBehavior,
    next: Option<Vec3>,
    heading: Quat,
    settings: &FlightSettings,
) -> Quat {
    match behavior {
        WaypointBehavior::StopTurnGo { hold_time } => {
            let Some(next) = next else {
                primitives.push(MotionPrimitive::Hold {
                    at,
                    heading,
                    duration: hold_time,
                });
                return heading;
            };
            primitives.push(MotionPrimitive::Hold {
                at,
                heading,
                duration: hold_time / 2.0,
            });
            push_turn_towards(primitives, at, next, heading, hold_time / 2.0)
        }
        WaypointBehavior::Record360 {
            hold_time,
            recording_position,
        } => {
            let recording = recording_position.unwrap_or(at);
            let detour = at.distance(recording) > settings.recording_epsilon;

            if detour {
                primitives.push(MotionPrimitive::Hold {
                    at,
                    heading,
                    duration: settings.detour_pause,
                });
                primitives.push(MotionPrimitive::fly_to(
                    at,
                    recording,
                    heading,
                    false,
                    settings.detour_speed,
                ));
                primitives.push(MotionPrimitive::Hold {
                    at: recording,
                    heading,
                    duration: settings.detour_pause,
                });
            }

            primitives.push(MotionPrimitive::Signal(FlightEvent::RecordingStarted));
            primitives.push(MotionPrimitive::Spin {
                at: recording,
                heading,
                duration: settings.rotation_360_duration,
            });
            primitives.push(MotionPrimitive::Signal(FlightEvent::RecordingEnded));

            if detour {
                primitives.push(MotionPrimitive::Hold {
                    at: recording,
                    heading,
                    duration: settings.detour_pause,
                });
                primitives.push(MotionPrimitive::fly_to(
                    recording,
                    at,
                    heading,
                    false,
                    settings.detour_speed,
                ));
            }

            match next {
                Some(next) => push_turn_towards(primitives, at, next, heading, hold_time / 2.0),
                None => heading,
            }
        }
    }
}

fn push_turn_towards(
    primitives: &mut Vec<MotionPrimitive>,
    at: Vec3,
    next: Vec3,
    heading: Quat,
    duration: f32,
) -> Quat {
    let target = heading_towards(next - at).unwrap_or(heading);
    primitives.push(MotionPrimitive::Turn {
        at,
        from: heading,
        to: target,
        duration,
    });
    target
}
