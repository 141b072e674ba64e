use bevy::prelude::*;

use crate::error::FlightError;
use crate::route::RouteEntry;
use crate::waypoint::WaypointId;

/// Request to connect `to` after `from`, validated before it touches the route
#[derive(Message, Debug, Clone, Copy)]
pub struct ConnectWaypoint {
    pub from: RouteEntry,
    pub to: RouteEntry,
}

/// Remove one entry from the route, leaving a gap marker if it was interior
#[derive(Message, Debug, Clone, Copy)]
pub struct RemoveRoutePoint {
    pub entry: RouteEntry,
}

/// Re-join two segments by deleting the first gap marker between them
#[derive(Message, Debug, Clone, Copy)]
pub struct MergeRouteGap {
    pub from: RouteEntry,
    pub to: RouteEntry,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ClearRoute;

/// Destroy a waypoint: drops it from the catalog and every route slot referencing it
#[derive(Message, Debug, Clone, Copy)]
pub struct RemoveWaypoint {
    pub id: WaypointId,
}

/// Set the one-shot recording position of a Record-360 waypoint
#[derive(Message, Debug, Clone, Copy)]
pub struct SetRecordingPosition {
    pub id: WaypointId,
    pub position: Vec3,
}

/// Sent when a connection request was refused. The route is left untouched.
#[derive(Message, Debug, Clone, Copy)]
pub struct RouteEditRejected {
    pub from: RouteEntry,
    pub to: RouteEntry,
    pub error: FlightError,
}

/// Sent after every edit that changed the route
#[derive(Message, Debug, Clone, Copy)]
pub struct RouteChanged;
