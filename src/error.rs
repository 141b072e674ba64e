use thiserror::Error;

use crate::route::RouteEntry;
use crate::waypoint::WaypointId;

/// Why the validator refused a connection between two route entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectionRejected {
    #[error("route must start at the entry anchor")]
    MustStartAtEntry,
    #[error("no connection may target the entry anchor")]
    CannotTargetEntry,
    #[error("no connection may originate from the exit anchor")]
    CannotOriginateFromExit,
    #[error("exit anchor is already connected")]
    ExitAlreadyUsed,
    #[error("entry anchor is already connected")]
    EntryAlreadyUsed,
    #[error("segment is obstructed")]
    SegmentObstructed,
}

impl ConnectionRejected {
    pub fn describe(self) -> &'static str {
        match self {
            ConnectionRejected::MustStartAtEntry => "route must start at the entry anchor",
            ConnectionRejected::CannotTargetEntry => "no connection may target the entry anchor",
            ConnectionRejected::CannotOriginateFromExit => {
                "no connection may originate from the exit anchor"
            }
            ConnectionRejected::ExitAlreadyUsed => "exit anchor is already connected",
            ConnectionRejected::EntryAlreadyUsed => "entry anchor is already connected",
            ConnectionRejected::SegmentObstructed => "segment is obstructed",
        }
    }
}

/// Failures surfaced by route editing and playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlightError {
    #[error("topology violation: {reason}")]
    TopologyViolation { reason: ConnectionRejected },
    #[error("route entry {0} does not resolve to a position")]
    UnresolvedEntry(RouteEntry),
    #[error("route has {resolved} resolvable entries, at least 2 are required")]
    InsufficientRoute { resolved: usize },
    #[error("playback is already stopped")]
    AlreadyTerminal,
    #[error("route entry {0} is already part of the route")]
    DuplicateEntry(RouteEntry),
    #[error("route entry {0} is not part of the route")]
    AnchorNotFound(RouteEntry),
}

impl From<ConnectionRejected> for FlightError {
    fn from(reason: ConnectionRejected) -> Self {
        FlightError::TopologyViolation { reason }
    }
}

/// Failures of waypoint catalog updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("waypoint {0} does not exist")]
    UnknownWaypoint(WaypointId),
    #[error("waypoint {0} does not record")]
    NotRecordingWaypoint(WaypointId),
    #[error("recording position of waypoint {0} is already set")]
    RecordingAlreadySet(WaypointId),
    #[error("waypoint id {0} is reserved or out of range")]
    InvalidId(WaypointId),
    #[error("no waypoint ids left")]
    IdsExhausted,
}
