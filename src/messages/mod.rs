pub mod playback;
pub mod route;

pub use playback::{FlightEvent, PlaybackCommand, SetSpeedMultiplier};
pub use route::{
    ClearRoute, ConnectWaypoint, MergeRouteGap, RemoveRoutePoint, RemoveWaypoint, RouteChanged,
    RouteEditRejected, SetRecordingPosition,
};
