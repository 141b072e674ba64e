use bevy::prelude::*;

// Route entries and the ordered route
pub mod types;
pub use types::{Route, RouteEntry};

// Connection rules and the collision gate seam
pub mod validation;
pub use validation::{CollisionGate, SegmentCollisionGate, can_connect, check_segment};

// Editing layer (Input Layer)
pub mod editing;
pub use editing::{apply_route_edits, apply_waypoint_edits, connect, merge_gap};

use crate::messages::route::{
    ClearRoute, ConnectWaypoint, MergeRouteGap, RemoveRoutePoint, RemoveWaypoint, RouteChanged,
    RouteEditRejected, SetRecordingPosition,
};
use crate::playback::FlightSettings;
use crate::waypoint::{RouteAnchors, WaypointCatalog};

/// System set for route editing; playback reads the route after it
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct RouteEditSet;

/// Plugin owning the waypoint catalog, the route and its editing messages
pub struct RoutePlugin;

impl Plugin for RoutePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaypointCatalog>()
            .init_resource::<RouteAnchors>()
            .init_resource::<Route>()
            .init_resource::<CollisionGate>()
            .init_resource::<FlightSettings>()
            .register_type::<RouteEntry>();

        app.add_message::<ConnectWaypoint>()
            .add_message::<RemoveRoutePoint>()
            .add_message::<MergeRouteGap>()
            .add_message::<ClearRoute>()
            .add_message::<RemoveWaypoint>()
            .add_message::<SetRecordingPosition>()
            .add_message::<RouteEditRejected>()
            .add_message::<RouteChanged>();

        app.add_systems(
            Update,
            (apply_waypoint_edits, apply_route_edits)
                .chain()
                .in_set(RouteEditSet),
        );
    }
}
