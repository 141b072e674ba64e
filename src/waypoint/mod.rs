// Waypoint data and lookup
pub mod types;
pub use types::{AnchorPose, Waypoint, WaypointBehavior, WaypointId};

// Arena of placed waypoints
pub mod catalog;
pub use catalog::WaypointCatalog;

// Position lookup shared by the validator and the choreographer
pub mod resolver;
pub use resolver::{CatalogResolver, PositionResolver, RouteAnchors};
