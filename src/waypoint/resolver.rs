use bevy::prelude::*;

use super::catalog::WaypointCatalog;
use super::types::AnchorPose;
use crate::route::RouteEntry;

/// Fixed Entry/Exit anchor poses. Either may be left unconfigured.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteAnchors {
    pub entry: Option<AnchorPose>,
    pub exit: Option<AnchorPose>,
}

impl RouteAnchors {
    pub fn new(entry: AnchorPose, exit: AnchorPose) -> Self {
        Self {
            entry: Some(entry),
            exit: Some(exit),
        }
    }

    pub fn has_entry(&self) -> bool {
        self.entry.is_some()
    }

    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }
}

/// Looks up where a route entry sits in the world
pub trait PositionResolver {
    fn resolve(&self, entry: RouteEntry) -> Option<AnchorPose>;
}

/// Resolves waypoints through the catalog and sentinels through the anchors
pub struct CatalogResolver<'a> {
    pub catalog: &'a WaypointCatalog,
    pub anchors: &'a RouteAnchors,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(catalog: &'a WaypointCatalog, anchors: &'a RouteAnchors) -> Self {
        Self { catalog, anchors }
    }
}

impl PositionResolver for CatalogResolver<'_> {
    fn resolve(&self, entry: RouteEntry) -> Option<AnchorPose> {
        match entry {
            RouteEntry::Entry => self.anchors.entry,
            RouteEntry::Exit => self.anchors.exit,
            RouteEntry::Gap => None,
            RouteEntry::Waypoint(id) => self.catalog.get(id).map(|waypoint| waypoint.pose()),
        }
    }
}
