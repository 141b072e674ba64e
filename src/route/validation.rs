use bevy::prelude::*;

use super::types::{Route, RouteEntry};
use crate::error::ConnectionRejected;
use crate::waypoint::{PositionResolver, RouteAnchors};

/// Obstruction test for a straight segment, supplied by the host application
pub trait SegmentCollisionGate: Send + Sync {
    fn is_blocked(&self, from: Vec3, to: Vec3, clearance: f32) -> bool;
}

impl<F> SegmentCollisionGate for F
where
    F: Fn(Vec3, Vec3, f32) -> bool + Send + Sync,
{
    fn is_blocked(&self, from: Vec3, to: Vec3, clearance: f32) -> bool {
        self(from, to, clearance)
    }
}

/// Collision gate consulted by the editing layer
#[derive(Resource)]
pub struct CollisionGate(pub Box<dyn SegmentCollisionGate>);

impl CollisionGate {
    pub fn new(gate: impl SegmentCollisionGate + 'static) -> Self {
        Self(Box::new(gate))
    }

    /// Gate that never reports an obstruction
    pub fn open() -> Self {
        Self::new(|_: Vec3, _: Vec3, _: f32| false)
    }
}

impl Default for CollisionGate {
    fn default() -> Self {
        Self::open()
    }
}

/// Check whether `to` may follow `from` in the route.
/// Entry rules only apply when an Entry anchor is configured, Exit rules likewise.
pub fn can_connect(
    from: RouteEntry,
    to: RouteEntry,
    route: &Route,
    anchors: &RouteAnchors,
    resolver: &dyn PositionResolver,
    gate: &dyn SegmentCollisionGate,
    clearance: f32,
) -> Result<(), ConnectionRejected> {
    if anchors.has_entry() {
        if route.is_empty() && from != RouteEntry::Entry {
            return Err(ConnectionRejected::MustStartAtEntry);
        }
        if to == RouteEntry::Entry {
            return Err(ConnectionRejected::CannotTargetEntry);
        }
        // Entry can only open the route, never restart one that lost it
        if from == RouteEntry::Entry && !route.is_empty() && !route.contains(RouteEntry::Entry) {
            return Err(ConnectionRejected::MustStartAtEntry);
        }
    }

    if anchors.has_exit() {
        if from == RouteEntry::Exit {
            return Err(ConnectionRejected::CannotOriginateFromExit);
        }
        if to == RouteEntry::Exit && route.contains(RouteEntry::Exit) {
            return Err(ConnectionRejected::ExitAlreadyUsed);
        }
        // Splicing Exit mid-route, or opening a segment behind it, would continue past Exit
        if to == RouteEntry::Exit && route.contains(from) && route.last() != Some(from) {
            return Err(ConnectionRejected::CannotOriginateFromExit);
        }
        if route.contains(RouteEntry::Exit) && !route.contains(from) {
            return Err(ConnectionRejected::CannotOriginateFromExit);
        }
    }

    // Unreachable behind CannotTargetEntry, kept as the mirror of ExitAlreadyUsed
    if anchors.has_entry() && to == RouteEntry::Entry && route.contains(RouteEntry::Entry) {
        return Err(ConnectionRejected::EntryAlreadyUsed);
    }

    check_segment(from, to, resolver, gate, clearance)
}

/// Collision check of the straight segment between two entries.
/// Entries without a position have no segment to check.
pub fn check_segment(
    from: RouteEntry,
    to: RouteEntry,
    resolver: &dyn PositionResolver,
    gate: &dyn SegmentCollisionGate,
    clearance: f32,
) -> Result<(), ConnectionRejected> {
    if let (Some(a), Some(b)) = (resolver.resolve(from), resolver.resolve(to))
        && gate.is_blocked(a.position, b.position, clearance)
    {
        return Err(ConnectionRejected::SegmentObstructed);
    }
    Ok(())
}
