use bevy::prelude::*;

use super::types::{Route, RouteEntry};
use super::validation::{CollisionGate, SegmentCollisionGate, can_connect, check_segment};
use crate::error::FlightError;
use crate::messages::route::{
    ClearRoute, ConnectWaypoint, MergeRouteGap, RemoveRoutePoint, RemoveWaypoint, RouteChanged,
    RouteEditRejected, SetRecordingPosition,
};
use crate::playback::FlightSettings;
use crate::waypoint::{CatalogResolver, PositionResolver, RouteAnchors, WaypointCatalog};

/// Validate and apply one connection. Every check runs before the route is touched.
///
/// Where `to` lands depends on `from`:
/// - empty route: `from` then `to`
/// - `from` is the last entry: `to` is appended
/// - `from` sits earlier in the route (a resume anchor): `to` is spliced in after it,
///   and the segment from `to` on to the old successor must clear the gate as well
/// - `from` is not in the route: a new segment starts after a gap marker
pub fn connect(
    route: &mut Route,
    from: RouteEntry,
    to: RouteEntry,
    anchors: &RouteAnchors,
    resolver: &dyn PositionResolver,
    gate: &dyn SegmentCollisionGate,
    clearance: f32,
) -> Result<(), FlightError> {
    for entry in [from, to] {
        if resolver.resolve(entry).is_none() {
            return Err(FlightError::UnresolvedEntry(entry));
        }
    }

    can_connect(from, to, route, anchors, resolver, gate, clearance)?;

    if route.contains(to) {
        return Err(FlightError::DuplicateEntry(to));
    }

    if route.is_empty() {
        route.append(from);
        route.append(to);
    } else if route.last() == Some(from) {
        route.append(to);
    } else if route.contains(from) {
        if let Some(next) = route.successor(from).filter(|next| !next.is_gap()) {
            check_segment(to, next, resolver, gate, clearance)?;
        }
        if !route.insert_after(from, to) {
            return Err(FlightError::AnchorNotFound(from));
        }
    } else {
        route.append(RouteEntry::Gap);
        route.append(from);
        route.append(to);
    }
    Ok(())
}

/// Re-join the segments around the first gap between `a` and `b`.
/// Returns `Ok(false)` when there is no such gap; the joined segment must clear the gate.
pub fn merge_gap(
    route: &mut Route,
    a: RouteEntry,
    b: RouteEntry,
    resolver: &dyn PositionResolver,
    gate: &dyn SegmentCollisionGate,
    clearance: f32,
) -> Result<bool, FlightError> {
    let Some((before, after)) = route.first_gap_between(a, b) else {
        return Ok(false);
    };
    check_segment(before, after, resolver, gate, clearance)?;
    Ok(route.remove_first_gap_between(a, b))
}

/// Apply route edit messages (Input Layer).
/// Clears apply first, then connections, removals and merges, each in arrival order.
#[allow(clippy::too_many_arguments)]
pub fn apply_route_edits(
    mut connects: MessageReader<ConnectWaypoint>,
    mut removals: MessageReader<RemoveRoutePoint>,
    mut merges: MessageReader<MergeRouteGap>,
    mut clears: MessageReader<ClearRoute>,
    mut route: ResMut<Route>,
    catalog: Res<WaypointCatalog>,
    anchors: Res<RouteAnchors>,
    gate: Res<CollisionGate>,
    settings: Res<FlightSettings>,
    mut rejected: MessageWriter<RouteEditRejected>,
    mut changed: MessageWriter<RouteChanged>,
) {
    let resolver = CatalogResolver::new(&catalog, &anchors);
    let mut dirty = false;

    if clears.read().count() > 0 && !route.is_empty() {
        route.clear();
        info!("Route cleared");
        dirty = true;
    }

    for request in connects.read() {
        match connect(
            &mut route,
            request.from,
            request.to,
            &anchors,
            &resolver,
            gate.0.as_ref(),
            settings.clearance_radius,
        ) {
            Ok(()) => {
                info!("Connected {} -> {}", request.from, request.to);
                dirty = true;
            }
            Err(error) => {
                warn!(
                    "Rejected connection {} -> {}: {}",
                    request.from, request.to, error
                );
                rejected.write(RouteEditRejected {
                    from: request.from,
                    to: request.to,
                    error,
                });
            }
        }
    }

    for removal in removals.read() {
        if route.remove_point(removal.entry) {
            info!("Removed route point {}", removal.entry);
            dirty = true;
        } else {
            debug!("Route point {} not in route", removal.entry);
        }
    }

    for merge in merges.read() {
        match merge_gap(
            &mut route,
            merge.from,
            merge.to,
            &resolver,
            gate.0.as_ref(),
            settings.clearance_radius,
        ) {
            Ok(true) => {
                info!("Merged segments between {} and {}", merge.from, merge.to);
                dirty = true;
            }
            Ok(false) => debug!("No gap between {} and {}", merge.from, merge.to),
            Err(error) => {
                warn!("Rejected merge {} <-> {}: {}", merge.from, merge.to, error);
                rejected.write(RouteEditRejected {
                    from: merge.from,
                    to: merge.to,
                    error,
                });
            }
        }
    }

    if dirty {
        changed.write(RouteChanged);
    }
}

/// Apply waypoint lifecycle messages against the catalog
pub fn apply_waypoint_edits(
    mut removals: MessageReader<RemoveWaypoint>,
    mut recordings: MessageReader<SetRecordingPosition>,
    mut catalog: ResMut<WaypointCatalog>,
    mut route: ResMut<Route>,
    mut changed: MessageWriter<RouteChanged>,
) {
    for removal in removals.read() {
        if catalog.remove(removal.id).is_none() {
            debug!("Waypoint {} already removed", removal.id);
            continue;
        }
        let entry = RouteEntry::Waypoint(removal.id);
        let mut touched = false;
        while route.remove_point(entry) {
            touched = true;
        }
        info!("Destroyed waypoint {}", removal.id);
        if touched {
            changed.write(RouteChanged);
        }
    }

    for request in recordings.read() {
        if let Err(error) = catalog.set_recording_position(request.id, request.position) {
            warn!("Recording position not set: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_CLEARANCE_RADIUS;
    use crate::error::ConnectionRejected;
    use crate::waypoint::{AnchorPose, WaypointBehavior, WaypointId};

    struct Fixture {
        catalog: WaypointCatalog,
        anchors: RouteAnchors,
        gate: CollisionGate,
        route: Route,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: WaypointCatalog::default(),
                anchors: RouteAnchors::new(
                    AnchorPose::new(Vec3::ZERO, 0.0),
                    AnchorPose::new(Vec3::new(10.0, 0.0, 0.0), 0.0),
                ),
                gate: CollisionGate::open(),
                route: Route::default(),
            }
        }

        fn place(&mut self, x: f32) -> RouteEntry {
            self.catalog
                .place(Vec3::new(x, 0.0, 0.0), 0.0, WaypointBehavior::default()).unwrap()
                .into()
        }

        fn connect(&mut self, from: RouteEntry, to: RouteEntry) -> Result<(), FlightError> {
            let resolver = CatalogResolver::new(&self.catalog, &self.anchors);
            connect(
                &mut self.route,
                from,
                to,
                &self.anchors,
                &resolver,
                self.gate.0.as_ref(),
                DEFAULT_CLEARANCE_RADIUS,
            )
        }
    }

    #[test]
    fn first_connection_seeds_route_with_entry() {
        let mut f = Fixture::new();
        let a = f.place(5.0);

        assert_eq!(f.connect(RouteEntry::Entry, a), Ok(()));
        assert_eq!(f.route.entries(), &[RouteEntry::Entry, a]);
    }

    #[test]
    fn connecting_from_tail_appends() {
        let mut f = Fixture::new();
        let a = f.place(3.0);
        let b = f.place(6.0);

        f.connect(RouteEntry::Entry, a).unwrap();
        f.connect(a, b).unwrap();
        f.connect(b, RouteEntry::Exit).unwrap();

        assert_eq!(f.route.point_ids(), vec![-1, 1, 2, -2]);
        assert!(f.route.is_closed());
    }

    #[test]
    fn connecting_from_resume_anchor_splices() {
        let mut f = Fixture::new();
        let a = f.place(3.0);
        let b = f.place(6.0);
        let c = f.place(4.5);

        f.connect(RouteEntry::Entry, a).unwrap();
        f.connect(a, b).unwrap();
        f.connect(a, c).unwrap();

        assert_eq!(f.route.entries(), &[RouteEntry::Entry, a, c, b]);
    }

    #[test]
    fn connecting_from_outside_route_starts_new_segment() {
        let mut f = Fixture::new();
        let a = f.place(3.0);
        let b = f.place(6.0);
        let c = f.place(8.0);

        f.connect(RouteEntry::Entry, a).unwrap();
        f.connect(b, c).unwrap();

        assert_eq!(
            f.route.entries(),
            &[RouteEntry::Entry, a, RouteEntry::Gap, b, c]
        );
        assert_eq!(f.route.flyable_segments(), vec![(RouteEntry::Entry, a), (b, c)]);
    }

    #[test]
    fn rejected_connection_leaves_route_untouched() {
        let mut f = Fixture::new();
        let a = f.place(3.0);
        f.connect(RouteEntry::Entry, a).unwrap();
        f.connect(a, RouteEntry::Exit).unwrap();
        let before = f.route.clone();

        let b = f.place(6.0);
        assert_eq!(
            f.connect(b, RouteEntry::Exit),
            Err(FlightError::TopologyViolation {
                reason: ConnectionRejected::ExitAlreadyUsed
            })
        );
        assert_eq!(f.connect(RouteEntry::Entry, a), Err(FlightError::DuplicateEntry(a)));
        assert_eq!(
            f.connect(a, RouteEntry::Waypoint(WaypointId(77))),
            Err(FlightError::UnresolvedEntry(RouteEntry::Waypoint(WaypointId(77))))
        );
        assert_eq!(
            f.connect(a, RouteEntry::Gap),
            Err(FlightError::UnresolvedEntry(RouteEntry::Gap))
        );
        assert_eq!(f.route, before);
    }

    #[test]
    fn splice_checks_segment_to_old_successor() {
        let mut f = Fixture::new();
        let a = f.place(3.0);
        let b = f.place(6.0);
        f.connect(RouteEntry::Entry, a).unwrap();
        f.connect(a, b).unwrap();
        let c: RouteEntry = f
            .catalog
            .place(Vec3::new(3.0, 0.0, 8.0), 0.0, WaypointBehavior::default())
            .unwrap()
            .into();
        // Only c -> b crosses the obstacle
        f.gate = CollisionGate::new(|from: Vec3, to: Vec3, _: f32| from.z > 4.0 && to.x > 5.0);
        let before = f.route.clone();

        assert_eq!(
            f.connect(a, c),
            Err(FlightError::TopologyViolation {
                reason: ConnectionRejected::SegmentObstructed
            })
        );
        assert_eq!(f.route, before);
    }

    #[test]
    fn merge_checks_rejoined_segment() {
        let mut f = Fixture::new();
        let a = f.place(3.0);
        let b = f.place(6.0);
        f.route = Route::from_entries([RouteEntry::Entry, a, RouteEntry::Gap, b]);
        f.gate = CollisionGate::new(|from: Vec3, to: Vec3, _: f32| from.x < 4.0 && to.x > 5.0);
        let resolver = CatalogResolver::new(&f.catalog, &f.anchors);

        assert_eq!(
            merge_gap(&mut f.route, a, b, &resolver, f.gate.0.as_ref(), 0.1),
            Err(FlightError::TopologyViolation {
                reason: ConnectionRejected::SegmentObstructed
            })
        );
        assert!(f.route.contains(RouteEntry::Gap));

        let open = CollisionGate::open();
        assert_eq!(merge_gap(&mut f.route, b, a, &resolver, open.0.as_ref(), 0.1), Ok(true));
        assert_eq!(merge_gap(&mut f.route, a, b, &resolver, open.0.as_ref(), 0.1), Ok(false));
        assert_eq!(f.route.entries(), &[RouteEntry::Entry, a, b]);
    }

    #[test]
    fn obstructed_connection_is_refused() {
        let mut f = Fixture::new();
        f.gate = CollisionGate::new(|_: Vec3, to: Vec3, _: f32| to.x > 4.0);
        let near = f.place(3.0);
        let far = f.place(6.0);

        assert_eq!(f.connect(RouteEntry::Entry, near), Ok(()));
        assert_eq!(
            f.connect(near, far),
            Err(FlightError::TopologyViolation {
                reason: ConnectionRejected::SegmentObstructed
            })
        );
        assert_eq!(f.route.len(), 2);
    }
}
