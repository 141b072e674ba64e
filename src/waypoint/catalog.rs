use bevy::prelude::*;
use std::collections::BTreeMap;

use super::types::{Waypoint, WaypointBehavior, WaypointId};
use crate::error::CatalogError;

/// Arena of placed waypoints keyed by identifier
#[derive(Resource, Debug)]
pub struct WaypointCatalog {
    waypoints: BTreeMap<WaypointId, Waypoint>,
    next_id: u32,
}

impl Default for WaypointCatalog {
    fn default() -> Self {
        Self {
            waypoints: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl WaypointCatalog {
    /// Place a new waypoint with the next free identifier
    pub fn place(
        &mut self,
        position: Vec3,
        yaw_degrees: f32,
        behavior: WaypointBehavior,
    ) -> Result<WaypointId, CatalogError> {
        let id = WaypointId(self.next_id);
        if !id.is_valid() {
            return Err(CatalogError::IdsExhausted);
        }
        self.next_id += 1;
        self.waypoints
            .insert(id, Waypoint::new(id, position, yaw_degrees, behavior));
        Ok(id)
    }

    /// Insert a waypoint carrying a caller-assigned identifier, returning the one it replaced.
    /// Later calls to `place` never reuse it.
    pub fn insert(&mut self, waypoint: Waypoint) -> Result<Option<Waypoint>, CatalogError> {
        if !waypoint.id.is_valid() {
            return Err(CatalogError::InvalidId(waypoint.id));
        }
        // Valid ids stay below u32::MAX, so the successor cannot overflow
        self.next_id = self.next_id.max(waypoint.id.0 + 1);
        Ok(self.waypoints.insert(waypoint.id, waypoint))
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(&id)
    }

    pub fn remove(&mut self, id: WaypointId) -> Option<Waypoint> {
        self.waypoints.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = WaypointId> + '_ {
        self.waypoints.keys().copied()
    }

    /// Set the recording position of a Record-360 waypoint. Allowed once.
    pub fn set_recording_position(
        &mut self,
        id: WaypointId,
        position: Vec3,
    ) -> Result<(), CatalogError> {
        let waypoint = self
            .waypoints
            .get_mut(&id)
            .ok_or(CatalogError::UnknownWaypoint(id))?;

        match &mut waypoint.behavior {
            WaypointBehavior::Record360 {
                recording_position: Some(_),
                ..
            } => Err(CatalogError::RecordingAlreadySet(id)),
            WaypointBehavior::Record360 {
                recording_position, ..
            } => {
                *recording_position = Some(position);
                Ok(())
            }
            WaypointBehavior::StopTurnGo { .. } => Err(CatalogError::NotRecordingWaypoint(id)),
        }
    }

    /// First waypoint whose acceptance radius contains `point`
    pub fn find_at(&self, point: Vec3) -> Option<WaypointId> {
        self.waypoints
            .values()
            .find(|waypoint| waypoint.contains(point))
            .map(|waypoint| waypoint.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_WAYPOINT_ID;
    use crate::route::RouteEntry;

    #[test]
    fn placed_ids_increase_monotonically() {
        let mut catalog = WaypointCatalog::default();
        let a = catalog.place(Vec3::ZERO, 0.0, WaypointBehavior::default()).unwrap();
        let b = catalog.place(Vec3::X, 0.0, WaypointBehavior::default()).unwrap();
        catalog.remove(b);
        let c = catalog.place(Vec3::Y, 0.0, WaypointBehavior::default()).unwrap();

        assert_eq!(a, WaypointId(1));
        assert_eq!(b, WaypointId(2));
        assert_eq!(c, WaypointId(3));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn inserted_ids_are_never_reused() {
        let mut catalog = WaypointCatalog::default();
        catalog
            .insert(Waypoint::new(
                WaypointId(10),
                Vec3::ZERO,
                0.0,
                WaypointBehavior::default(),
            ))
            .unwrap();
        let next = catalog.place(Vec3::X, 0.0, WaypointBehavior::default()).unwrap();
        assert_eq!(next, WaypointId(11));
    }

    #[test]
    fn reserved_and_out_of_range_ids_are_refused() {
        let mut catalog = WaypointCatalog::default();

        for id in [0, MAX_WAYPOINT_ID + 1, u32::MAX] {
            let id = WaypointId(id);
            let waypoint = Waypoint::new(id, Vec3::ZERO, 0.0, WaypointBehavior::default());
            assert_eq!(catalog.insert(waypoint), Err(CatalogError::InvalidId(id)));
        }
        assert!(catalog.is_empty());
    }

    #[test]
    fn placing_past_the_last_id_fails() {
        let mut catalog = WaypointCatalog::default();
        let last = Waypoint::new(
            WaypointId(MAX_WAYPOINT_ID),
            Vec3::ZERO,
            0.0,
            WaypointBehavior::default(),
        );
        assert_eq!(catalog.insert(last), Ok(None));

        assert_eq!(
            catalog.place(Vec3::X, 0.0, WaypointBehavior::default()),
            Err(CatalogError::IdsExhausted)
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(RouteEntry::from(WaypointId(MAX_WAYPOINT_ID)).id(), i32::MAX);
    }

    #[test]
    fn recording_position_is_set_once() {
        let mut catalog = WaypointCatalog::default();
        let id = catalog.place(Vec3::ZERO, 0.0, WaypointBehavior::record_360()).unwrap();

        assert_eq!(catalog.set_recording_position(id, Vec3::Y), Ok(()));
        assert_eq!(
            catalog.set_recording_position(id, Vec3::Y * 2.0),
            Err(CatalogError::RecordingAlreadySet(id))
        );

        let Some(WaypointBehavior::Record360 {
            recording_position, ..
        }) = catalog.get(id).map(|w| w.behavior)
        else {
            panic!("expected a recording waypoint");
        };
        assert_eq!(recording_position, Some(Vec3::Y));
    }

    #[test]
    fn recording_position_rejected_for_other_behaviors() {
        let mut catalog = WaypointCatalog::default();
        let id = catalog.place(Vec3::ZERO, 0.0, WaypointBehavior::default()).unwrap();

        assert_eq!(
            catalog.set_recording_position(id, Vec3::Y),
            Err(CatalogError::NotRecordingWaypoint(id))
        );
        assert_eq!(
            catalog.set_recording_position(WaypointId(99), Vec3::Y),
            Err(CatalogError::UnknownWaypoint(WaypointId(99)))
        );
    }

    #[test]
    fn find_at_uses_acceptance_radius() {
        let mut catalog = WaypointCatalog::default();
        let id = catalog.place(Vec3::new(5.0, 0.0, 0.0), 0.0, WaypointBehavior::default()).unwrap();

        assert_eq!(catalog.find_at(Vec3::new(5.2, 0.0, 0.0)), Some(id));
        assert_eq!(catalog.find_at(Vec3::new(6.0, 0.0, 0.0)), None);
    }
}
