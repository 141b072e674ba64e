//! Headless demo flight: authors a short route through messages and replays it.
//! Run with: cargo run --bin main

use bevy::app::AppExit;
use bevy::prelude::*;
use waypoint_flight::{CatalogError, headless_app};
use waypoint_flight::messages::{ConnectWaypoint, FlightEvent, PlaybackCommand};
use waypoint_flight::playback::FlightVehicle;
use waypoint_flight::route::RouteEntry;
use waypoint_flight::waypoint::{AnchorPose, RouteAnchors, WaypointBehavior, WaypointCatalog};

fn main() -> AppExit {
    let mut app = headless_app();

    app.insert_resource(RouteAnchors::new(
        AnchorPose::new(Vec3::ZERO, 0.0),
        AnchorPose::new(Vec3::new(12.0, 0.0, 0.0), 90.0),
    ));

    let placed = place_waypoints(&mut app.world_mut().resource_mut::<WaypointCatalog>());
    let (survey, orbit) = match placed {
        Ok(ids) => ids,
        Err(error) => {
            error!("Could not place demo waypoints: {}", error);
            return AppExit::error();
        }
    };

    for (from, to) in [
        (RouteEntry::Entry, survey),
        (survey, orbit),
        (orbit, RouteEntry::Exit),
    ] {
        app.world_mut().write_message(ConnectWaypoint { from, to });
    }
    app.world_mut().write_message(PlaybackCommand::Play);

    app.add_systems(PostUpdate, (report_pose, exit_on_completion));
    app.run()
}

fn place_waypoints(
    catalog: &mut WaypointCatalog,
) -> Result<(RouteEntry, RouteEntry), CatalogError> {
    let survey = catalog.place(
        Vec3::new(4.0, 1.5, -3.0),
        0.0,
        WaypointBehavior::StopTurnGo { hold_time: 2.0 },
    )?;
    let orbit = catalog.place(Vec3::new(8.0, 1.5, 0.0), 0.0, WaypointBehavior::record_360())?;
    catalog.set_recording_position(orbit, Vec3::new(8.0, 3.0, 0.0))?;
    Ok((survey.into(), orbit.into()))
}

fn report_pose(vehicles: Query<&Transform, (With<FlightVehicle>, Changed<Transform>)>) {
    for transform in vehicles.iter() {
        debug!(
            "Vehicle at ({:.2}, {:.2}, {:.2})",
            transform.translation.x, transform.translation.y, transform.translation.z
        );
    }
}

fn exit_on_completion(mut events: MessageReader<FlightEvent>, mut exit: MessageWriter<AppExit>) {
    for event in events.read() {
        info!("{:?}", event);
        if let FlightEvent::FlightCompleted { success } = event {
            exit.write(if *success {
                AppExit::Success
            } else {
                AppExit::error()
            });
        }
    }
}
