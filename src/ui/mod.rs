//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI feeds camera input into `SimWorld`, reads back its render snapshot
//! and renders it using Bevy's 3D graphics.

mod components;
mod input;
mod spawner;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{CurrentSnapshot, SimWorldResource};

use components::{CarMaterials, PendingIntent};
use input::{handle_camera_movement, handle_input};
use spawner::spawn_initial_visuals;
use sync::{sync_buildings, sync_camera, sync_cars, tick_simulation};
use world::setup_world;

/// Plugin to register all UI systems
pub struct CityUIPlugin;

impl Plugin for CityUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimWorldResource>()
            .init_resource::<CurrentSnapshot>()
            .init_resource::<PendingIntent>()
            .init_resource::<CarMaterials>()
            .add_systems(
                Startup,
                (setup_world, spawn_initial_visuals.after(setup_world)),
            )
            .add_systems(
                Update,
                (
                    handle_input,
                    handle_camera_movement,
                    tick_simulation,
                    (sync_buildings, sync_cars, sync_camera),
                )
                    .chain(),
            );
    }
}
