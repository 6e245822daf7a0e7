//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{CarId, MoveIntent, RenderSnapshot, SimWorld};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

impl Default for SimWorldResource {
    fn default() -> Self {
        Self(SimWorld::new())
    }
}

/// Render data produced by the latest simulation tick
#[derive(Resource, Default)]
pub struct CurrentSnapshot(pub RenderSnapshot);

/// Keys held this frame, translated into a camera movement intent
#[derive(Resource, Default)]
pub struct PendingIntent(pub MoveIntent);

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a Bevy entity to one building cell
#[derive(Component)]
pub struct BuildingLink {
    pub column: usize,
    pub row: usize,
}

/// Links a Bevy entity to a simulation car
#[derive(Component)]
pub struct CarLink(pub CarId);

/// Materials shared by car visuals
#[derive(Resource, Default)]
pub struct CarMaterials {
    /// Regular body material per car
    pub body: HashMap<CarId, Handle<StandardMaterial>>,
    /// Shown while a car is braking
    pub braking: Handle<StandardMaterial>,
}
