//! World setup systems for camera, lighting, sky and ground

use bevy::prelude::*;

use super::components::{Ground, MainCamera, SimWorldResource};
use crate::simulation::SKY_FALLBACK_COLOR;

/// Position of the single scene light
const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 10.0, 5.0);

/// System to setup the world environment (sky, ground, lighting, camera)
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
) {
    let rig = sim_world.0.camera;

    // No sky texture is shipped; the plain fallback colour stands in for it
    commands.insert_resource(ClearColor(Color::srgb(
        SKY_FALLBACK_COLOR.r,
        SKY_FALLBACK_COLOR.g,
        SKY_FALLBACK_COLOR.b,
    )));

    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 50.0,
            ..default()
        }),
        Transform::from_xyz(rig.position.x, rig.position.y, rig.position.z)
            .looking_at(
                Vec3::new(rig.target().x, rig.target().y, rig.target().z),
                Vec3::Y,
            ),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // The ground follows the camera in x/z so it never runs out
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(200.0, 200.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.15, 0.15, 0.18))),
        Transform::from_xyz(rig.position.x, 0.0, rig.position.z),
    ));
}
