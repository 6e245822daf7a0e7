//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;

use super::components::{
    BuildingLink, CarLink, CarMaterials, CurrentSnapshot, Ground, MainCamera, PendingIntent,
    SimWorldResource,
};

/// System to run one simulation tick with the held movement keys
pub fn tick_simulation(
    time: Res<Time>,
    pending: Res<PendingIntent>,
    mut sim_world: ResMut<SimWorldResource>,
    mut snapshot: ResMut<CurrentSnapshot>,
) {
    snapshot.0 = sim_world.0.tick_with_intent(pending.0, time.delta_secs());
}

/// System to move building cubes to their recycled cells
pub fn sync_buildings(
    sim_world: Res<SimWorldResource>,
    snapshot: Res<CurrentSnapshot>,
    mut building_query: Query<(&BuildingLink, &mut Transform)>,
) {
    let rows = sim_world.0.grid.size_z();

    for (link, mut transform) in building_query.iter_mut() {
        if let Some(building) = snapshot.0.buildings.get(link.column * rows + link.row) {
            transform.translation = Vec3::new(
                building.position.x,
                building.position.y,
                building.position.z,
            );
            transform.scale = Vec3::new(building.scale.x, building.scale.y, building.scale.z);
        }
    }
}

/// System to sync car visuals from simulation state
pub fn sync_cars(
    snapshot: Res<CurrentSnapshot>,
    car_materials: Res<CarMaterials>,
    mut car_query: Query<(
        &CarLink,
        &mut Transform,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    for (link, mut transform, mut material) in car_query.iter_mut() {
        let Some(car) = snapshot.0.cars.get(link.0 .0) else {
            continue;
        };
        transform.translation.x = car.position.x;
        transform.translation.z = car.position.z;
        transform.rotation = Quat::from_rotation_y(car.yaw);

        let wanted = if car.braking {
            Some(&car_materials.braking)
        } else {
            car_materials.body.get(&car.id)
        };
        if let Some(handle) = wanted {
            if material.0 != *handle {
                material.0 = handle.clone();
            }
        }
    }
}

/// System to place the camera (and the ground under it) at the rig position
pub fn sync_camera(
    sim_world: Res<SimWorldResource>,
    mut camera_query: Query<&mut Transform, (With<MainCamera>, Without<Ground>)>,
    mut ground_query: Query<&mut Transform, (With<Ground>, Without<MainCamera>)>,
) {
    let rig = sim_world.0.camera;
    let eye = Vec3::new(rig.position.x, rig.position.y, rig.position.z);
    let front = Vec3::new(rig.front.x, rig.front.y, rig.front.z);

    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = Transform::from_translation(eye).looking_to(front, Vec3::Y);
    }
    if let Ok(mut transform) = ground_query.single_mut() {
        transform.translation.x = eye.x;
        transform.translation.z = eye.z;
    }
}
