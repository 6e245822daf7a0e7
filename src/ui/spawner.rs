//! Systems for spawning visual entities from simulation state

use bevy::prelude::*;

use super::components::{BuildingLink, CarLink, CarMaterials, CurrentSnapshot, SimWorldResource};
use crate::simulation::{CarRenderRecord, SimWorld, CAR_RIDE_HEIGHT};

const ROAD_WIDTH: f32 = 0.6;
const ROAD_HEIGHT: f32 = 0.02;
const CAR_SIZE: (f32, f32, f32) = (0.3, 0.2, 0.5);

/// System to create initial visual entities from simulation state
pub fn spawn_initial_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
    mut snapshot: ResMut<CurrentSnapshot>,
    mut car_materials: ResMut<CarMaterials>,
) {
    let world = &sim_world.0;
    snapshot.0 = world.snapshot();

    spawn_buildings(&mut commands, &mut meshes, &mut materials, &snapshot.0);
    spawn_streets(&mut commands, &mut meshes, &mut materials, world);
    spawn_cars(
        &mut commands,
        &mut meshes,
        &mut materials,
        &snapshot.0.cars,
        &mut car_materials,
    );
}

fn spawn_buildings(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    snapshot: &crate::simulation::RenderSnapshot,
) {
    // One unit cube shared by every building; height comes from the scale
    let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let facade = materials.add(Color::srgb(0.55, 0.58, 0.65));

    for building in &snapshot.buildings {
        commands.spawn((
            BuildingLink {
                column: building.column,
                row: building.row,
            },
            Mesh3d(cube.clone()),
            MeshMaterial3d(facade.clone()),
            Transform::from_xyz(
                building.position.x,
                building.position.y,
                building.position.z,
            )
            .with_scale(Vec3::new(
                building.scale.x,
                building.scale.y,
                building.scale.z,
            )),
        ));
    }
}

fn spawn_streets(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &SimWorld,
) {
    let length = world.config.road_length;
    let asphalt = materials.add(Color::srgb(0.2, 0.2, 0.2));
    let mesh = meshes.add(Cuboid::new(ROAD_WIDTH, ROAD_HEIGHT, length));

    for street in world.traffic.streets() {
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(asphalt.clone()),
            Transform::from_xyz(street.x, ROAD_HEIGHT / 2.0, 0.0),
        ));
    }
}

fn spawn_cars(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    cars: &[CarRenderRecord],
    car_materials: &mut ResMut<CarMaterials>,
) {
    let (width, height, length) = CAR_SIZE;
    let mesh = meshes.add(Cuboid::new(width, height, length));
    car_materials.braking = materials.add(Color::srgb(1.0, 0.6, 0.0));

    for car in cars {
        let body = materials.add(Color::srgb(car.color.r, car.color.g, car.color.b));
        car_materials.body.insert(car.id, body.clone());

        commands.spawn((
            CarLink(car.id),
            Mesh3d(mesh.clone()),
            MeshMaterial3d(body),
            Transform::from_xyz(car.position.x, CAR_RIDE_HEIGHT, car.position.z)
                .with_rotation(Quat::from_rotation_y(car.yaw)),
        ));
    }
}
