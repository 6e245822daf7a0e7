//! Input handling systems

use bevy::prelude::*;

use super::components::PendingIntent;
use crate::simulation::MoveIntent;

/// Handle basic keyboard input
pub fn handle_input(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

/// Translate held movement keys into a camera intent for the next tick
pub fn handle_camera_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut pending: ResMut<PendingIntent>,
) {
    let held = |a: KeyCode, b: KeyCode| keyboard.pressed(a) || keyboard.pressed(b);

    pending.0 = MoveIntent {
        forward: held(KeyCode::KeyW, KeyCode::ArrowUp),
        back: held(KeyCode::KeyS, KeyCode::ArrowDown),
        left: held(KeyCode::KeyA, KeyCode::ArrowLeft),
        right: held(KeyCode::KeyD, KeyCode::ArrowRight),
    };
}
