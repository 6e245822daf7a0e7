//! Free-fly camera driven by keyboard style movement intents

use super::types::{Position, CAMERA_FRONT, CAMERA_MOVE_SPEED, CAMERA_START, CAMERA_UP};

/// Which movement keys are held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Camera position and orientation
///
/// Movement is axis aligned: forward/back move along -z/+z and left/right
/// along -x/+x, regardless of where the camera looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Position,
    pub front: Position,
    pub up: Position,
    /// World units moved per tick per held key
    pub move_speed: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_START,
            front: CAMERA_FRONT,
            up: CAMERA_UP,
            move_speed: CAMERA_MOVE_SPEED,
        }
    }
}

impl CameraRig {
    /// Apply one tick of movement and return the new position
    pub fn apply(&mut self, intent: MoveIntent) -> Position {
        let step = self.move_speed;
        if intent.forward {
            self.position.z -= step;
        }
        if intent.back {
            self.position.z += step;
        }
        if intent.left {
            self.position.x -= step;
        }
        if intent.right {
            self.position.x += step;
        }
        self.position
    }

    /// Jump straight to a position, keeping the view direction
    pub fn teleport(&mut self, position: Position) {
        self.position = position;
    }

    /// Point the camera looks at, one unit along `front`
    pub fn target(&self) -> Position {
        self.position + self.front
    }

    /// Right-handed side vector of the view
    pub fn right(&self) -> Position {
        self.front.cross(&self.up).normalized()
    }
}
