//! Streets: fixed lanes along z that cars drive on

use super::types::{CarId, Direction, StreetId};

/// A straight one-way street at a fixed x
#[derive(Debug, Clone)]
pub struct SimStreet {
    pub id: StreetId,
    pub x: f32,
    pub direction: Direction,
    /// Cars that belong to this street, in spawn order
    pub cars: Vec<CarId>,
}

impl SimStreet {
    pub fn new(id: StreetId, x: f32) -> Self {
        Self {
            id,
            x,
            direction: Direction::for_street(id.0),
            cars: Vec::new(),
        }
    }

    pub fn is_forward(&self) -> bool {
        self.direction.is_forward()
    }
}
