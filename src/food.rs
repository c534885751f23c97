use crate::Coords;
use crate::snake::Field;

use rand::Rng;

pub struct Food {
    position: Coords,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(field: &Field, rng: &mut R) -> Self {
        let mut food = Food { position: (0, 0) };
        food.randomize_position(field, rng);
        food
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    /// Moves the food to a uniformly random cell. Cells under the snake are
    /// not excluded.
    pub fn randomize_position<R: Rng + ?Sized>(&mut self, field: &Field, rng: &mut R) {
        self.position = (rng.gen_range(0..field.cols), rng.gen_range(0..field.rows));
    }
}
