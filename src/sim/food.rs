use super::math::Vector;

/// A pile of food. Each pickup takes one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodDeposit {
    location: Vector,
    quantity: i32,
}

impl FoodDeposit {
    pub fn new(x: f64, y: f64, quantity: i32) -> Self {
        Self {
            location: Vector::planar(x, y),
            quantity,
        }
    }

    pub fn location(&self) -> Vector {
        self.location
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Deposits with nothing left are skipped by pickup and removed at the
    /// end of the pickup pass.
    pub fn is_depleted(&self) -> bool {
        self.quantity < 1
    }

    /// Take one unit. Returns false (and changes nothing) if depleted.
    pub fn take_one(&mut self) -> bool {
        if self.is_depleted() {
            return false;
        }
        self.quantity -= 1;
        true
    }

    /// True when `point` is strictly within `reach` of the deposit on both axes.
    pub fn within_reach(&self, point: Vector, reach: f64) -> bool {
        (self.location.x - point.x).abs() < reach && (self.location.y - point.y).abs() < reach
    }
}
