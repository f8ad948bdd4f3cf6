use super::math::Vector;

/// The nest. Ants spawn here and bring food back to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colony {
    location: Vector,
}

impl Colony {
    pub fn new(x: f64, y: f64) -> Self {
        Self { location: Vector::planar(x, y) }
    }

    pub fn location(&self) -> Vector {
        self.location
    }

    /// True when `point` is strictly within `reach` of the nest on both axes.
    pub fn within_reach(&self, point: Vector, reach: f64) -> bool {
        (self.location.x - point.x).abs() < reach && (self.location.y - point.y).abs() < reach
    }
}
