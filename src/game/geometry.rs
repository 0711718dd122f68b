//! 2D point arithmetic for the simulation

/// World-space coordinate. Value semantics; cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn dist(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing angle toward another point (atan2 convention):
    /// shifting by this angle and any positive length moves toward `other`.
    pub fn angle_to(&self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point reached by moving `length` along `angle`
    pub fn shifted(&self, angle: f32, length: f32) -> Point {
        Point {
            x: self.x + angle.cos() * length,
            y: self.y + angle.sin() * length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dist_is_symmetric() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.dist(b), 5.0);
        assert_eq!(b.dist(a), 5.0);
    }

    #[test]
    fn shift_along_bearing_moves_toward_target() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, -40.0);
        let angle = a.angle_to(b);
        let stepped = a.shifted(angle, 10.0);
        assert!(stepped.dist(b) < a.dist(b));
    }

    #[test]
    fn shift_does_not_mutate_origin() {
        let a = Point::new(3.0, 3.0);
        let _ = a.shifted(1.0, 50.0);
        assert_eq!(a, Point::new(3.0, 3.0));
    }

    #[test]
    fn zero_length_shift_is_identity() {
        let a = Point::new(7.5, -2.5);
        let shifted = a.shifted(0.83, 0.0);
        assert!(a.dist(shifted) < 1e-6);
    }
}
