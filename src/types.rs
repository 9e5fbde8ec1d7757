#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

// --- Axis-aligned bounding box, recomputed fresh by entities on every query ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }
}

pub fn wrap_coordinate(value: f64, max: f64) -> f64 {
    // rem_euclid can round up to max itself for tiny negative inputs
    let wrapped = value.rem_euclid(max);
    if wrapped < max { wrapped } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn vector_scale_and_add() {
        let v = Vector2D::new(3.0, -4.0);
        assert_eq!(v.scale(2.0), Vector2D::new(6.0, -8.0));
        assert_eq!(v.add(Vector2D::new(1.0, 1.0)), Vector2D::new(4.0, -3.0));
    }

    #[test]
    fn wrap_inside_range_is_identity() {
        assert_relative_eq!(wrap_coordinate(399.5, 800.0), 399.5);
        assert_relative_eq!(wrap_coordinate(0.0, 600.0), 0.0);
    }

    #[test]
    fn wrap_past_either_edge_reenters_opposite() {
        assert_relative_eq!(wrap_coordinate(810.0, 800.0), 10.0);
        assert_relative_eq!(wrap_coordinate(-15.0, 800.0), 785.0);
        assert_relative_eq!(wrap_coordinate(-600.0, 600.0), 0.0);
    }

    #[test]
    fn wrap_at_exact_bound_is_zero() {
        assert_eq!(wrap_coordinate(800.0, 800.0), 0.0);
        assert_eq!(wrap_coordinate(1600.0, 800.0), 0.0);
    }

    proptest! {
        #[test]
        fn wrap_always_lands_in_range(value in -1.0e6..1.0e6f64, max in 1.0..4096.0f64) {
            let wrapped = wrap_coordinate(value, max);
            prop_assert!(wrapped >= 0.0);
            prop_assert!(wrapped < max);
        }

        #[test]
        fn wrap_is_congruent_modulo_max(value in -1.0e6..1.0e6f64, max in 1.0..4096.0f64) {
            let wrapped = wrap_coordinate(value, max);
            let turns = (value - wrapped) / max;
            prop_assert!((turns - turns.round()).abs() < 1e-6);
        }
    }
}
