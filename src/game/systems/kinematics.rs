//! Point-mass kinematics on the normalized field
//!
//! The field is drawn stretched to a non-square window, so the vertical
//! axis is scaled by the window's width/height ratio both when moving and
//! when measuring distances. That keeps on-screen speed and on-screen
//! proximity uniform in every direction.

use crate::game::constants::field;
use crate::util::vec2::Vec2;

/// Advance `position` by `velocity * dt` and clamp it onto the field
pub fn integrate(position: Vec2, velocity: Vec2, dt: f64, aspect_ratio: f64) -> Vec2 {
    let moved = position + velocity.scale_y(aspect_ratio) * dt;
    moved.clamp_components(field::MIN, field::MAX)
}

/// Aspect-corrected distance used for every proximity check
pub fn distance(a: Vec2, b: Vec2, aspect_ratio: f64) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + aspect_ratio * dy * dy).sqrt()
}

/// Velocity of magnitude `speed` heading along `angle`
#[inline]
pub fn velocity(angle: f64, speed: f64) -> Vec2 {
    Vec2::from_angle(angle) * speed
}

/// Heading from `from` towards `to`, measured with the aspect-corrected metric
///
/// Returns `None` when the points coincide.
pub fn heading(from: Vec2, to: Vec2, aspect_ratio: f64) -> Option<f64> {
    let h = distance(from, to, aspect_ratio);
    if h <= 0.0 {
        return None;
    }
    let angle = ((to.x - from.x) / h).clamp(-1.0, 1.0).acos();
    Some(if from.y > to.y { -angle } else { angle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const RATIO: f64 = 16.0 / 9.0;

    #[test]
    fn test_integrate_scales_vertical_axis() {
        let p = integrate(Vec2::ZERO, Vec2::new(0.3, 0.3), 1.0, RATIO);
        assert!((p.x - 0.3).abs() < 1e-12);
        assert!((p.y - 0.3 * RATIO).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_clamps_to_field() {
        let p = integrate(Vec2::new(0.95, -0.95), Vec2::new(1.0, -1.0), 1.0, RATIO);
        assert_eq!(p, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_integrate_zero_dt_is_identity() {
        let start = Vec2::new(0.25, -0.5);
        assert_eq!(integrate(start, Vec2::new(5.0, 5.0), 0.0, RATIO), start);
    }

    #[test]
    fn test_distance_horizontal_is_plain() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(0.2, 0.0), RATIO), 0.2);
    }

    #[test]
    fn test_distance_vertical_is_corrected() {
        let d = distance(Vec2::ZERO, Vec2::new(0.0, 0.3), RATIO);
        assert!((d - (RATIO * 0.09).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_heading() {
        let right = heading(Vec2::ZERO, Vec2::new(0.5, 0.0), RATIO).unwrap();
        assert!(right.abs() < 1e-12);

        let left = heading(Vec2::ZERO, Vec2::new(-0.5, 0.0), RATIO).unwrap();
        assert!((left - PI).abs() < 1e-12);

        let up = heading(Vec2::ZERO, Vec2::new(0.0, 0.5), RATIO).unwrap();
        assert!((up - FRAC_PI_2).abs() < 1e-12);

        let down = heading(Vec2::ZERO, Vec2::new(0.0, -0.5), RATIO).unwrap();
        assert!((down + FRAC_PI_2).abs() < 1e-12);

        assert!(heading(Vec2::ZERO, Vec2::ZERO, RATIO).is_none());
    }

    #[test]
    fn test_velocity() {
        let v = velocity(PI, 0.5);
        assert!(v.approx_eq(Vec2::new(-0.5, 0.0), 1e-12));
    }

    proptest! {
        #[test]
        fn prop_integrate_stays_on_field(
            x in -1.0f64..=1.0,
            y in -1.0f64..=1.0,
            vx in -1.0e6f64..1.0e6,
            vy in -1.0e6f64..1.0e6,
            dt in 0.0f64..100.0,
        ) {
            let p = integrate(Vec2::new(x, y), Vec2::new(vx, vy), dt, RATIO);
            prop_assert!((-1.0..=1.0).contains(&p.x));
            prop_assert!((-1.0..=1.0).contains(&p.y));
        }

        #[test]
        fn prop_distance_symmetric(
            x1 in -1.0f64..=1.0,
            y1 in -1.0f64..=1.0,
            x2 in -1.0f64..=1.0,
            y2 in -1.0f64..=1.0,
        ) {
            let a = Vec2::new(x1, y1);
            let b = Vec2::new(x2, y2);
            prop_assert_eq!(distance(a, b, RATIO), distance(b, a, RATIO));
            prop_assert_eq!(distance(a, a, RATIO), 0.0);
        }
    }
}
