use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// 2D vector in normalized field coordinates
///
/// Uses `f64` so that range checks on the field (pickup, charge hit,
/// wander target) behave the same at their inclusive/exclusive boundaries
/// as the reference tuning values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +x)
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Scale the vertical component only
    #[inline]
    pub fn scale_y(&self, factor: f64) -> Self {
        Self {
            x: self.x,
            y: self.y * factor,
        }
    }

    /// Clamp both components into `[min, max]`
    pub fn clamp_components(&self, min: f64, max: f64) -> Self {
        Self {
            x: self.x.clamp(min, max),
            y: self.y.clamp(min, max),
        }
    }

    /// Check if vector is approximately equal to another
    #[cfg(test)]
    pub fn approx_eq(&self, other: Vec2, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
