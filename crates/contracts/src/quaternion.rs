//! Quaternion — orientation representation and SLERP (C1)
//!
//! Four real components `(w, x, y, z)`. Kept as plain `f64` fields rather than
//! wrapping a general linear-algebra type so the hot path stays allocation-free
//! and dependency-free.

use serde::{Deserialize, Serialize};

/// Tolerance used for norm checks and near-parallel SLERP fallback.
pub const EPSILON: f64 = 1e-6;

/// A unit quaternion (or near-unit, defensively renormalized on construction
/// from untrusted input).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Negate all components. `q` and `-q` represent the same orientation.
    pub fn negated(&self) -> Self {
        Self {
            w: -self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    fn scaled(&self, s: f64) -> Self {
        Self {
            w: self.w * s,
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    fn added(&self, other: &Self) -> Self {
        Self {
            w: self.w + other.w,
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

/// Normalize `q` to unit length. Returns the identity quaternion if `q` is
/// degenerate (norm below [`EPSILON`]) rather than dividing by ~zero.
pub fn normalize(q: Quaternion) -> Quaternion {
    let n = q.norm();
    if n < EPSILON {
        return Quaternion::IDENTITY;
    }
    q.scaled(1.0 / n)
}

/// Dot product of two quaternions, treated as 4-vectors.
pub fn dot(a: Quaternion, b: Quaternion) -> f64 {
    a.w * b.w + a.x * b.x + a.y * b.y + a.z * b.z
}

/// Spherical linear interpolation between two unit quaternions.
///
/// Negates `b` when `dot(a, b) < 0` so the interpolation always takes the
/// shorter arc across the quaternion double-cover of SO(3). Falls back to a
/// normalized linear interpolation when `a` and `b` are nearly parallel,
/// where `sin(theta)` would be too small to divide by safely.
pub fn slerp(a: Quaternion, b: Quaternion, t: f64) -> Quaternion {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }

    let mut d = dot(a, b);
    let mut b = b;
    if d < 0.0 {
        b = b.negated();
        d = -d;
    }

    if d > 1.0 - EPSILON {
        let lerped = a.scaled(1.0 - t).added(&b.scaled(t));
        return normalize(lerped);
    }

    let theta = d.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let coeff_a = ((1.0 - t) * theta).sin() / sin_theta;
    let coeff_b = (t * theta).sin() / sin_theta;
    a.scaled(coeff_a).added(&b.scaled(coeff_b))
}
