//! Angle and interpolation helpers.
//!
//! Locomotion math runs in its own frame: `X` is forward, `Y` is right and `Z` is up. Angles
//! are in degrees, and a positive yaw turns the forward axis towards the right axis.

use bevy::math::{EulerRot, Quat, Vec3};
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

const SMALL_NUMBER: f32 = 1.0e-8;
const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Wraps an angle in degrees into `(-180, 180]`.
pub fn normalize_axis(angle: f32) -> f32 {
    if angle > -180. && angle <= 180. {
        return angle;
    }
    let wrapped = angle.rem_euclid(360.);
    if wrapped > 180. {
        wrapped - 360.
    } else {
        wrapped
    }
}

/// Maps `value` from `[in_a, in_b]` into `[out_a, out_b]`, clamping to the output range.
pub fn map_range_clamped(value: f32, in_a: f32, in_b: f32, out_a: f32, out_b: f32) -> f32 {
    let divisor = in_b - in_a;
    let pct = if divisor == 0. {
        if value >= in_b { 1. } else { 0. }
    } else {
        ((value - in_a) / divisor).clamp(0., 1.)
    };
    out_a + (out_b - out_a) * pct
}

/// Pitch, yaw and roll in degrees.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self::new(0., 0., 0.);

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// A pure heading, with no pitch or roll.
    pub const fn from_yaw(yaw: f32) -> Self {
        Self::new(0., yaw, 0.)
    }

    /// Orientation whose forward axis points along `direction`. A zero vector gives
    /// [`Rotator::ZERO`].
    pub fn from_direction(direction: Vec3) -> Self {
        let yaw = direction.y.atan2(direction.x).to_degrees();
        let pitch = direction
            .z
            .atan2(direction.x.hypot(direction.y))
            .to_degrees();
        Self::new(pitch, yaw, 0.)
    }

    pub fn normalized(self) -> Self {
        Self::new(
            normalize_axis(self.pitch),
            normalize_axis(self.yaw),
            normalize_axis(self.roll),
        )
    }

    /// Shortest signed rotation taking `other` onto `self`.
    pub fn delta(self, other: Self) -> Self {
        (self - other).normalized()
    }

    pub fn is_nearly_zero(self, tolerance: f32) -> bool {
        self.pitch.abs() <= tolerance && self.yaw.abs() <= tolerance && self.roll.abs() <= tolerance
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.yaw.to_radians(),
            -self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    pub fn rotate_vector(self, vector: Vec3) -> Vec3 {
        self.to_quat() * vector
    }

    /// Expresses a frame-space vector relative to this orientation.
    pub fn unrotate_vector(self, vector: Vec3) -> Vec3 {
        self.to_quat().inverse() * vector
    }

    pub fn forward(self) -> Vec3 {
        self.rotate_vector(Vec3::X)
    }

    pub fn right(self) -> Vec3 {
        self.rotate_vector(Vec3::Y)
    }
}

impl Add for Rotator {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw, self.roll + rhs.roll)
    }
}

impl Sub for Rotator {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.pitch - rhs.pitch, self.yaw - rhs.yaw, self.roll - rhs.roll)
    }
}

impl Mul<f32> for Rotator {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.pitch * rhs, self.yaw * rhs, self.roll * rhs)
    }
}

/// Exponential interpolation: moves a fraction `dt * speed` of the remaining distance.
///
/// A non-positive `dt` leaves `current` untouched. A non-positive `speed` snaps to `target`.
pub fn f_interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if dt <= 0. {
        return current;
    }
    if speed <= 0. {
        return target;
    }
    let dist = target - current;
    if dist * dist < SMALL_NUMBER {
        return target;
    }
    current + dist * (dt * speed).clamp(0., 1.)
}

/// Rotator version of [`f_interp_to`], following the shortest path on each axis.
pub fn r_interp_to(current: Rotator, target: Rotator, dt: f32, speed: f32) -> Rotator {
    if dt <= 0. || current == target {
        return current;
    }
    if speed <= 0. {
        return target.normalized();
    }
    let delta = target.delta(current);
    if delta.is_nearly_zero(KINDA_SMALL_NUMBER) {
        return target.normalized();
    }
    (current + delta * (dt * speed).clamp(0., 1.)).normalized()
}

/// Constant angular speed interpolation: each axis moves at most `speed * dt` degrees.
pub fn r_interp_constant_to(current: Rotator, target: Rotator, dt: f32, speed: f32) -> Rotator {
    if dt <= 0. || current == target {
        return current;
    }
    if speed <= 0. {
        return target.normalized();
    }
    let max_step = speed * dt;
    let delta = target.delta(current);
    let step = Rotator::new(
        delta.pitch.clamp(-max_step, max_step),
        delta.yaw.clamp(-max_step, max_step),
        delta.roll.clamp(-max_step, max_step),
    );
    (current + step).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1.0e-4
    }

    #[test]
    fn normalize_axis_wraps_into_half_open_range() {
        assert!(approx(normalize_axis(190.), -170.));
        assert!(approx(normalize_axis(-190.), 170.));
        assert!(approx(normalize_axis(180.), 180.));
        assert!(approx(normalize_axis(-180.), 180.));
        assert!(approx(normalize_axis(720.), 0.));
    }

    #[test]
    fn map_range_clamps_both_ends() {
        assert!(approx(map_range_clamped(0.3, 0., 0.6, 1., 1.2), 1.1));
        assert!(approx(map_range_clamped(5., 0., 0.6, 1., 1.2), 1.2));
        assert!(approx(map_range_clamped(-5., 0., 0.6, 1., 1.2), 1.));
        // Degenerate input range behaves like a step
        assert!(approx(map_range_clamped(2., 2., 2., 0., 1.), 1.));
        assert!(approx(map_range_clamped(1., 2., 2., 0., 1.), 0.));
    }

    #[test]
    fn rotator_frame_conventions() {
        let right = Rotator::from_yaw(90.).forward();
        assert!(right.abs_diff_eq(Vec3::Y, 1.0e-5));

        let up = Rotator::new(90., 0., 0.).forward();
        assert!(up.abs_diff_eq(Vec3::Z, 1.0e-5));

        let heading = Rotator::from_direction(Vec3::new(1., 1., 0.));
        assert!(approx(heading.yaw, 45.));
        assert!(approx(heading.pitch, 0.));

        assert_eq!(Rotator::from_direction(Vec3::ZERO), Rotator::ZERO);
    }

    #[test]
    fn unrotate_is_inverse_of_rotate() {
        let rot = Rotator::from_yaw(30.);
        let v = Vec3::new(3., -2., 1.);
        assert!(rot.unrotate_vector(rot.rotate_vector(v)).abs_diff_eq(v, 1.0e-4));
    }

    #[test]
    fn interpolations_are_identity_with_zero_dt() {
        let current = Rotator::new(1.5, 33.3, -2.);
        let target = Rotator::from_yaw(-120.);
        assert_eq!(r_interp_to(current, target, 0., 10.), current);
        assert_eq!(r_interp_constant_to(current, target, 0., 0.), current);
        assert_eq!(r_interp_constant_to(current, target, -1., 100.), current);
        assert_eq!(f_interp_to(0.25, 1., 0., 12.), 0.25);
    }

    #[test]
    fn constant_interpolation_takes_shortest_path() {
        let current = Rotator::from_yaw(170.);
        let target = Rotator::from_yaw(-170.);
        let next = r_interp_constant_to(current, target, 0.01, 500.);
        assert!(approx(next.yaw, 175.));

        // Zero speed snaps instantly
        let snapped = r_interp_constant_to(current, target, 0.01, 0.);
        assert!(approx(snapped.yaw, -170.));
    }

    #[test]
    fn exponential_interpolation_moves_fraction_of_distance() {
        let next = r_interp_to(Rotator::ZERO, Rotator::from_yaw(100.), 0.1, 5.);
        assert!(approx(next.yaw, 50.));

        let clamped = r_interp_to(Rotator::ZERO, Rotator::from_yaw(100.), 1., 5.);
        assert!(approx(clamped.yaw, 100.));

        assert!(approx(f_interp_to(0., 1., 0.05, 12.), 0.6));
    }
}
