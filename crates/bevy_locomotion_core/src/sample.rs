use crate::math::{Rotator, normalize_axis};
use bevy::math::Vec3;
use bevy::reflect::Reflect;

/// Speed above which a character counts as moving.
pub const MOVING_SPEED_THRESHOLD: f32 = 1.;

/// Raw per-frame signals the sample is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalSignals {
    pub velocity: Vec3,
    /// Input acceleration reported by the movement integrator
    pub current_acceleration: Vec3,
    pub max_acceleration: f32,
    /// Normalized input direction, zero when there is no input
    pub movement_input: Vec3,
    pub aim_rotation: Rotator,
}

/// Movement information recomputed every frame.
///
/// All fields are derived by [`PhysicalSample::update`]; they cannot be set individually.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalSample {
    velocity: Vec3,
    acceleration: Vec3,
    current_acceleration: Vec3,
    movement_input: Vec3,
    speed: f32,
    is_moving: bool,
    has_movement_input: bool,
    movement_input_amount: f32,
    aim_rotation: Rotator,
    aim_yaw_rate: f32,
}

impl PhysicalSample {
    /// Builds a sample from a single frame of signals, as if the previous frame had the same
    /// velocity and aim.
    pub fn from_signals(signals: &PhysicalSignals) -> Self {
        let mut sample = Self::default();
        sample.update(0., signals, signals.velocity, signals.aim_rotation.yaw);
        sample
    }

    /// Recomputes every field from this frame's signals and last frame's cached velocity and
    /// aim yaw. Rate-of-change values keep their previous value when `dt` is not positive.
    pub fn update(
        &mut self,
        dt: f32,
        signals: &PhysicalSignals,
        previous_velocity: Vec3,
        previous_aim_yaw: f32,
    ) {
        if dt > 0. {
            self.acceleration = (signals.velocity - previous_velocity) / dt;
            self.aim_yaw_rate = normalize_axis(signals.aim_rotation.yaw - previous_aim_yaw).abs() / dt;
        }

        self.velocity = signals.velocity;
        self.speed = signals.velocity.x.hypot(signals.velocity.y);
        self.is_moving = self.speed > MOVING_SPEED_THRESHOLD;

        self.current_acceleration = signals.current_acceleration;
        self.movement_input_amount = if signals.max_acceleration > 0. {
            (signals.current_acceleration.length() / signals.max_acceleration).clamp(0., 1.)
        } else {
            0.
        };
        self.has_movement_input = self.movement_input_amount > 0.;
        self.movement_input = signals.movement_input.normalize_or_zero();
        self.aim_rotation = signals.aim_rotation;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Physical acceleration, derived from the change in velocity.
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    pub fn current_acceleration(&self) -> Vec3 {
        self.current_acceleration
    }

    pub fn movement_input(&self) -> Vec3 {
        self.movement_input
    }

    /// Horizontal speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn has_movement_input(&self) -> bool {
        self.has_movement_input
    }

    /// Current input acceleration relative to the maximum, in `[0, 1]`.
    pub fn movement_input_amount(&self) -> f32 {
        self.movement_input_amount
    }

    pub fn aim_rotation(&self) -> Rotator {
        self.aim_rotation
    }

    /// How fast the camera is turning left or right, in degrees per second.
    pub fn aim_yaw_rate(&self) -> f32 {
        self.aim_yaw_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_values() {
        let signals = PhysicalSignals {
            velocity: Vec3::new(300., 400., -50.),
            current_acceleration: Vec3::new(0., 1000., 0.),
            max_acceleration: 2000.,
            movement_input: Vec3::new(0., 2., 0.),
            aim_rotation: Rotator::from_yaw(10.),
        };
        let mut sample = PhysicalSample::default();
        sample.update(0.5, &signals, Vec3::new(300., 300., -50.), 0.);

        assert!((sample.speed() - 500.).abs() < 1.0e-3);
        assert!(sample.is_moving());
        assert_eq!(sample.movement_input_amount(), 0.5);
        assert!(sample.has_movement_input());
        assert_eq!(sample.movement_input(), Vec3::Y);
        assert_eq!(sample.acceleration(), Vec3::new(0., 200., 0.));
        assert_eq!(sample.aim_yaw_rate(), 20.);
    }

    #[test]
    fn aim_yaw_rate_uses_shortest_turn() {
        let signals = PhysicalSignals {
            aim_rotation: Rotator::from_yaw(-175.),
            ..Default::default()
        };
        let mut sample = PhysicalSample::default();
        sample.update(0.1, &signals, Vec3::ZERO, 175.);
        assert!((sample.aim_yaw_rate() - 100.).abs() < 1.0e-3);
    }

    #[test]
    fn zero_max_acceleration_means_no_input() {
        let signals = PhysicalSignals {
            current_acceleration: Vec3::X,
            max_acceleration: 0.,
            ..Default::default()
        };
        let sample = PhysicalSample::from_signals(&signals);
        assert_eq!(sample.movement_input_amount(), 0.);
        assert!(!sample.has_movement_input());
    }

    #[test]
    fn zero_dt_keeps_rates() {
        let mut sample = PhysicalSample::default();
        let moving = PhysicalSignals {
            velocity: Vec3::X * 100.,
            ..Default::default()
        };
        sample.update(0.1, &moving, Vec3::ZERO, 0.);
        let acceleration = sample.acceleration();

        sample.update(0., &moving, Vec3::X * 100., 0.);
        assert_eq!(sample.acceleration(), acceleration);
    }
}
