use super::LocomotionController;
use crate::{
    curve::SampleCurve,
    facade::{AnimCurveSource, ROTATION_AMOUNT, YAW_OFFSET},
    math::{Rotator, map_range_clamped, normalize_axis},
    state::{Gait, MovementAction, RotationMode, ViewMode},
};

const ROLL_ACTOR_SPEED: f32 = 2.;

const VELOCITY_DIRECTION_TARGET_SPEED: f32 = 800.;
const LOOKING_DIRECTION_TARGET_SPEED: f32 = 500.;
const AIMING_TARGET_SPEED: f32 = 1000.;
const AIMING_ACTOR_SPEED: f32 = 20.;

/// Speed above which the character turns even without movement input.
const MOVING_ROTATION_SPEED: f32 = 150.;

/// Half width of the yaw dead band between control and facing while standing still.
const AIM_YAW_LIMIT: f32 = 100.;
const LIMIT_ACTOR_SPEED: f32 = 20.;

/// Frame rate the turn in place curves are authored at.
const TURN_IN_PLACE_CURVE_FPS: f32 = 30.;
const TURN_IN_PLACE_MIN_AMOUNT: f32 = 0.001;

const IN_AIR_ACTOR_SPEED: f32 = 5.;
const IN_AIR_AIMING_ACTOR_SPEED: f32 = 15.;

/// Aim yaw rate range mapped onto the `[1, 3]` rotation rate multiplier.
const AIM_YAW_RATE_RANGE: f32 = 300.;

impl LocomotionController {
    /// Actor interpolation speed for grounded rotation. Turning the camera quickly makes the
    /// body catch up faster.
    pub fn grounded_rotation_rate(&self) -> f32 {
        let mapped_speed = self.settings.mapped_speed(self.sample.speed());
        let curve_rate = self.settings.rotation_rate_curve.sample(mapped_speed);
        let aim_multiplier =
            map_range_clamped(self.sample.aim_yaw_rate(), 0., AIM_YAW_RATE_RANGE, 1., 3.);
        curve_rate * aim_multiplier
    }

    /// Whether the character is moving enough to turn with its movement.
    pub fn can_update_moving_rotation(&self, has_root_motion: bool) -> bool {
        let moving_with_input = self.sample.is_moving() && self.sample.has_movement_input();
        (moving_with_input || self.sample.speed() > MOVING_ROTATION_SPEED) && !has_root_motion
    }

    pub(super) fn update_grounded_rotation<C>(
        &mut self,
        dt: f32,
        has_root_motion: bool,
        curves: &C,
    ) where
        C: AnimCurveSource + ?Sized,
    {
        if dt <= 0. {
            return;
        }

        if self.state.movement_action == MovementAction::Rolling && self.sample.has_movement_input()
        {
            let desired = Rotator::from_yaw(self.rotation.last_movement_input().yaw);
            self.rotation.smooth(desired, dt, 0., ROLL_ACTOR_SPEED);
        } else if self.can_update_moving_rotation(has_root_motion) {
            self.update_moving_rotation(dt, curves);
        } else {
            self.update_standing_rotation(dt, curves);
        }
    }

    fn update_moving_rotation<C: AnimCurveSource + ?Sized>(&mut self, dt: f32, curves: &C) {
        let aim_yaw = self.sample.aim_rotation().yaw;
        let last_velocity_yaw = self.rotation.last_velocity().yaw;

        match self.state.rotation_mode {
            RotationMode::VelocityDirection => {
                let rate = self.grounded_rotation_rate();
                self.rotation.smooth(
                    Rotator::from_yaw(last_velocity_yaw),
                    dt,
                    VELOCITY_DIRECTION_TARGET_SPEED,
                    rate,
                );
            }
            RotationMode::LookingDirection => {
                let yaw = match self.state.gait {
                    Gait::Walking | Gait::Running => aim_yaw + curves.curve_value(YAW_OFFSET),
                    Gait::Sprinting => last_velocity_yaw,
                };
                let rate = self.grounded_rotation_rate();
                self.rotation.smooth(
                    Rotator::from_yaw(yaw),
                    dt,
                    LOOKING_DIRECTION_TARGET_SPEED,
                    rate,
                );
            }
            RotationMode::Aiming => {
                self.rotation.smooth(
                    Rotator::from_yaw(aim_yaw),
                    dt,
                    AIMING_TARGET_SPEED,
                    AIMING_ACTOR_SPEED,
                );
            }
        }
    }

    fn update_standing_rotation<C: AnimCurveSource + ?Sized>(&mut self, dt: f32, curves: &C) {
        if self.state.view_mode == ViewMode::FirstPerson
            || self.state.rotation_mode == RotationMode::Aiming
        {
            self.limit_rotation(dt, -AIM_YAW_LIMIT, AIM_YAW_LIMIT, LIMIT_ACTOR_SPEED);
            return;
        }

        // Turn in place animations drive the rotation through a curve
        let amount = curves.curve_value(ROTATION_AMOUNT);
        if amount.abs() > TURN_IN_PLACE_MIN_AMOUNT {
            // Snaps both stages, dropping any pending target offset
            let yaw = self.rotation.actor().yaw + amount * dt * TURN_IN_PLACE_CURVE_FPS;
            self.rotation.smooth(Rotator::from_yaw(yaw), dt, 0., 0.);
        }
    }

    /// Keeps the facing within `[min, max]` degrees of the control yaw.
    fn limit_rotation(&mut self, dt: f32, min: f32, max: f32, actor_speed: f32) {
        let aim_yaw = self.sample.aim_rotation().yaw;
        let delta = normalize_axis(aim_yaw - self.rotation.actor().yaw);
        if (min..=max).contains(&delta) {
            return;
        }

        let target_yaw = if delta > 0. { aim_yaw + min } else { aim_yaw + max };
        self.rotation
            .smooth(Rotator::from_yaw(target_yaw), dt, 0., actor_speed);
    }

    pub(super) fn update_in_air_rotation(&mut self, dt: f32) {
        if dt <= 0. {
            return;
        }

        match self.state.rotation_mode {
            RotationMode::VelocityDirection | RotationMode::LookingDirection => {
                let desired = Rotator::from_yaw(self.rotation.in_air().yaw);
                self.rotation.smooth(desired, dt, 0., IN_AIR_ACTOR_SPEED);
            }
            RotationMode::Aiming => {
                let desired = Rotator::from_yaw(self.sample.aim_rotation().yaw);
                self.rotation.smooth(desired, dt, 0., IN_AIR_AIMING_ACTOR_SPEED);
                self.rotation.set_in_air(self.rotation.actor());
            }
        }
    }
}
