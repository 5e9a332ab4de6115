use super::LocomotionController;
use crate::{
    facade::MovementFacade,
    math::{Rotator, normalize_axis},
    sample::PhysicalSample,
    settings::MovementSettings,
    state::{Gait, RotationMode, Stance},
};

/// Input amount above which sprinting is possible.
const SPRINT_INPUT_THRESHOLD: f32 = 0.9;
/// Largest angle between input and aim that still allows sprinting in looking-direction mode.
const SPRINT_MAX_AIM_DELTA: f32 = 50.;
/// Margin above a speed threshold before the faster gait kicks in.
const GAIT_HYSTERESIS: f32 = 10.;

/// Whether the character may sprint this frame.
pub fn can_sprint(sample: &PhysicalSample, rotation_mode: RotationMode) -> bool {
    if !sample.has_movement_input() || rotation_mode == RotationMode::Aiming {
        return false;
    }
    let pushing = sample.movement_input_amount() > SPRINT_INPUT_THRESHOLD;

    match rotation_mode {
        RotationMode::VelocityDirection => pushing,
        RotationMode::LookingDirection => {
            let input_yaw = Rotator::from_direction(sample.current_acceleration()).yaw;
            let aim_delta = normalize_axis(input_yaw - sample.aim_rotation().yaw);
            pushing && aim_delta.abs() < SPRINT_MAX_AIM_DELTA
        }
        RotationMode::Aiming => false,
    }
}

/// Fastest gait the stance and sprint eligibility permit for the desired gait.
pub fn allowed_gait(stance: Stance, desired_gait: Gait, can_sprint: bool) -> Gait {
    match (stance, desired_gait) {
        (Stance::Standing, Gait::Sprinting) if can_sprint => Gait::Sprinting,
        (Stance::Standing, Gait::Sprinting) => Gait::Running,
        (Stance::Standing, desired) => desired,
        (Stance::Crouching, Gait::Walking) => Gait::Walking,
        (Stance::Crouching, _) => Gait::Running,
    }
}

/// Gait matching the current speed. Only reports sprinting when it is allowed.
pub fn actual_gait(speed: f32, settings: &MovementSettings, allowed_gait: Gait) -> Gait {
    if speed >= settings.run_speed + GAIT_HYSTERESIS {
        if allowed_gait == Gait::Sprinting {
            Gait::Sprinting
        } else {
            Gait::Running
        }
    } else if speed >= settings.walk_speed + GAIT_HYSTERESIS {
        Gait::Running
    } else {
        Gait::Walking
    }
}

impl LocomotionController {
    /// Grounded gait resolution: selects the settings for the current modes, resolves the
    /// allowed and actual gait and retunes the movement integrator.
    pub(super) fn update_character_movement<M>(&mut self, movement: &mut M)
    where
        M: MovementFacade + ?Sized,
    {
        self.refresh_settings();

        let can_sprint = can_sprint(&self.sample, self.state.rotation_mode);
        self.allowed_gait = allowed_gait(self.state.stance, self.desired_gait, can_sprint);

        let actual = actual_gait(self.sample.speed(), &self.settings, self.allowed_gait);
        self.set_gait(actual);

        let tuning = self.settings.tuning(self.allowed_gait, self.sample.speed());
        movement.apply_tuning(&tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::{
            ControllerConfig,
            tests::{TestBody, grounded_controller},
        },
        input::ControlInput,
        sample::PhysicalSignals,
        settings::tests::test_settings,
    };
    use bevy::math::Vec3;

    /// Input pushed at `amount` of the max acceleration, `angle` degrees right of the aim.
    fn sample_with_input(angle: f32, amount: f32) -> PhysicalSample {
        let direction = Rotator::from_yaw(angle).forward();
        PhysicalSample::from_signals(&PhysicalSignals {
            current_acceleration: direction * amount * 1000.,
            max_acceleration: 1000.,
            movement_input: direction,
            ..Default::default()
        })
    }

    #[test]
    fn sprint_gate_in_looking_direction() {
        assert!(can_sprint(
            &sample_with_input(49., 0.95),
            RotationMode::LookingDirection
        ));
        assert!(!can_sprint(
            &sample_with_input(51., 0.95),
            RotationMode::LookingDirection
        ));
        assert!(!can_sprint(
            &sample_with_input(-51., 0.95),
            RotationMode::LookingDirection
        ));
    }

    #[test]
    fn velocity_direction_ignores_aim_angle() {
        assert!(can_sprint(
            &sample_with_input(49., 0.95),
            RotationMode::VelocityDirection
        ));
        assert!(can_sprint(
            &sample_with_input(51., 0.95),
            RotationMode::VelocityDirection
        ));
        assert!(can_sprint(
            &sample_with_input(180., 0.95),
            RotationMode::VelocityDirection
        ));
    }

    #[test]
    fn sprint_needs_full_input_and_no_aiming() {
        assert!(!can_sprint(
            &sample_with_input(0., 0.85),
            RotationMode::VelocityDirection
        ));
        assert!(!can_sprint(&sample_with_input(0., 1.), RotationMode::Aiming));
        assert!(!can_sprint(
            &PhysicalSample::default(),
            RotationMode::VelocityDirection
        ));
    }

    #[test]
    fn allowed_gait_by_stance() {
        assert_eq!(
            allowed_gait(Stance::Standing, Gait::Sprinting, true),
            Gait::Sprinting
        );
        assert_eq!(
            allowed_gait(Stance::Standing, Gait::Sprinting, false),
            Gait::Running
        );
        assert_eq!(
            allowed_gait(Stance::Standing, Gait::Running, false),
            Gait::Running
        );
        assert_eq!(
            allowed_gait(Stance::Standing, Gait::Walking, true),
            Gait::Walking
        );
        assert_eq!(
            allowed_gait(Stance::Crouching, Gait::Sprinting, true),
            Gait::Running
        );
        assert_eq!(
            allowed_gait(Stance::Crouching, Gait::Walking, true),
            Gait::Walking
        );
    }

    #[test]
    fn actual_gait_hysteresis() {
        let settings = test_settings(150., 350., 600.);

        assert_eq!(actual_gait(159.9, &settings, Gait::Running), Gait::Walking);
        assert_eq!(actual_gait(160., &settings, Gait::Running), Gait::Running);
        assert_eq!(actual_gait(359.9, &settings, Gait::Sprinting), Gait::Running);
        assert_eq!(actual_gait(360., &settings, Gait::Sprinting), Gait::Sprinting);
        assert_eq!(actual_gait(360., &settings, Gait::Running), Gait::Running);
        // Exactly at the threshold is still the slower gait
        assert_eq!(actual_gait(350., &settings, Gait::Sprinting), Gait::Running);
        assert_eq!(actual_gait(150., &settings, Gait::Running), Gait::Walking);
    }

    #[test]
    fn sprinting_at_speed_end_to_end() {
        let mut controller = grounded_controller(ControllerConfig {
            desired_gait: Gait::Sprinting,
            desired_rotation_mode: RotationMode::VelocityDirection,
            ..Default::default()
        });
        let mut body = TestBody::grounded();
        body.velocity = Vec3::new(400., 0., 0.);
        body.current_acceleration = Vec3::new(2000., 0., 0.);

        let control = ControlInput::new(Rotator::ZERO, 1., 0.);
        controller.tick(1. / 60., &mut body, &control, &());

        assert_eq!(controller.allowed_gait(), Gait::Sprinting);
        assert_eq!(controller.state().gait(), Gait::Sprinting);

        let tuning = body.tuning.unwrap();
        assert_eq!(tuning.max_walk_speed, 600.);
    }

    #[test]
    fn crouched_settings_drive_gait() {
        let mut controller = grounded_controller(ControllerConfig {
            desired_stance: Stance::Crouching,
            ..Default::default()
        });
        let mut body = TestBody::grounded();
        body.velocity = Vec3::new(250., 0., 0.);

        controller.tick(1. / 60., &mut body, &ControlInput::default(), &());

        // Crouched thresholds are 100 / 200 / 300
        assert_eq!(controller.settings().run_speed, 200.);
        assert_eq!(controller.state().gait(), Gait::Running);
        assert_eq!(body.tuning.unwrap().max_walk_speed_crouched, 200.);
    }
}
