use crate::math::{Rotator, r_interp_constant_to, r_interp_to};
use bevy::reflect::Reflect;

/// Facing of a character and the headings it smooths towards.
///
/// The actor rotation always chases the target rotation. Every change to either goes through
/// the methods on this type, so the two cannot drift apart.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    target: Rotator,
    actor: Rotator,
    in_air: Rotator,
    last_velocity: Rotator,
    last_movement_input: Rotator,
}

impl RotationState {
    pub fn new(facing: Rotator) -> Self {
        let facing = facing.normalized();
        Self {
            target: facing,
            actor: facing,
            in_air: facing,
            last_velocity: facing,
            last_movement_input: facing,
        }
    }

    /// Two-stage smoothing towards `desired`.
    ///
    /// The target rotation first moves towards `desired` at a constant `target_speed` in
    /// degrees per second (`0` snaps it straight to `desired`), then the actor rotation moves
    /// towards the target exponentially at `actor_speed`. A non-positive `dt` changes nothing.
    pub fn smooth(&mut self, desired: Rotator, dt: f32, target_speed: f32, actor_speed: f32) {
        self.target = r_interp_constant_to(self.target, desired, dt, target_speed);
        self.actor = r_interp_to(self.actor, self.target, dt, actor_speed);
    }

    /// Sets the facing without smoothing, e.g. when spawning or teleporting.
    pub fn snap(&mut self, rotation: Rotator) {
        self.target = rotation.normalized();
        self.actor = self.target;
    }

    pub(crate) fn set_in_air(&mut self, rotation: Rotator) {
        self.in_air = rotation;
    }

    pub(crate) fn set_last_velocity(&mut self, rotation: Rotator) {
        self.last_velocity = rotation;
    }

    pub(crate) fn set_last_movement_input(&mut self, rotation: Rotator) {
        self.last_movement_input = rotation;
    }

    pub fn target(&self) -> Rotator {
        self.target
    }

    pub fn actor(&self) -> Rotator {
        self.actor
    }

    /// Facing captured when the character left the ground.
    pub fn in_air(&self) -> Rotator {
        self.in_air
    }

    /// Direction of the last non-trivial velocity.
    pub fn last_velocity(&self) -> Rotator {
        self.last_velocity
    }

    /// Direction of the last non-zero movement input.
    pub fn last_movement_input(&self) -> Rotator {
        self.last_movement_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dt_is_bit_identical() {
        let mut state = RotationState::new(Rotator::from_yaw(-33.3333));
        state.smooth(Rotator::from_yaw(90.), 0.1, 500., 5.);
        let before = state;

        state.smooth(Rotator::from_yaw(-170.), 0., 800., 10.);
        state.smooth(Rotator::from_yaw(-170.), 0., 0., 10.);
        assert_eq!(state, before);
        assert_eq!(state.target().yaw.to_bits(), before.target().yaw.to_bits());
        assert_eq!(state.actor().yaw.to_bits(), before.actor().yaw.to_bits());
    }

    #[test]
    fn target_leads_and_actor_follows() {
        let mut state = RotationState::new(Rotator::ZERO);
        state.smooth(Rotator::from_yaw(90.), 0.1, 100., 5.);

        // Target moved at constant speed, actor half way towards the target
        assert!((state.target().yaw - 10.).abs() < 1.0e-4);
        assert!((state.actor().yaw - 5.).abs() < 1.0e-4);

        // Zero target speed snaps the target
        state.smooth(Rotator::from_yaw(90.), 0.1, 0., 5.);
        assert!((state.target().yaw - 90.).abs() < 1.0e-4);
        assert!(state.actor().yaw < state.target().yaw);
    }

    #[test]
    fn actor_converges_without_overshoot() {
        let mut state = RotationState::new(Rotator::ZERO);
        for _ in 0..600 {
            state.smooth(Rotator::from_yaw(120.), 1. / 60., 800., 10.);
            assert!(state.actor().yaw <= 120. + 1.0e-3);
            assert!(state.actor().yaw <= state.target().yaw + 1.0e-3);
        }
        assert!((state.actor().yaw - 120.).abs() < 1.0e-2);
    }
}
