//! Narrow interfaces to the collaborators a locomotion controller talks to: the movement
//! integrator and the animation consumer.

use crate::settings::MovementTuning;
use bevy::math::Vec3;
use bevy::platform::collections::HashMap;
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

/// Movement mode reported by the movement integrator.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    #[default]
    None,
    Walking,
    NavWalking,
    Falling,
    Swimming,
    Flying,
    Custom,
}

/// The physics side of a character.
///
/// [`step_frame`](crate::frame::step_frame) calls [`MovementFacade::step`] before anything
/// else reads from it, so every getter returns this frame's values.
pub trait MovementFacade {
    /// Advances the integrator. Hosts whose physics already ran this frame (e.g. in an
    /// earlier scheduled system) keep the default no-op.
    fn step(&mut self, _dt: f32) {}

    /// World-space movement request for the next step, in the locomotion frame.
    fn add_movement_input(&mut self, _request: Vec3) {}

    fn velocity(&self) -> Vec3;

    /// Input acceleration, already clamped to [`MovementFacade::max_acceleration`].
    fn current_acceleration(&self) -> Vec3;

    fn max_acceleration(&self) -> f32;

    fn max_braking_deceleration(&self) -> f32;

    fn movement_mode(&self) -> MovementMode;

    /// Whether root motion currently owns the character's rotation.
    fn has_root_motion(&self) -> bool;

    /// Receives speed, acceleration and friction limits resolved from the active settings.
    fn apply_tuning(&mut self, tuning: &MovementTuning);
}

/// Named scalar curves published by the currently playing animation.
pub trait AnimCurveSource {
    /// Value of the named curve, `0.0` when the curve is not playing.
    fn curve_value(&self, name: &str) -> f32;
}

/// Animation yaw offset added to the control yaw in looking-direction mode.
pub const YAW_OFFSET: &str = "YawOffset";
/// Per-frame turn in place rotation, authored at 30 frames per second.
pub const ROTATION_AMOUNT: &str = "RotationAmount";
/// Gait weight of the blended locomotion cycle: 1 walk, 2 run, 3 sprint.
pub const WEIGHT_GAIT: &str = "Weight_Gait";
/// Weight of the crouching base pose.
pub const BASE_POSE_CROUCH: &str = "BasePose_CLF";

/// No animation attached: every curve reads zero.
impl AnimCurveSource for () {
    fn curve_value(&self, _name: &str) -> f32 {
        0.
    }
}

impl AnimCurveSource for HashMap<String, f32> {
    fn curve_value(&self, name: &str) -> f32 {
        self.get(name).copied().unwrap_or(0.)
    }
}

impl<T: AnimCurveSource + ?Sized> AnimCurveSource for &T {
    fn curve_value(&self, name: &str) -> f32 {
        (**self).curve_value(name)
    }
}
