pub mod loader;

use bevy::{
    asset::{Asset, ReflectAsset},
    reflect::Reflect,
};
use bevy_locomotion_core::{
    driver::AnimationDriverConfig, errors::LocomotionResult, settings::MovementModelTable,
};
use serde::{Deserialize, Serialize};

/// Everything needed to set up a family of characters, loaded from `*.locomotion.ron` files.
///
/// ```ron
/// (
///     movement_models: {
///         "Normal": (velocity_direction: (...), looking_direction: (...), aiming: (...)),
///     },
///     animation: (
///         animated_walk_speed: 150.0,
///         diagonal_scale_amount_curve: [(0.0, 1.0), (1.0, 0.0)],
///         ...
///     ),
/// )
/// ```
#[derive(Asset, Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[reflect(Asset)]
pub struct LocomotionProfile {
    pub movement_models: MovementModelTable,
    #[serde(default)]
    pub animation: AnimationDriverConfig,
}

impl LocomotionProfile {
    pub fn validate(&self) -> LocomotionResult<()> {
        self.movement_models.validate()?;
        self.animation.validate()
    }
}
