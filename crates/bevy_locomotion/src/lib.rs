//! # Bevy Locomotion
//!
//! Character locomotion for [Bevy](https://bevyengine.org/), built on
//! [`bevy_locomotion_core`].
//!
//! Add [`LocomotionPlugin`] and spawn entities with a [`LocomotionCharacter`] pointing at a
//! `*.locomotion.ron` profile:
//!
//! ```ignore
//!     commands.spawn((
//!         LocomotionCharacter::new(asset_server.load("locomotion/default.locomotion.ron")),
//!         Transform::default(),
//!     ));
//! ```
//!
//! Once the profile loads, the [`Locomotion`] and [`LocomotionAnimation`] components are
//! added. Write operator input to [`LocomotionControl`] every frame and read the blend values
//! from [`LocomotionAnimation`]. Curve values published by the character's animation go in
//! [`AnimationCurveValues`].
//!
//! If set up fails (e.g. the profile has no row for the configured movement model), an error
//! is logged and the [`LocomotionFailed`] component is added instead.
//!
//! Characters without a physics rigid body are moved by their [`MovementBody`]. With the
//! `physics_avian` feature, bodies carrying an avian rigid body get their planar velocity from
//! the [`MovementBody`] and are otherwise left to the physics engine.
//!
//! [`LocomotionPlugin`]: crate::plugin::LocomotionPlugin
//! [`LocomotionCharacter`]: crate::components::LocomotionCharacter
//! [`Locomotion`]: crate::components::Locomotion
//! [`LocomotionAnimation`]: crate::components::LocomotionAnimation
//! [`LocomotionControl`]: crate::components::LocomotionControl
//! [`AnimationCurveValues`]: crate::components::AnimationCurveValues
//! [`LocomotionFailed`]: crate::components::LocomotionFailed
//! [`MovementBody`]: crate::components::MovementBody

pub mod components;
pub mod errors;
pub mod plugin;
pub mod profile;
pub mod space_conversion;
mod systems;

pub use bevy_locomotion_core as core;

pub mod prelude {
    pub use super::components::{
        AnimationCurveValues, Locomotion, LocomotionAnimation, LocomotionCharacter,
        LocomotionControl, LocomotionFailed, MovementBody, TraversalRequests,
    };
    pub use super::plugin::{LocomotionPlugin, LocomotionSet};
    pub use super::profile::{LocomotionProfile, loader::LocomotionProfileLoader};
    pub use super::space_conversion::{facing_to_bevy, rotator_from_bevy};
    pub use bevy_locomotion_core::prelude::*;
}
