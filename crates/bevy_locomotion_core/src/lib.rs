//! # Bevy Locomotion Core
//!
//! Engine-agnostic character locomotion: a state controller that decides how a character
//! moves and faces, and an animation driver that turns that movement into blend values for an
//! animation graph.
//!
//! ## Overview
//!
//! Each frame, for each character:
//!
//! 1. The movement integrator (anything implementing [`MovementFacade`]) is stepped and
//!    publishes velocity, input acceleration and its movement mode.
//! 2. The [`LocomotionController`] derives a [`PhysicalSample`], resolves gait and movement
//!    settings, and smooths the character's facing according to its rotation mode.
//! 3. The [`AnimationDriver`] computes the [`BlendOutputs`] an animation graph samples:
//!    directional velocity blend, stride blend, play rates and relative acceleration.
//!
//! [`step_frame`] runs these in the required order. Hosts that schedule the stages separately
//! (like the `bevy_locomotion` plugin) must keep the same order.
//!
//! Locomotion math uses its own frame: `X` forward, `Y` right, `Z` up, angles in degrees.
//!
//! ## Configuration
//!
//! Movement tuning comes from a [`MovementModelTable`], a RON map from archetype id to the
//! settings for every rotation mode and stance:
//!
//! ```ron
//! {
//!     "Normal": (
//!         velocity_direction: (standing: (walk_speed: 165.0, ...), crouching: (...)),
//!         looking_direction: (...),
//!         aiming: (...),
//!     ),
//! }
//! ```
//!
//! Tables, curves and animated speeds are validated when a controller or driver is built.
//! After that, per-frame evaluation cannot fail.
//!
//! [`MovementFacade`]: crate::facade::MovementFacade
//! [`LocomotionController`]: crate::controller::LocomotionController
//! [`PhysicalSample`]: crate::sample::PhysicalSample
//! [`AnimationDriver`]: crate::driver::AnimationDriver
//! [`BlendOutputs`]: crate::driver::BlendOutputs
//! [`step_frame`]: crate::frame::step_frame
//! [`MovementModelTable`]: crate::settings::MovementModelTable

pub mod controller;
pub mod curve;
pub mod driver;
pub mod errors;
pub mod facade;
pub mod frame;
pub mod input;
pub mod math;
pub mod rotation;
pub mod sample;
pub mod settings;
pub mod state;

pub mod prelude {
    pub use super::controller::{
        ControllerConfig, LocomotionController, MovementStates, TraversalRequest,
    };
    pub use super::curve::{FloatCurve, SampleCurve, VectorCurve};
    pub use super::driver::{
        AnimationDriver, AnimationDriverConfig, BlendOutputs, DriverInputs, GaitWeights,
        VelocityBlend,
    };
    pub use super::errors::{LocomotionError, LocomotionResult};
    pub use super::facade::{AnimCurveSource, MovementFacade, MovementMode};
    pub use super::frame::step_frame;
    pub use super::input::ControlInput;
    pub use super::math::Rotator;
    pub use super::rotation::RotationState;
    pub use super::sample::PhysicalSample;
    pub use super::settings::{
        MovementModel, MovementModelTable, MovementSettings, MovementTuning, StanceSettings,
    };
    pub use super::state::{
        DiscreteState, Gait, MovementAction, MovementState, OverlayState, RotationMode, Stance,
        ViewMode,
    };
}
