use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    #[default]
    None,
    Grounded,
    InAir,
    Mantling,
    Ragdoll,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementAction {
    #[default]
    None,
    LowMantle,
    HighMantle,
    Rolling,
    GettingUp,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stance {
    #[default]
    Standing,
    Crouching,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gait {
    #[default]
    Walking,
    Running,
    Sprinting,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RotationMode {
    VelocityDirection,
    #[default]
    LookingDirection,
    Aiming,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    ThirdPerson,
    FirstPerson,
}

/// Pose layer the animation consumer applies on top of the base locomotion.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    #[default]
    Default,
    Masculine,
    Feminine,
    Injured,
    HandsTied,
    Rifle,
    Pistol1H,
    Pistol2H,
    Bow,
    Torch,
    Binoculars,
    Box,
    Barrel,
}

/// Discrete locomotion state of a character.
///
/// Read-only outside this crate: every change goes through a transition on
/// [`LocomotionController`](crate::controller::LocomotionController), which keeps
/// `rotation_mode` and `view_mode` consistent and tracks `previous_movement_state`.
#[derive(Reflect, Debug, Clone, PartialEq, Default)]
pub struct DiscreteState {
    pub(crate) movement_state: MovementState,
    pub(crate) previous_movement_state: MovementState,
    pub(crate) movement_action: MovementAction,
    pub(crate) stance: Stance,
    /// Speed-derived gait
    pub(crate) gait: Gait,
    pub(crate) rotation_mode: RotationMode,
    pub(crate) view_mode: ViewMode,
    pub(crate) overlay_state: OverlayState,
}

impl DiscreteState {
    pub fn movement_state(&self) -> MovementState {
        self.movement_state
    }

    pub fn previous_movement_state(&self) -> MovementState {
        self.previous_movement_state
    }

    pub fn movement_action(&self) -> MovementAction {
        self.movement_action
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation_mode
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay_state
    }
}
