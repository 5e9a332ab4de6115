//! The locomotion state controller: owns a character's discrete state and facing, and advances
//! them once per frame from the movement integrator's signals.

mod gait;
mod rotation_update;

pub use gait::{actual_gait, allowed_gait, can_sprint};

use crate::{
    errors::LocomotionResult,
    facade::{AnimCurveSource, MovementFacade, MovementMode},
    input::{ControlInput, movement_input_request},
    math::Rotator,
    rotation::RotationState,
    sample::{PhysicalSample, PhysicalSignals},
    settings::{MovementModel, MovementModelTable, MovementSettings},
    state::{
        DiscreteState, Gait, MovementAction, MovementState, OverlayState, RotationMode, Stance,
        ViewMode,
    },
};
use bevy::{log::debug, math::Vec3, reflect::Reflect};
use serde::{Deserialize, Serialize};

/// Speed above which a jump keeps the velocity heading in the air.
const JUMP_VELOCITY_HEADING_SPEED: f32 = 100.;

/// Operator intent and initial state of a character.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Row of the movement model table this character uses
    pub movement_row: String,
    pub desired_gait: Gait,
    pub desired_stance: Stance,
    pub desired_rotation_mode: RotationMode,
    pub view_mode: ViewMode,
    pub overlay_state: OverlayState,
    pub initial_rotation: Rotator,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_row: "Normal".into(),
            desired_gait: Gait::Running,
            desired_stance: Stance::Standing,
            desired_rotation_mode: RotationMode::LookingDirection,
            view_mode: ViewMode::ThirdPerson,
            overlay_state: OverlayState::Default,
            initial_rotation: Rotator::ZERO,
        }
    }
}

/// Work the controller hands off to traversal collaborators. The host drains these with
/// [`LocomotionController::take_traversal_requests`]; until then each kind is queued at most
/// once.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalRequest {
    /// Airborne with movement input: a ledge may be mantled
    MantleCheck,
    /// Ragdoll is active and needs its per-frame update
    RagdollUpdate,
    /// Left the ground mid-roll
    RagdollStart,
}

/// Discrete state as read by the animation side.
#[derive(Reflect, Debug, Clone, PartialEq, Default)]
pub struct MovementStates {
    pub pawn_movement_mode: MovementMode,
    pub state: DiscreteState,
}

#[derive(Reflect, Debug, Clone)]
pub struct LocomotionController {
    model: MovementModel,
    /// Settings for the current rotation mode and stance
    settings: MovementSettings,
    state: DiscreteState,
    rotation: RotationState,
    sample: PhysicalSample,

    desired_gait: Gait,
    desired_stance: Stance,
    desired_rotation_mode: RotationMode,
    allowed_gait: Gait,

    pawn_movement_mode: MovementMode,
    previous_velocity: Vec3,
    previous_aim_yaw: f32,

    #[reflect(ignore)]
    traversal_requests: Vec<TraversalRequest>,
}

impl LocomotionController {
    /// Looks up the configured row and sets the character up. Fails if the row is missing or
    /// its settings are incomplete.
    pub fn new(table: &MovementModelTable, config: ControllerConfig) -> LocomotionResult<Self> {
        let model = table.row(&config.movement_row)?.clone();
        Self::from_model(model, config)
    }

    pub fn from_model(model: MovementModel, config: ControllerConfig) -> LocomotionResult<Self> {
        model.validate()?;

        let settings = model
            .settings(RotationMode::default(), Stance::default())
            .clone();

        let mut controller = Self {
            model,
            settings,
            state: DiscreteState::default(),
            rotation: RotationState::new(config.initial_rotation),
            sample: PhysicalSample::default(),
            desired_gait: config.desired_gait,
            desired_stance: config.desired_stance,
            desired_rotation_mode: config.desired_rotation_mode,
            allowed_gait: Gait::Walking,
            pawn_movement_mode: MovementMode::None,
            previous_velocity: Vec3::ZERO,
            previous_aim_yaw: config.initial_rotation.yaw,
            traversal_requests: Vec::new(),
        };

        // Bring the discrete state in line with the initial intent
        controller.set_gait(config.desired_gait);
        controller.set_rotation_mode(config.desired_rotation_mode);
        controller.set_view_mode(config.view_mode);
        controller.set_overlay_state(config.overlay_state);
        controller.set_stance(config.desired_stance);
        controller.refresh_settings();

        Ok(controller)
    }

    /// Advances the controller by one frame.
    ///
    /// The movement integrator must already have been stepped for this frame. Never fails: a
    /// non-positive `dt` leaves every smoothed value unchanged.
    pub fn tick<M, C>(&mut self, dt: f32, movement: &mut M, control: &ControlInput, curves: &C)
    where
        M: MovementFacade + ?Sized,
        C: AnimCurveSource + ?Sized,
    {
        self.update_sample(dt, &*movement, control);

        match self.state.movement_state {
            MovementState::Grounded => {
                self.update_character_movement(movement);
                self.update_grounded_rotation(dt, movement.has_root_motion(), curves);
            }
            MovementState::InAir => {
                self.update_in_air_rotation(dt);
                if self.sample.has_movement_input() {
                    self.request_traversal(TraversalRequest::MantleCheck);
                }
            }
            MovementState::Ragdoll => {
                self.request_traversal(TraversalRequest::RagdollUpdate);
            }
            MovementState::None | MovementState::Mantling => {}
        }

        self.previous_velocity = self.sample.velocity();
        self.previous_aim_yaw = self.sample.aim_rotation().yaw;
    }

    fn update_sample<M: MovementFacade + ?Sized>(
        &mut self,
        dt: f32,
        movement: &M,
        control: &ControlInput,
    ) {
        let signals = PhysicalSignals {
            velocity: movement.velocity(),
            current_acceleration: movement.current_acceleration(),
            max_acceleration: movement.max_acceleration(),
            movement_input: control.movement_direction(),
            aim_rotation: control.control_rotation,
        };
        self.sample
            .update(dt, &signals, self.previous_velocity, self.previous_aim_yaw);

        // Remember the last headings so they survive the character stopping
        if self.sample.is_moving() {
            self.rotation
                .set_last_velocity(Rotator::from_direction(self.sample.velocity()));
        }
        if self.sample.has_movement_input() {
            self.rotation.set_last_movement_input(Rotator::from_direction(
                self.sample.current_acceleration(),
            ));
        }
    }

    /// Selects the settings for the current rotation mode and stance.
    fn refresh_settings(&mut self) {
        let settings = self
            .model
            .settings(self.state.rotation_mode, self.state.stance);
        if *settings != self.settings {
            self.settings = settings.clone();
        }
    }

    // -----------------------------------------------------
    // --- Transitions
    // -----------------------------------------------------

    /// Callback for the movement integrator changing mode.
    pub fn on_movement_mode_changed(&mut self, mode: MovementMode) {
        self.pawn_movement_mode = mode;
        match mode {
            MovementMode::Walking | MovementMode::NavWalking => {
                self.set_movement_state(MovementState::Grounded)
            }
            MovementMode::Falling => self.set_movement_state(MovementState::InAir),
            _ => {}
        }
    }

    pub fn set_movement_state(&mut self, new_state: MovementState) {
        if self.state.movement_state == new_state {
            return;
        }
        debug!(
            "Movement state {:?} -> {:?}",
            self.state.movement_state, new_state
        );
        self.state.previous_movement_state = self.state.movement_state;
        self.state.movement_state = new_state;

        if new_state == MovementState::InAir {
            match self.state.movement_action {
                MovementAction::None => {
                    self.rotation.set_in_air(self.rotation.actor());
                    if self.state.stance == Stance::Crouching {
                        self.set_stance(Stance::Standing);
                    }
                }
                MovementAction::Rolling => {
                    self.request_traversal(TraversalRequest::RagdollStart);
                }
                _ => {}
            }
        }
    }

    pub fn set_movement_action(&mut self, new_action: MovementAction) {
        if self.state.movement_action == new_action {
            return;
        }
        debug!(
            "Movement action {:?} -> {:?}",
            self.state.movement_action, new_action
        );
        let previous_action = self.state.movement_action;
        self.state.movement_action = new_action;

        if new_action == MovementAction::Rolling {
            self.set_stance(Stance::Crouching);
        }
        if previous_action == MovementAction::Rolling {
            self.set_stance(self.desired_stance);
        }
    }

    pub fn set_stance(&mut self, new_stance: Stance) {
        if self.state.stance == new_stance {
            return;
        }
        debug!("Stance {:?} -> {:?}", self.state.stance, new_stance);
        self.state.stance = new_stance;
    }

    /// Actual gait transition, fired by gait resolution.
    fn set_gait(&mut self, new_gait: Gait) {
        if self.state.gait == new_gait {
            return;
        }
        debug!("Gait {:?} -> {:?}", self.state.gait, new_gait);
        self.state.gait = new_gait;
    }

    /// Sets the rotation mode. Switching to velocity direction while in first person also
    /// switches the view to third person.
    pub fn set_rotation_mode(&mut self, new_mode: RotationMode) {
        if self.state.rotation_mode == new_mode {
            return;
        }
        debug!(
            "Rotation mode {:?} -> {:?}",
            self.state.rotation_mode, new_mode
        );
        self.state.rotation_mode = new_mode;

        if new_mode == RotationMode::VelocityDirection && self.state.view_mode == ViewMode::FirstPerson
        {
            self.set_view_mode(ViewMode::ThirdPerson);
        }
    }

    /// Sets the view mode. First person never faces the velocity direction, so it switches
    /// velocity direction to looking direction; going back to third person restores the
    /// desired rotation mode.
    pub fn set_view_mode(&mut self, new_mode: ViewMode) {
        if self.state.view_mode == new_mode {
            return;
        }
        debug!("View mode {:?} -> {:?}", self.state.view_mode, new_mode);
        self.state.view_mode = new_mode;

        match (new_mode, self.state.rotation_mode) {
            (ViewMode::FirstPerson, RotationMode::VelocityDirection) => {
                self.set_rotation_mode(RotationMode::LookingDirection);
            }
            (
                ViewMode::ThirdPerson,
                RotationMode::VelocityDirection | RotationMode::LookingDirection,
            ) => {
                self.set_rotation_mode(self.desired_rotation_mode);
            }
            _ => {}
        }
    }

    pub fn set_overlay_state(&mut self, new_overlay: OverlayState) {
        if self.state.overlay_state == new_overlay {
            return;
        }
        debug!(
            "Overlay state {:?} -> {:?}",
            self.state.overlay_state, new_overlay
        );
        self.state.overlay_state = new_overlay;
    }

    pub fn set_desired_gait(&mut self, gait: Gait) {
        self.desired_gait = gait;
    }

    /// Records the stance the operator wants. It is applied immediately unless an action is
    /// in progress, in which case the action applies it when it ends.
    pub fn set_desired_stance(&mut self, stance: Stance) {
        self.desired_stance = stance;
        if self.state.movement_action == MovementAction::None {
            self.set_stance(stance);
        }
    }

    pub fn set_desired_rotation_mode(&mut self, mode: RotationMode) {
        self.desired_rotation_mode = mode;
        self.set_rotation_mode(mode);
    }

    /// Jump hook: picks the heading to hold while airborne.
    pub fn on_jumped(&mut self) {
        let in_air = if self.sample.speed() > JUMP_VELOCITY_HEADING_SPEED {
            self.rotation.last_velocity()
        } else {
            self.rotation.actor()
        };
        self.rotation.set_in_air(in_air);
    }

    /// Teleports the facing, bypassing smoothing.
    pub fn set_rotation_immediate(&mut self, rotation: Rotator) {
        self.rotation.snap(rotation);
    }

    /// Shaped movement request for the movement integrator, or `None` while the current
    /// movement state ignores input.
    pub fn movement_input_request(&self, control: &ControlInput) -> Option<Vec3> {
        match self.state.movement_state {
            MovementState::None | MovementState::Mantling | MovementState::Ragdoll => None,
            MovementState::Grounded | MovementState::InAir => Some(movement_input_request(
                control.control_rotation,
                control.move_forward,
                control.move_right,
            )),
        }
    }

    /// Pending traversal hand-offs, oldest first.
    pub fn take_traversal_requests(&mut self) -> Vec<TraversalRequest> {
        std::mem::take(&mut self.traversal_requests)
    }

    fn request_traversal(&mut self, request: TraversalRequest) {
        if !self.traversal_requests.contains(&request) {
            self.traversal_requests.push(request);
        }
    }

    // -----------------------------------------------------
    // --- Accessors
    // -----------------------------------------------------

    pub fn state(&self) -> &DiscreteState {
        &self.state
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Current facing of the character.
    pub fn actor_rotation(&self) -> Rotator {
        self.rotation.actor()
    }

    /// This frame's physical sample.
    pub fn movement_info(&self) -> &PhysicalSample {
        &self.sample
    }

    /// Snapshot of the discrete state together with the integrator's movement mode.
    pub fn movement_states(&self) -> MovementStates {
        MovementStates {
            pawn_movement_mode: self.pawn_movement_mode,
            state: self.state.clone(),
        }
    }

    pub fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    pub fn model(&self) -> &MovementModel {
        &self.model
    }

    /// Gait allowed by stance and sprint eligibility, as of the last grounded frame.
    pub fn allowed_gait(&self) -> Gait {
        self.allowed_gait
    }

    pub fn desired_gait(&self) -> Gait {
        self.desired_gait
    }

    pub fn desired_stance(&self) -> Stance {
        self.desired_stance
    }

    pub fn desired_rotation_mode(&self) -> RotationMode {
        self.desired_rotation_mode
    }

    /// Last movement mode reported by the movement integrator.
    pub fn pawn_movement_mode(&self) -> MovementMode {
        self.pawn_movement_mode
    }
}
