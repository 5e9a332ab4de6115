use crate::{profile::LocomotionProfile, space_conversion::rotator_from_bevy};
use bevy::{
    asset::Handle,
    ecs::{component::Component, reflect::ReflectComponent},
    math::{Quat, Vec3},
    platform::collections::HashMap,
    prelude::{Deref, DerefMut},
    reflect::Reflect,
    transform::components::Transform,
};
use bevy_locomotion_core::{
    controller::{ControllerConfig, LocomotionController, TraversalRequest},
    driver::AnimationDriver,
    facade::{AnimCurveSource, MovementFacade, MovementMode},
    input::ControlInput,
    settings::MovementTuning,
};

/// Horizontal acceleration available while airborne, relative to the ground acceleration.
const AIR_CONTROL: f32 = 0.15;

/// Marks an entity as a locomotion character. Once its profile has loaded, the
/// [`Locomotion`] and [`LocomotionAnimation`] components are added; if the profile does not
/// fit the configuration, [`LocomotionFailed`] is added instead.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
#[require(Transform, MovementBody, LocomotionControl, AnimationCurveValues, TraversalRequests)]
pub struct LocomotionCharacter {
    pub profile: Handle<LocomotionProfile>,
    pub config: ControllerConfig,
    /// Uniform scale of the character mesh, used to correct play rates
    pub mesh_scale: f32,
}

impl LocomotionCharacter {
    pub fn new(profile: Handle<LocomotionProfile>) -> Self {
        Self {
            profile,
            config: ControllerConfig::default(),
            mesh_scale: 1.,
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }
}

#[derive(Component, Reflect, Debug, Clone, Deref, DerefMut)]
#[reflect(Component)]
pub struct Locomotion(pub LocomotionController);

/// Blend outputs are read through [`AnimationDriver::outputs`].
#[derive(Component, Reflect, Debug, Clone, Deref, DerefMut)]
#[reflect(Component)]
pub struct LocomotionAnimation(pub AnimationDriver);

/// Set up failed; the reason has been logged.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LocomotionFailed;

/// Operator input, in the locomotion frame.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, Deref, DerefMut)]
#[reflect(Component)]
pub struct LocomotionControl(pub ControlInput);

impl LocomotionControl {
    /// Input relative to a Bevy camera rotation.
    pub fn from_camera(camera_rotation: Quat, move_forward: f32, move_right: f32) -> Self {
        Self(ControlInput::new(
            rotator_from_bevy(camera_rotation),
            move_forward,
            move_right,
        ))
    }
}

/// Named curve values published by the character's animation, read back by locomotion.
#[derive(Component, Reflect, Debug, Clone, Default, Deref, DerefMut)]
#[reflect(Component)]
pub struct AnimationCurveValues(pub HashMap<String, f32>);

impl AnimCurveSource for AnimationCurveValues {
    fn curve_value(&self, name: &str) -> f32 {
        self.0.curve_value(name)
    }
}

/// Traversal work requested by the controller during the last frame.
#[derive(Component, Reflect, Debug, Clone, Default, Deref)]
#[reflect(Component)]
pub struct TraversalRequests(pub Vec<TraversalRequest>);

/// A simple kinematic movement integrator, in the locomotion frame.
///
/// Entities without a physics rigid body are moved by it directly: their [`Transform`]
/// follows the velocity and lands when falling below `ground_height` (in Bevy world units).
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct MovementBody {
    pub velocity: Vec3,
    pub mode: MovementMode,
    pub root_motion: bool,
    pub gravity: f32,
    pub ground_height: f32,
    tuning: MovementTuning,
    current_acceleration: Vec3,
    pending_input: Vec3,
}

impl Default for MovementBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mode: MovementMode::Walking,
            root_motion: false,
            gravity: 980.,
            ground_height: 0.,
            tuning: MovementTuning {
                max_walk_speed: 350.,
                max_walk_speed_crouched: 200.,
                max_acceleration: 1000.,
                braking_deceleration: 1000.,
                ground_friction: 8.,
            },
            current_acceleration: Vec3::ZERO,
            pending_input: Vec3::ZERO,
        }
    }
}

impl MovementBody {
    /// Leaves the ground with the given upward speed.
    pub fn jump(&mut self, vertical_speed: f32) {
        self.velocity.z = vertical_speed;
        self.mode = MovementMode::Falling;
    }

    pub fn land(&mut self) {
        self.velocity.z = 0.;
        self.mode = MovementMode::Walking;
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    fn step_grounded(&mut self, request: Vec3, dt: f32) {
        let planar = self.velocity.truncate();
        let planar = if request == Vec3::ZERO {
            let speed = planar.length();
            let friction = self.tuning.ground_friction * speed;
            let braking = (self.tuning.braking_deceleration + friction) * dt;
            planar.clamp_length_max((speed - braking).max(0.))
        } else {
            let max_speed = self.tuning.max_walk_speed * request.length();
            (planar + self.current_acceleration.truncate() * dt).clamp_length_max(max_speed)
        };
        self.velocity = planar.extend(0.);
    }

    /// Air control can steer but never pushes past the ground speed limit.
    fn step_falling(&mut self, dt: f32) {
        let planar = self.velocity.truncate();
        let max_speed = self.tuning.max_walk_speed.max(planar.length());
        let planar = (planar + self.current_acceleration.truncate() * AIR_CONTROL * dt)
            .clamp_length_max(max_speed);
        self.velocity = planar.extend(self.velocity.z - self.gravity * dt);
    }
}

impl MovementFacade for MovementBody {
    fn step(&mut self, dt: f32) {
        if dt <= 0. {
            return;
        }
        let request = std::mem::take(&mut self.pending_input).clamp_length_max(1.);
        self.current_acceleration = request * self.tuning.max_acceleration;

        match self.mode {
            MovementMode::Walking | MovementMode::NavWalking => self.step_grounded(request, dt),
            MovementMode::Falling => self.step_falling(dt),
            _ => {}
        }
    }

    fn add_movement_input(&mut self, request: Vec3) {
        self.pending_input += request;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn current_acceleration(&self) -> Vec3 {
        self.current_acceleration
    }

    fn max_acceleration(&self) -> f32 {
        self.tuning.max_acceleration
    }

    fn max_braking_deceleration(&self) -> f32 {
        self.tuning.braking_deceleration
    }

    fn movement_mode(&self) -> MovementMode {
        self.mode
    }

    fn has_root_motion(&self) -> bool {
        self.root_motion
    }

    fn apply_tuning(&mut self, tuning: &MovementTuning) {
        self.tuning = *tuning;
    }
}
