//! The animation driver turns a character's movement into the continuous blend values an
//! animation graph samples: directional blend weights, stride length and play rates.

use crate::{
    controller::LocomotionController,
    curve::{FloatCurve, SampleCurve},
    errors::{LocomotionError, LocomotionResult},
    facade::{AnimCurveSource, BASE_POSE_CROUCH, MovementFacade, WEIGHT_GAIT},
    math::{Rotator, f_interp_to},
    state::Gait,
};
use bevy::{math::Vec3, reflect::Reflect};
use serde::{Deserialize, Serialize};

/// Bias applied to the gait weight before blending walk towards run.
const GAIT_WEIGHT_BIAS: f32 = -1.;
/// Bias applied to the gait weight before blending towards sprint.
const SPRINT_WEIGHT_BIAS: f32 = -2.;
/// The crouch pose weight is already in `[0, 1]`; a -1 bias would zero it for every pose.
const CROUCH_WEIGHT_BIAS: f32 = 0.;

const MAX_STANDING_PLAY_RATE: f32 = 3.;
const MAX_CROUCHING_PLAY_RATE: f32 = 2.;

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationDriverConfig {
    /// Speed the walk cycle was authored at
    pub animated_walk_speed: f32,
    pub animated_run_speed: f32,
    pub animated_sprint_speed: f32,
    pub animated_crouch_speed: f32,
    pub velocity_blend_interp_speed: f32,
    /// Keyed by `|forward + backward|` of the velocity blend
    pub diagonal_scale_amount_curve: FloatCurve,
    /// Stride curves are keyed by speed
    pub stride_blend_walk_curve: FloatCurve,
    pub stride_blend_run_curve: FloatCurve,
    pub stride_blend_crouch_curve: FloatCurve,
}

impl Default for AnimationDriverConfig {
    fn default() -> Self {
        Self {
            animated_walk_speed: 150.,
            animated_run_speed: 350.,
            animated_sprint_speed: 600.,
            animated_crouch_speed: 150.,
            velocity_blend_interp_speed: 12.,
            diagonal_scale_amount_curve: FloatCurve::default(),
            stride_blend_walk_curve: FloatCurve::default(),
            stride_blend_run_curve: FloatCurve::default(),
            stride_blend_crouch_curve: FloatCurve::default(),
        }
    }
}

impl AnimationDriverConfig {
    pub fn validate(&self) -> LocomotionResult<()> {
        for (name, speed) in [
            ("animated_walk_speed", self.animated_walk_speed),
            ("animated_run_speed", self.animated_run_speed),
            ("animated_sprint_speed", self.animated_sprint_speed),
            ("animated_crouch_speed", self.animated_crouch_speed),
        ] {
            if !speed.is_finite() || speed <= 0. {
                return Err(LocomotionError::InvalidAnimatedSpeed(name, speed));
            }
        }

        self.diagonal_scale_amount_curve
            .require("diagonal scale amount curve")?;
        self.stride_blend_walk_curve
            .require("stride blend walk curve")?;
        self.stride_blend_run_curve.require("stride blend run curve")?;
        self.stride_blend_crouch_curve
            .require("stride blend crouch curve")?;
        Ok(())
    }
}

/// Directional weights of the locomotion cycle, each in `[0, 1]`.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityBlend {
    pub forward: f32,
    pub backward: f32,
    pub left: f32,
    pub right: f32,
}

impl VelocityBlend {
    pub const ZERO: Self = Self {
        forward: 0.,
        backward: 0.,
        left: 0.,
        right: 0.,
    };

    /// Moves each weight exponentially towards `target`.
    pub fn interp_to(self, target: Self, dt: f32, speed: f32) -> Self {
        Self {
            forward: f_interp_to(self.forward, target.forward, dt, speed),
            backward: f_interp_to(self.backward, target.backward, dt, speed),
            left: f_interp_to(self.left, target.left, dt, speed),
            right: f_interp_to(self.right, target.right, dt, speed),
        }
    }
}

/// Animation-authored blend weights read back from the playing animation.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct GaitWeights {
    /// Raw `Weight_Gait`: 1 walk, 2 run, 3 sprint
    pub gait: f32,
    /// Raw crouch base pose weight
    pub crouch: f32,
}

impl GaitWeights {
    pub fn from_curves<C: AnimCurveSource + ?Sized>(curves: &C) -> Self {
        Self {
            gait: curves.curve_value(WEIGHT_GAIT),
            crouch: curves.curve_value(BASE_POSE_CROUCH),
        }
    }

    /// Walk to run weight, in `[0, 1]`.
    pub fn walk_run(&self) -> f32 {
        (self.gait + GAIT_WEIGHT_BIAS).clamp(0., 1.)
    }

    /// Run to sprint weight, in `[0, 1]`.
    pub fn run_sprint(&self) -> f32 {
        (self.gait + SPRINT_WEIGHT_BIAS).clamp(0., 1.)
    }

    /// Standing to crouching weight, in `[0, 1]`.
    pub fn crouched(&self) -> f32 {
        (self.crouch + CROUCH_WEIGHT_BIAS).clamp(0., 1.)
    }
}

/// Everything the driver reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriverInputs {
    pub velocity: Vec3,
    /// Physical acceleration, derived from the change in velocity
    pub acceleration: Vec3,
    pub speed: f32,
    pub gait: Gait,
    pub actor_rotation: Rotator,
    pub max_acceleration: f32,
    pub max_braking_deceleration: f32,
    pub weights: GaitWeights,
    /// Uniform scale of the character mesh
    pub mesh_scale: f32,
}

impl DriverInputs {
    /// Collects this frame's inputs after the controller has ticked.
    pub fn gather<M, C>(
        controller: &LocomotionController,
        movement: &M,
        curves: &C,
        mesh_scale: f32,
    ) -> Self
    where
        M: MovementFacade + ?Sized,
        C: AnimCurveSource + ?Sized,
    {
        let sample = controller.movement_info();
        Self {
            velocity: sample.velocity(),
            acceleration: sample.acceleration(),
            speed: sample.speed(),
            gait: controller.state().gait(),
            actor_rotation: controller.actor_rotation(),
            max_acceleration: movement.max_acceleration(),
            max_braking_deceleration: movement.max_braking_deceleration(),
            weights: GaitWeights::from_curves(curves),
            mesh_scale,
        }
    }
}

/// Values published to the animation graph every frame.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendOutputs {
    /// Smoothed across frames
    pub velocity_blend: VelocityBlend,
    pub diagonal_scale_amount: f32,
    /// Acceleration relative to the facing, each axis in `[-1, 1]`
    pub relative_acceleration: Vec3,
    pub walk_run_blend: f32,
    pub stride_blend: f32,
    /// In `[0, 3]`
    pub standing_play_rate: f32,
    /// In `[0, 2]`
    pub crouching_play_rate: f32,
}

#[derive(Reflect, Debug, Clone)]
pub struct AnimationDriver {
    config: AnimationDriverConfig,
    outputs: BlendOutputs,
}

impl AnimationDriver {
    pub fn new(config: AnimationDriverConfig) -> LocomotionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            outputs: BlendOutputs::default(),
        })
    }

    pub fn config(&self) -> &AnimationDriverConfig {
        &self.config
    }

    /// Outputs of the last [`AnimationDriver::evaluate`].
    pub fn outputs(&self) -> &BlendOutputs {
        &self.outputs
    }

    /// Recomputes the blend outputs. Only the velocity blend carries over between frames;
    /// with a non-positive `dt` it stays where it was.
    pub fn evaluate(&mut self, dt: f32, inputs: &DriverInputs) -> &BlendOutputs {
        let config = &self.config;

        let target_blend = velocity_blend_target(inputs.velocity, inputs.actor_rotation);
        let velocity_blend = self.outputs.velocity_blend.interp_to(
            target_blend,
            dt,
            config.velocity_blend_interp_speed,
        );

        let stride_blend = stride_blend(config, inputs.speed, &inputs.weights);

        self.outputs = BlendOutputs {
            velocity_blend,
            diagonal_scale_amount: diagonal_scale_amount(
                &config.diagonal_scale_amount_curve,
                &velocity_blend,
            ),
            relative_acceleration: relative_acceleration(
                inputs.acceleration,
                inputs.velocity,
                inputs.actor_rotation,
                inputs.max_acceleration,
                inputs.max_braking_deceleration,
            ),
            walk_run_blend: walk_run_blend(inputs.gait),
            stride_blend,
            standing_play_rate: standing_play_rate(
                config,
                inputs.speed,
                stride_blend,
                &inputs.weights,
                inputs.mesh_scale,
            ),
            crouching_play_rate: crouching_play_rate(
                config,
                inputs.speed,
                stride_blend,
                inputs.mesh_scale,
            ),
        };
        &self.outputs
    }
}

/// Direction of travel relative to the facing, split into four one-sided weights whose sum
/// is 1 while moving.
pub fn velocity_blend_target(velocity: Vec3, actor_rotation: Rotator) -> VelocityBlend {
    let local = actor_rotation.unrotate_vector(velocity.normalize_or_zero());
    let sum = local.x.abs() + local.y.abs() + local.z.abs();
    if sum <= 0. {
        return VelocityBlend::ZERO;
    }
    let relative = local / sum;

    VelocityBlend {
        forward: relative.x.clamp(0., 1.),
        backward: relative.x.clamp(-1., 0.).abs(),
        left: relative.y.clamp(-1., 0.).abs(),
        right: relative.y.clamp(0., 1.),
    }
}

pub fn diagonal_scale_amount(curve: &FloatCurve, velocity_blend: &VelocityBlend) -> f32 {
    curve.sample((velocity_blend.forward + velocity_blend.backward).abs())
}

/// Acceleration (or braking) relative to its limit, expressed in the facing's frame.
pub fn relative_acceleration(
    acceleration: Vec3,
    velocity: Vec3,
    actor_rotation: Rotator,
    max_acceleration: f32,
    max_braking_deceleration: f32,
) -> Vec3 {
    let limit = if acceleration.dot(velocity) > 0. {
        max_acceleration
    } else {
        max_braking_deceleration
    };
    if limit <= 0. {
        return Vec3::ZERO;
    }

    let amount = acceleration.clamp_length_max(limit) / limit;
    actor_rotation.unrotate_vector(amount)
}

/// 1 once the character runs or sprints, 0 while walking.
pub fn walk_run_blend(gait: Gait) -> f32 {
    match gait {
        Gait::Walking => 0.,
        Gait::Running | Gait::Sprinting => 1.,
    }
}

/// Stride length factor matching the current speed, blended across gait and stance.
pub fn stride_blend(config: &AnimationDriverConfig, speed: f32, weights: &GaitWeights) -> f32 {
    let walk = config.stride_blend_walk_curve.sample(speed);
    let run = config.stride_blend_run_curve.sample(speed);
    let crouch = config.stride_blend_crouch_curve.sample(speed);

    let standing = walk + (run - walk) * weights.walk_run();
    standing + (crouch - standing) * weights.crouched()
}

pub fn standing_play_rate(
    config: &AnimationDriverConfig,
    speed: f32,
    stride_blend: f32,
    weights: &GaitWeights,
    mesh_scale: f32,
) -> f32 {
    let walk = speed / config.animated_walk_speed;
    let run = speed / config.animated_run_speed;
    let sprint = speed / config.animated_sprint_speed;

    let walk_run = walk + (run - walk) * weights.walk_run();
    let rate = walk_run + (sprint - walk_run) * weights.run_sprint();
    scale_play_rate(rate, stride_blend, mesh_scale).clamp(0., MAX_STANDING_PLAY_RATE)
}

pub fn crouching_play_rate(
    config: &AnimationDriverConfig,
    speed: f32,
    stride_blend: f32,
    mesh_scale: f32,
) -> f32 {
    let rate = speed / config.animated_crouch_speed;
    scale_play_rate(rate, stride_blend, mesh_scale).clamp(0., MAX_CROUCHING_PLAY_RATE)
}

/// Divides out stride and mesh scale. Non-positive divisors are skipped, and a non-finite
/// result plays at rate zero.
fn scale_play_rate(rate: f32, stride_blend: f32, mesh_scale: f32) -> f32 {
    let mut rate = rate;
    if stride_blend > 0. {
        rate /= stride_blend;
    }
    if mesh_scale > 0. {
        rate /= mesh_scale;
    }
    if rate.is_nan() { 0. } else { rate }
}
