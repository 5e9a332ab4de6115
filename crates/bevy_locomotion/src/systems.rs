use crate::{
    components::{
        AnimationCurveValues, Locomotion, LocomotionAnimation, LocomotionCharacter,
        LocomotionControl, LocomotionFailed, MovementBody, TraversalRequests,
    },
    profile::LocomotionProfile,
    space_conversion::{facing_to_bevy, rotator_from_bevy, velocity_to_bevy},
};
use bevy::{
    asset::{AssetServer, Assets, LoadState},
    ecs::{
        entity::Entity,
        query::{With, Without},
        system::{Commands, Query, Res},
    },
    log::{debug, error},
    time::Time,
    transform::components::Transform,
};
use bevy_locomotion_core::{
    controller::{ControllerConfig, LocomotionController},
    driver::{AnimationDriver, DriverInputs},
    errors::LocomotionResult,
    facade::{MovementFacade, MovementMode},
    math::Rotator,
};

#[cfg(not(feature = "physics_avian"))]
type KinematicFilter = ();
#[cfg(feature = "physics_avian")]
type KinematicFilter = Without<avian3d::prelude::RigidBody>;

fn build_character(
    profile: &LocomotionProfile,
    config: ControllerConfig,
) -> LocomotionResult<(Locomotion, LocomotionAnimation)> {
    let controller = LocomotionController::new(&profile.movement_models, config)?;
    let driver = AnimationDriver::new(profile.animation.clone())?;
    Ok((Locomotion(controller), LocomotionAnimation(driver)))
}

/// Sets characters up once their profile is available. The initial facing comes from the
/// entity's [`Transform`].
#[allow(clippy::type_complexity)]
pub(crate) fn initialize_characters(
    mut commands: Commands,
    pending: Query<
        (Entity, &LocomotionCharacter, &Transform),
        (Without<Locomotion>, Without<LocomotionFailed>),
    >,
    profiles: Res<Assets<LocomotionProfile>>,
    asset_server: Res<AssetServer>,
) {
    for (entity, character, transform) in &pending {
        let Some(profile) = profiles.get(&character.profile) else {
            if let LoadState::Failed(err) = asset_server.load_state(character.profile.id()) {
                error!("Locomotion profile for {entity} failed to load: {err}");
                commands.entity(entity).insert(LocomotionFailed);
            }
            continue;
        };

        let facing = rotator_from_bevy(transform.rotation).yaw;
        let config = ControllerConfig {
            initial_rotation: Rotator::from_yaw(facing),
            ..character.config.clone()
        };

        match build_character(profile, config) {
            Ok(components) => {
                debug!("Locomotion character {entity} ready");
                commands.entity(entity).insert(components);
            }
            Err(err) => {
                error!("Could not set up locomotion character {entity}: {err}");
                commands.entity(entity).insert(LocomotionFailed);
            }
        }
    }
}

pub(crate) fn request_movement_input(
    mut characters: Query<(&Locomotion, &LocomotionControl, &mut MovementBody)>,
) {
    for (locomotion, control, mut body) in &mut characters {
        if let Some(request) = locomotion.movement_input_request(control) {
            body.add_movement_input(request);
        }
    }
}

pub(crate) fn step_movement_bodies(
    time: Res<Time>,
    mut bodies: Query<&mut MovementBody, With<Locomotion>>,
) {
    let dt = time.delta_secs();
    for mut body in &mut bodies {
        body.step(dt);
    }
}

/// Moves bodies that no physics engine is moving, landing them on their ground height.
pub(crate) fn move_kinematic_bodies(
    time: Res<Time>,
    mut bodies: Query<(&mut MovementBody, &mut Transform), KinematicFilter>,
) {
    let dt = time.delta_secs();
    for (mut body, mut transform) in &mut bodies {
        transform.translation += velocity_to_bevy(body.velocity) * dt;

        if body.mode == MovementMode::Falling
            && body.velocity.z <= 0.
            && transform.translation.y <= body.ground_height
        {
            transform.translation.y = body.ground_height;
            body.land();
        }
    }
}

#[cfg(feature = "physics_avian")]
pub(crate) fn sync_avian_velocity(
    mut bodies: Query<(&mut MovementBody, &mut avian3d::prelude::LinearVelocity)>,
) {
    use crate::space_conversion::UNITS_PER_METER;

    // Planar motion comes from the body, vertical motion from the physics engine
    for (mut body, mut linear_velocity) in &mut bodies {
        let planar = velocity_to_bevy(body.velocity.truncate().extend(0.));
        linear_velocity.0 = bevy::math::Vec3::new(planar.x, linear_velocity.0.y, planar.z);
        body.velocity.z = linear_velocity.0.y * UNITS_PER_METER;
    }
}

pub(crate) fn tick_controllers(
    time: Res<Time>,
    mut characters: Query<(
        &mut Locomotion,
        &mut MovementBody,
        &LocomotionControl,
        &AnimationCurveValues,
        &mut TraversalRequests,
    )>,
) {
    let dt = time.delta_secs();
    for (mut locomotion, mut body, control, curves, mut requests) in &mut characters {
        let mode = body.movement_mode();
        if mode != locomotion.pawn_movement_mode() {
            locomotion.on_movement_mode_changed(mode);
        }

        locomotion.tick(dt, &mut *body, control, curves);
        requests.0 = locomotion.take_traversal_requests();
    }
}

pub(crate) fn write_facing(mut characters: Query<(&Locomotion, &mut Transform)>) {
    for (locomotion, mut transform) in &mut characters {
        transform.rotation = facing_to_bevy(locomotion.actor_rotation());
    }
}

pub(crate) fn evaluate_drivers(
    time: Res<Time>,
    mut characters: Query<(
        &Locomotion,
        &mut LocomotionAnimation,
        &MovementBody,
        &AnimationCurveValues,
        &LocomotionCharacter,
    )>,
) {
    let dt = time.delta_secs();
    for (locomotion, mut animation, body, curves, character) in &mut characters {
        let inputs = DriverInputs::gather(locomotion, body, curves, character.mesh_scale);
        animation.evaluate(dt, &inputs);
    }
}
