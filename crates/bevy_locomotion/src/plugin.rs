use bevy::{
    app::{App, Plugin, PreUpdate, Update},
    asset::AssetApp,
    ecs::{
        intern::Interned,
        schedule::{IntoScheduleConfigs, ScheduleLabel, SystemSet},
    },
};
use bevy_locomotion_core::{
    controller::{ControllerConfig, LocomotionController, MovementStates, TraversalRequest},
    driver::{AnimationDriver, AnimationDriverConfig, BlendOutputs, VelocityBlend},
    facade::MovementMode,
    input::ControlInput,
    math::Rotator,
    sample::PhysicalSample,
    settings::{MovementModel, MovementSettings, MovementTuning, StanceSettings},
    state::{
        DiscreteState, Gait, MovementAction, MovementState, OverlayState, RotationMode, Stance,
        ViewMode,
    },
};

use crate::{
    components::{
        AnimationCurveValues, Locomotion, LocomotionAnimation, LocomotionCharacter,
        LocomotionControl, LocomotionFailed, MovementBody, TraversalRequests,
    },
    profile::{LocomotionProfile, loader::LocomotionProfileLoader},
    systems::{
        evaluate_drivers, initialize_characters, move_kinematic_bodies, request_movement_input,
        step_movement_bodies, tick_controllers, write_facing,
    },
};

/// Adds character locomotion to an app
pub struct LocomotionPlugin {
    /// Schedule the per-frame locomotion systems run in. When using a physics engine, this
    /// should be the schedule the physics update runs in.
    pub schedule: Interned<dyn ScheduleLabel>,
}

impl Default for LocomotionPlugin {
    fn default() -> Self {
        Self {
            schedule: Update.intern(),
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum LocomotionSet {
    /// Movement requests and the movement integrator step
    Physics,
    /// Controller tick and facing write-back
    Controller,
    /// Animation blend values
    Driver,
}

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        self.register_assets(app);
        self.register_types(app);

        app.configure_sets(
            self.schedule,
            (
                LocomotionSet::Physics,
                LocomotionSet::Controller,
                LocomotionSet::Driver,
            )
                .chain(),
        );

        #[cfg(feature = "physics_avian")]
        {
            use avian3d::prelude::PhysicsSystems;

            app.configure_sets(
                self.schedule,
                (
                    LocomotionSet::Physics.before(PhysicsSystems::First),
                    LocomotionSet::Controller.after(PhysicsSystems::Last),
                ),
            );
        }

        app.add_systems(PreUpdate, initialize_characters);

        app.add_systems(
            self.schedule,
            (
                request_movement_input,
                step_movement_bodies,
                #[cfg(feature = "physics_avian")]
                crate::systems::sync_avian_velocity,
                move_kinematic_bodies,
            )
                .chain()
                .in_set(LocomotionSet::Physics),
        );

        app.add_systems(
            self.schedule,
            (tick_controllers, write_facing)
                .chain()
                .in_set(LocomotionSet::Controller),
        );

        app.add_systems(self.schedule, evaluate_drivers.in_set(LocomotionSet::Driver));
    }
}

impl LocomotionPlugin {
    /// Registers asset types and their loaders
    fn register_assets(&self, app: &mut App) {
        app.init_asset::<LocomotionProfile>()
            .init_asset_loader::<LocomotionProfileLoader>()
            .register_asset_reflect::<LocomotionProfile>();
    }

    /// "Other" reflect registrations
    fn register_types(&self, app: &mut App) {
        app //
            .register_type::<LocomotionCharacter>()
            .register_type::<Locomotion>()
            .register_type::<LocomotionAnimation>()
            .register_type::<LocomotionFailed>()
            .register_type::<LocomotionControl>()
            .register_type::<AnimationCurveValues>()
            .register_type::<TraversalRequests>()
            .register_type::<MovementBody>()
            .register_type::<LocomotionController>()
            .register_type::<ControllerConfig>()
            .register_type::<MovementStates>()
            .register_type::<TraversalRequest>()
            .register_type::<AnimationDriver>()
            .register_type::<AnimationDriverConfig>()
            .register_type::<BlendOutputs>()
            .register_type::<VelocityBlend>()
            .register_type::<MovementMode>()
            .register_type::<ControlInput>()
            .register_type::<Rotator>()
            .register_type::<PhysicalSample>()
            .register_type::<MovementModel>()
            .register_type::<MovementSettings>()
            .register_type::<MovementTuning>()
            .register_type::<StanceSettings>()
            .register_type::<DiscreteState>()
            .register_type::<Gait>()
            .register_type::<MovementAction>()
            .register_type::<MovementState>()
            .register_type::<OverlayState>()
            .register_type::<RotationMode>()
            .register_type::<Stance>()
            .register_type::<ViewMode>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::{
        MinimalPlugins,
        asset::{AssetPlugin, Assets, Handle},
        ecs::entity::Entity,
        math::Vec3,
        time::TimeUpdateStrategy,
        transform::components::Transform,
    };
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), LocomotionPlugin::default()))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
                1. / 60.,
            )));
        app
    }

    fn add_default_profile(app: &mut App) -> Handle<LocomotionProfile> {
        let profile: LocomotionProfile = ron::de::from_str(include_str!(
            "../../../assets/locomotion/default.locomotion.ron"
        ))
        .unwrap();
        app.world_mut()
            .resource_mut::<Assets<LocomotionProfile>>()
            .add(profile)
    }

    #[test]
    fn character_is_set_up_and_grounded() {
        let mut app = test_app();
        let profile = add_default_profile(&mut app);
        let entity = app.world_mut().spawn(LocomotionCharacter::new(profile)).id();

        app.update();
        app.update();

        let world = app.world();
        assert!(world.get::<LocomotionFailed>(entity).is_none());
        assert!(world.get::<LocomotionAnimation>(entity).is_some());

        let locomotion = world.get::<Locomotion>(entity).unwrap();
        assert_eq!(locomotion.state().movement_state(), MovementState::Grounded);
        assert_eq!(locomotion.pawn_movement_mode(), MovementMode::Walking);
    }

    #[test]
    fn unknown_movement_row_fails_setup() {
        let mut app = test_app();
        let profile = add_default_profile(&mut app);
        let config = ControllerConfig {
            movement_row: "Missing".into(),
            ..Default::default()
        };
        let entity = app
            .world_mut()
            .spawn(LocomotionCharacter::new(profile).with_config(config))
            .id();

        app.update();
        app.update();

        let world = app.world();
        assert!(world.get::<LocomotionFailed>(entity).is_some());
        assert!(world.get::<Locomotion>(entity).is_none());
    }

    #[test]
    fn forward_input_moves_and_faces_forward() {
        let mut app = test_app();
        let profile = add_default_profile(&mut app);
        let entity = app
            .world_mut()
            .spawn((
                LocomotionCharacter::new(profile),
                LocomotionControl(ControlInput::new(Rotator::ZERO, 1., 0.)),
            ))
            .id();

        for _ in 0..60 {
            app.update();
        }

        let world = app.world();
        let transform = world.get::<Transform>(entity).unwrap();
        assert!(transform.translation.z < -1.);
        assert!(transform.translation.x.abs() < 1.0e-3);
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1.0e-3);

        let animation = world.get::<LocomotionAnimation>(entity).unwrap();
        assert!(animation.outputs().velocity_blend.forward > 0.9);
    }

    #[test]
    fn characters_without_profile_wait() {
        let mut app = test_app();
        let profile = app
            .world()
            .resource::<Assets<LocomotionProfile>>()
            .reserve_handle();
        let entity: Entity = app.world_mut().spawn(LocomotionCharacter::new(profile)).id();

        app.update();

        let world = app.world();
        assert!(world.get::<Locomotion>(entity).is_none());
        assert!(world.get::<LocomotionFailed>(entity).is_none());
    }
}
