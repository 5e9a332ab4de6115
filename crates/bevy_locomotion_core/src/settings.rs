use crate::{
    curve::{FloatCurve, SampleCurve, VectorCurve},
    errors::{LocomotionError, LocomotionResult},
    math::map_range_clamped,
    state::{Gait, RotationMode, Stance},
};
use bevy::reflect::Reflect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Speed and curve tuning for one rotation mode and stance.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MovementSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub sprint_speed: f32,
    /// Maps the gait-mapped speed to (max acceleration, braking deceleration, ground friction)
    pub movement_curve: VectorCurve,
    /// Maps the gait-mapped speed to the grounded rotation rate
    pub rotation_rate_curve: FloatCurve,
}

impl MovementSettings {
    pub fn validate(&self) -> LocomotionResult<()> {
        let (walk, run, sprint) = (self.walk_speed, self.run_speed, self.sprint_speed);
        let finite = walk.is_finite() && run.is_finite() && sprint.is_finite();
        if !finite || walk <= 0. || walk >= run || run >= sprint {
            return Err(LocomotionError::InvalidSpeedThresholds { walk, run, sprint });
        }
        self.movement_curve.require("movement curve")?;
        self.rotation_rate_curve.require("rotation rate curve")?;
        Ok(())
    }

    /// Maps a raw speed into the `[0, 3]` gait range: 0 is stopped, 1 the walk speed, 2 the
    /// run speed and 3 the sprint speed.
    pub fn mapped_speed(&self, speed: f32) -> f32 {
        let walk = self.walk_speed;
        let run = self.run_speed;
        let sprint = self.sprint_speed;

        if speed > run {
            map_range_clamped(speed, run, sprint, 2., 3.)
        } else if speed > walk {
            map_range_clamped(speed, walk, run, 1., 2.)
        } else {
            map_range_clamped(speed, 0., walk, 0., 1.)
        }
    }

    pub fn max_speed(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walking => self.walk_speed,
            Gait::Running => self.run_speed,
            Gait::Sprinting => self.sprint_speed,
        }
    }

    /// Movement limits for the allowed gait at the current speed.
    pub fn tuning(&self, allowed_gait: Gait, speed: f32) -> MovementTuning {
        let max_speed = self.max_speed(allowed_gait);
        let curve = self.movement_curve.sample(self.mapped_speed(speed));
        MovementTuning {
            max_walk_speed: max_speed,
            max_walk_speed_crouched: max_speed,
            max_acceleration: curve.x,
            braking_deceleration: curve.y,
            ground_friction: curve.z,
        }
    }
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StanceSettings {
    pub standing: MovementSettings,
    pub crouching: MovementSettings,
}

impl StanceSettings {
    pub fn get(&self, stance: Stance) -> &MovementSettings {
        match stance {
            Stance::Standing => &self.standing,
            Stance::Crouching => &self.crouching,
        }
    }
}

/// Settings for every rotation mode and stance of one character archetype.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MovementModel {
    pub velocity_direction: StanceSettings,
    pub looking_direction: StanceSettings,
    pub aiming: StanceSettings,
}

impl MovementModel {
    pub fn settings(&self, rotation_mode: RotationMode, stance: Stance) -> &MovementSettings {
        let by_stance = match rotation_mode {
            RotationMode::VelocityDirection => &self.velocity_direction,
            RotationMode::LookingDirection => &self.looking_direction,
            RotationMode::Aiming => &self.aiming,
        };
        by_stance.get(stance)
    }

    pub fn validate(&self) -> LocomotionResult<()> {
        for by_stance in [
            &self.velocity_direction,
            &self.looking_direction,
            &self.aiming,
        ] {
            by_stance.standing.validate()?;
            by_stance.crouching.validate()?;
        }
        Ok(())
    }
}

/// Movement models keyed by archetype row id.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct MovementModelTable {
    #[reflect(ignore)]
    rows: IndexMap<String, MovementModel>,
}

impl MovementModelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a RON map of row id to [`MovementModel`] and validates every row.
    pub fn from_ron_str(source: &str) -> LocomotionResult<Self> {
        let table: Self = ron::from_str(source)?;
        table.validate()?;
        Ok(table)
    }

    pub fn with_row(mut self, id: impl Into<String>, model: MovementModel) -> Self {
        self.insert(id, model);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, model: MovementModel) {
        self.rows.insert(id.into(), model);
    }

    pub fn row(&self, id: &str) -> LocomotionResult<&MovementModel> {
        self.rows
            .get(id)
            .ok_or_else(|| LocomotionError::MissingMovementRow(id.to_string()))
    }

    pub fn row_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn validate(&self) -> LocomotionResult<()> {
        self.rows.values().try_for_each(MovementModel::validate)
    }
}

/// Limits written back to the movement integrator after gait resolution.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementTuning {
    pub max_walk_speed: f32,
    pub max_walk_speed_crouched: f32,
    pub max_acceleration: f32,
    pub braking_deceleration: f32,
    pub ground_friction: f32,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_settings(walk: f32, run: f32, sprint: f32) -> MovementSettings {
        MovementSettings {
            walk_speed: walk,
            run_speed: run,
            sprint_speed: sprint,
            movement_curve: VectorCurve::new(
                FloatCurve::new(vec![(0., 800.), (3., 1600.)]),
                FloatCurve::constant(1200.),
                FloatCurve::new(vec![(0., 8.), (3., 6.)]),
            ),
            rotation_rate_curve: FloatCurve::new(vec![(0., 5.), (3., 20.)]),
        }
    }

    pub(crate) fn test_model() -> MovementModel {
        let by_stance = StanceSettings {
            standing: test_settings(150., 350., 600.),
            crouching: test_settings(100., 200., 300.),
        };
        MovementModel {
            velocity_direction: by_stance.clone(),
            looking_direction: by_stance.clone(),
            aiming: by_stance,
        }
    }

    #[test]
    fn mapped_speed_breakpoints() {
        let settings = test_settings(150., 350., 600.);

        assert_eq!(settings.mapped_speed(0.), 0.);
        assert_eq!(settings.mapped_speed(75.), 0.5);
        assert_eq!(settings.mapped_speed(150.), 1.);
        assert_eq!(settings.mapped_speed(250.), 1.5);
        assert_eq!(settings.mapped_speed(350.), 2.);
        assert_eq!(settings.mapped_speed(475.), 2.5);
        assert_eq!(settings.mapped_speed(600.), 3.);
        assert_eq!(settings.mapped_speed(2000.), 3.);
    }

    #[test]
    fn tuning_uses_allowed_gait_and_movement_curve() {
        let settings = test_settings(150., 350., 600.);
        let tuning = settings.tuning(Gait::Running, 350.);

        assert_eq!(tuning.max_walk_speed, 350.);
        assert_eq!(tuning.max_walk_speed_crouched, 350.);
        // Mapped speed 2 of 3
        assert!((tuning.max_acceleration - 800. - 800. * 2. / 3.).abs() < 1.0e-2);
        assert_eq!(tuning.braking_deceleration, 1200.);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut settings = test_settings(350., 150., 600.);
        assert!(matches!(
            settings.validate(),
            Err(LocomotionError::InvalidSpeedThresholds { .. })
        ));

        settings = test_settings(150., 350., 600.);
        settings.rotation_rate_curve = FloatCurve::default();
        assert!(matches!(
            settings.validate(),
            Err(LocomotionError::UnsetCurve("rotation rate curve"))
        ));
    }

    #[test]
    fn missing_row_is_an_error() {
        let table = MovementModelTable::new().with_row("Normal", test_model());
        assert!(table.row("Normal").is_ok());
        assert!(matches!(
            table.row("Heavy"),
            Err(LocomotionError::MissingMovementRow(id)) if id == "Heavy"
        ));
    }

    #[test]
    fn table_round_trips_through_ron() {
        let table = MovementModelTable::new().with_row("Normal", test_model());
        let text = ron::to_string(&table).unwrap();
        let parsed = MovementModelTable::from_ron_str(&text).unwrap();
        assert_eq!(parsed, table);
        assert_eq!(parsed.row_ids().collect::<Vec<_>>(), vec!["Normal"]);
    }
}
