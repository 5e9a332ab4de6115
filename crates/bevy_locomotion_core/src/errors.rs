use thiserror::Error;

/// Configuration errors. These are only produced while setting up a character; once a
/// controller and driver exist, per-frame evaluation cannot fail.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LocomotionError {
    #[error("Movement model table has no row named {0:?}")]
    MissingMovementRow(String),
    #[error("Required curve is not set: {0}")]
    UnsetCurve(&'static str),
    #[error(
        "Movement speed thresholds must be finite and strictly increasing, got walk={walk}, run={run}, sprint={sprint}"
    )]
    InvalidSpeedThresholds { walk: f32, run: f32, sprint: f32 },
    #[error("Animated speed {0} must be finite and positive, got {1}")]
    InvalidAnimatedSpeed(&'static str, f32),
    #[error("Could not parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

pub type LocomotionResult<T> = Result<T, LocomotionError>;
