use bevy_locomotion_core::errors::LocomotionError;
use thiserror::Error;

/// Errors produced while loading a locomotion profile.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AssetLoaderError {
    /// An [IO](std::io) Error
    #[error("Could not read locomotion profile: {0}")]
    Io(#[from] std::io::Error),
    /// A [RON](ron) Error
    #[error("Could not parse RON: {0}")]
    RonSpannedError(#[from] ron::error::SpannedError),
    #[error("Invalid locomotion profile: {0}")]
    Locomotion(#[from] LocomotionError),
}
