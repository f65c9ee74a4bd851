//! Simulation error types

use crate::core::error_handling::ContextualError;
use crate::light::LightError;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("An intersection needs at least one light")]
    NoLights,

    #[error("Failed to spawn vehicle-{id}: {source}")]
    Spawn {
        id: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("vehicle-{id} panicked")]
    VehiclePanicked { id: u32 },

    #[error("Simulation lock poisoned: {message}")]
    Poisoned { message: String },

    #[error(transparent)]
    Light(#[from] LightError),
}

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

impl ContextualError for SimError {
    fn is_user_actionable(&self) -> bool {
        match self {
            SimError::NoLights => true,
            SimError::Light(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            SimError::NoLights => Some("An intersection needs at least one light"),
            SimError::Light(e) => e.user_message(),
            _ => None,
        }
    }
}
