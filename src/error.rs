//! Error taxonomy for the simulation and configuration layers

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::{EntityId, GamePhase};

/// Errors raised inside a simulation tick.
///
/// Neither variant is allowed to abort a tick: `InvalidState` turns the
/// offending operation into a no-op, `OutOfBounds` is a pipeline ordering bug
/// that trips a debug assertion and is otherwise treated as already-dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("{operation} requires phase Playing (current phase: {phase:?})")]
    InvalidState {
        operation: &'static str,
        phase: GamePhase,
    },
    #[error("entity {0} is not in the store")]
    OutOfBounds(EntityId),
}

impl SimError {
    /// Apply the error policy: log, and for ordering bugs assert in debug builds.
    pub fn report(self) {
        match self {
            SimError::InvalidState { .. } => log::warn!("{self}; ignored"),
            SimError::OutOfBounds(_) => {
                debug_assert!(false, "tick pipeline ordering bug: {self}");
                log::error!("{self}; treated as already dead");
            }
        }
    }
}

/// Errors raised while loading [`crate::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
