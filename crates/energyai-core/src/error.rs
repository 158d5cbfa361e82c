//! Core error types for energyai-core.
//!
//! Progression errors are recoverable and raised before any state is
//! touched, so a failed intent leaves the model exactly as it was.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for energyai-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Learner intent rejected by the progression model
    #[error("Progression error: {0}")]
    Progress(#[from] ProgressError),

    /// Seed data could not be loaded or violates an invariant
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What kind of entity a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Module,
    Lesson,
    Achievement,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Module => f.write_str("module"),
            Entity::Lesson => f.write_str("lesson"),
            Entity::Achievement => f.write_str("achievement"),
        }
    }
}

/// Errors returned by [`crate::ProgressionModel`] operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgressError {
    /// Unknown module, lesson or achievement id
    #[error("{entity} '{id}' not found")]
    NotFound { entity: Entity, id: String },

    /// The lesson has not been unlocked yet
    #[error("lesson {0} is locked")]
    LessonLocked(String),

    /// The lesson was completed earlier; nothing changed
    #[error("lesson {0} is already completed")]
    AlreadyCompleted(String),

    /// The operation would break a curriculum invariant
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ProgressError {
    pub fn module_not_found(id: u32) -> Self {
        ProgressError::NotFound {
            entity: Entity::Module,
            id: id.to_string(),
        }
    }

    pub fn lesson_not_found(id: &str) -> Self {
        ProgressError::NotFound {
            entity: Entity::Lesson,
            id: id.to_string(),
        }
    }

    pub fn achievement_not_found(id: &str) -> Self {
        ProgressError::NotFound {
            entity: Entity::Achievement,
            id: id.to_string(),
        }
    }

    /// `AlreadyCompleted` is informational; callers usually just report it.
    pub fn is_recoverable_noop(&self) -> bool {
        matches!(self, ProgressError::AlreadyCompleted(_))
    }
}

/// Seed data errors.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Failed to read a seed file from disk
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be decoded into the seed schema
    #[error("Failed to parse seed data: {0}")]
    Parse(#[from] toml::de::Error),

    /// Seed decoded but violates a curriculum invariant
    #[error("Seed invariant violated: {0}")]
    Invariant(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Dot-path key that does not exist in the config tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Could not resolve or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),

    /// SQLite failure
    #[error("Query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored value could not be (de)serialized
    #[error("Stored value for '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
