//! Error types for hero-avatar

use thiserror::Error;

/// Main error type for hero-avatar
#[derive(Error, Debug)]
pub enum HeroAvatarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Animation control errors.
///
/// None of these are fatal: the controller reports them and keeps its
/// current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Clip not found: {0}")]
    ClipNotFound(String),
}

/// Result type alias for hero-avatar operations
pub type Result<T> = std::result::Result<T, HeroAvatarError>;
