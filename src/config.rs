//! Configuration parsing and management for hero-avatar

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use crate::avatar::motion::{Approach, EasingType, FallPolicy};
use crate::error::{ConfigError, HeroAvatarError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub entry: EntryConfig,
    pub playback: PlaybackConfig,
    pub viewport: ViewportConfig,
    pub frame: FrameConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HeroAvatarError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, HeroAvatarError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, HeroAvatarError> {
        let paths = [
            PathBuf::from("hero-avatar.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), HeroAvatarError> {
        let positive = [
            ("entry.decay_rate", self.entry.decay_rate),
            ("entry.fall_speed", self.entry.fall_speed),
            ("entry.spin_speed", self.entry.spin_speed),
            ("entry.epsilon", self.entry.epsilon),
            ("viewport.compact_scale", self.viewport.compact_scale),
            ("viewport.standard_scale", self.viewport.standard_scale),
            ("frame.max_delta", self.frame.max_delta),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "Must be a finite value greater than 0"));
            }
        }

        if !self.entry.start_y.is_finite() || !self.entry.start_rotation.is_finite() {
            return Err(invalid("entry", "Start height and rotation must be finite"));
        }

        if !(self.playback.fade_in_secs.is_finite() && self.playback.fade_in_secs >= 0.0) {
            return Err(invalid(
                "playback.fade_in_secs",
                "Fade-in must be a finite value of at least 0",
            ));
        }

        if self.viewport.compact_below == 0 {
            return Err(invalid(
                "viewport.compact_below",
                "Threshold must be greater than 0",
            ));
        }

        if self.entry.fallback_keyword.is_empty() {
            tracing::warn!("entry.fallback_keyword is empty, every clip name will match it");
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> HeroAvatarError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// Entry (fall-and-spin) motion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Height the avatar drops from
    pub start_y: f32,
    /// Initial rotation about the vertical axis in radians
    pub start_rotation: f32,
    /// Interpolation policy: "decay" or "linear"
    pub policy: FallPolicy,
    /// Decay rate (1/s) for the "decay" policy
    pub decay_rate: f32,
    /// Fall speed (units/s) for the "linear" policy
    pub fall_speed: f32,
    /// Spin speed (rad/s) for the "linear" policy
    pub spin_speed: f32,
    /// Convergence epsilon for both position and rotation
    pub epsilon: f32,
    /// Clip played during the entry, matched exactly
    pub preferred_clip: String,
    /// Case-insensitive substring used when the preferred clip is missing
    pub fallback_keyword: String,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            start_y: 10.0,
            start_rotation: -4.0 * PI,
            policy: FallPolicy::Decay,
            decay_rate: 3.0,
            fall_speed: 8.0,
            spin_speed: 8.0,
            epsilon: 0.01,
            preferred_clip: "Falling".to_string(),
            fallback_keyword: "fall".to_string(),
        }
    }
}

impl EntryConfig {
    /// Interpolation for the avatar position
    pub fn height_approach(&self) -> Approach {
        let rate = match self.policy {
            FallPolicy::Decay => self.decay_rate,
            FallPolicy::Linear => self.fall_speed,
        };
        Approach::new(self.policy, rate, self.epsilon)
    }

    /// Interpolation for the avatar spin
    pub fn spin_approach(&self) -> Approach {
        let rate = match self.policy {
            FallPolicy::Decay => self.decay_rate,
            FallPolicy::Linear => self.spin_speed,
        };
        Approach::new(self.policy, rate, self.epsilon)
    }
}

/// Clip playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Fade-in applied when an override clip starts
    pub fade_in_secs: f32,
    /// Weight ramp: "linear", "quad_in_out", "cubic_out" or "cubic_in"
    pub fade_easing: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fade_in_secs: 0.2,
            fade_easing: "linear".to_string(),
        }
    }
}

impl PlaybackConfig {
    pub fn easing(&self) -> EasingType {
        EasingType::from_str(&self.fade_easing)
    }
}

/// Responsive presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Widths below this (logical px) use the compact profile
    pub compact_below: u32,
    pub compact_scale: f32,
    pub compact_base: [f32; 3],
    pub standard_scale: f32,
    pub standard_base: [f32; 3],
    /// Width assumed when the host does not report one
    pub initial_width: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            compact_below: crate::viewport::COMPACT_BELOW_PX,
            compact_scale: 1.5,
            compact_base: [0.0, 0.0, 0.0],
            standard_scale: 2.2,
            standard_base: [0.0, -2.5, 0.0],
            initial_width: 1280,
        }
    }
}

/// Frame clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Largest delta (seconds) a single frame may advance by
    pub max_delta: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_delta: 0.1 }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("hero-avatar");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/hero-avatar");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/hero-avatar");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("hero-avatar");
        }
    }

    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.entry.start_y, 10.0);
        assert_eq!(config.entry.policy, FallPolicy::Decay);
        assert_eq!(config.entry.preferred_clip, "Falling");
        assert_eq!(config.playback.fade_in_secs, 0.2);
        assert_eq!(config.viewport.compact_below, 768);
        assert_eq!(config.frame.max_delta, 0.1);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [entry]
            policy = "linear"
            fall_speed = 12.0

            [playback]
            fade_in_secs = 0.5
            fade_easing = "cubic_out"

            [viewport]
            compact_below = 1024
            standard_base = [0.0, -3.0, 0.0]
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.entry.policy, FallPolicy::Linear);
        assert_eq!(config.entry.fall_speed, 12.0);
        // Untouched fields keep their defaults
        assert_eq!(config.entry.start_y, 10.0);
        assert_eq!(config.playback.easing(), EasingType::CubicOut);
        assert_eq!(config.viewport.compact_below, 1024);
        assert_eq!(config.viewport.standard_base, [0.0, -3.0, 0.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_str("[entry]\npolicy = \"bounce\"").unwrap_err();
        assert!(matches!(
            err,
            HeroAvatarError::Config(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.entry.decay_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.frame.max_delta = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.playback.fade_in_secs = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.playback.fade_in_secs = 0.0;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.viewport.compact_below = 0;
        match config.validate() {
            Err(HeroAvatarError::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "viewport.compact_below");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_approach_per_policy() {
        let mut entry = EntryConfig::default();
        assert_eq!(entry.height_approach().rate, 3.0);
        assert_eq!(entry.spin_approach().rate, 3.0);

        entry.policy = FallPolicy::Linear;
        entry.spin_speed = 20.0;
        assert_eq!(entry.height_approach().rate, 8.0);
        assert_eq!(entry.spin_approach().rate, 20.0);
        assert_eq!(entry.spin_approach().policy, FallPolicy::Linear);
    }
}
