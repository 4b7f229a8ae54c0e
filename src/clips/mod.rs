//! Animation clips and the registry contract the controller drives.
//!
//! The registry belongs to the rendering engine; the controller only lists,
//! looks up, stops and plays clips through [`ClipRegistry`].

pub mod mixer;

pub use mixer::ClipMixer;

use serde::{Deserialize, Serialize};

/// Clip loop behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Wrap around at the end
    #[default]
    Repeat,
    /// Hold the last frame
    Once,
}

/// A named, pre-authored skeletal animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Unique name within the asset; also the play handle
    pub name: String,
    /// Intrinsic duration in seconds
    pub duration: f32,
    /// Authored loop mode
    pub loop_mode: LoopMode,
}

impl AnimationClip {
    /// Create a repeating clip
    pub fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            loop_mode: LoopMode::Repeat,
        }
    }

    /// Set the loop mode
    pub fn with_loop(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }
}

/// Options for starting a clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Seconds over which the clip's weight ramps from 0 to 1 (0 = snap)
    pub fade_in_secs: f32,
    pub loop_mode: LoopMode,
}

impl PlayOptions {
    /// Loop at full weight immediately
    pub fn looping() -> Self {
        Self {
            fade_in_secs: 0.0,
            loop_mode: LoopMode::Repeat,
        }
    }

    /// Set the fade-in duration
    pub fn with_fade_in(mut self, secs: f32) -> Self {
        self.fade_in_secs = secs;
        self
    }
}

/// Clip set and playback control exposed by the engine for one avatar.
pub trait ClipRegistry {
    /// Clip names in listing order. Empty before the asset loads.
    fn clip_names(&self) -> Vec<&str>;

    /// Look up a clip by exact name.
    fn clip(&self, name: &str) -> Option<&AnimationClip>;

    /// Stop every playing clip immediately, without fading.
    fn stop_all(&mut self);

    /// Start `name` from its beginning.
    fn play(&mut self, name: &str, options: PlayOptions);
}

/// Pick the clip to play during the entry motion.
///
/// Priority: exact (case-sensitive) `preferred`, then the first name
/// containing `keyword` ignoring case, then the first clip listed.
pub fn select_fallback_clip<'a>(
    names: &[&'a str],
    preferred: &str,
    keyword: &str,
) -> Option<&'a str> {
    if let Some(name) = names.iter().find(|n| **n == preferred) {
        return Some(*name);
    }

    let keyword = keyword.to_lowercase();
    names
        .iter()
        .find(|n| n.to_lowercase().contains(&keyword))
        .or_else(|| names.first())
        .copied()
}
