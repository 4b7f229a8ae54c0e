//! In-process clip mixer.
//!
//! Implements [`ClipRegistry`] with per-clip playback time and blend weight,
//! so a host without its own mixer (and the test suite) can observe what the
//! controller commands.

use crate::avatar::motion::{EasingType, WeightFade};

use super::{AnimationClip, ClipRegistry, LoopMode, PlayOptions};

/// A clip currently started on the mixer
#[derive(Debug, Clone)]
struct ActiveClip {
    name: String,
    duration: f32,
    loop_mode: LoopMode,
    time: f32,
    fade: WeightFade,
}

impl ActiveClip {
    fn advance(&mut self, dt: f32) {
        self.fade.advance(dt);

        let t = self.time + dt;
        self.time = match self.loop_mode {
            LoopMode::Repeat if self.duration > 0.0 => t % self.duration,
            LoopMode::Repeat => 0.0,
            LoopMode::Once => t.min(self.duration.max(0.0)),
        };
    }
}

/// Clip set for one loaded asset plus its playback state
#[derive(Debug, Clone, Default)]
pub struct ClipMixer {
    /// Clips in listing order
    clips: Vec<AnimationClip>,
    /// Started clips, oldest first
    active: Vec<ActiveClip>,
    /// Curve used for fade-in ramps
    easing: EasingType,
}

impl ClipMixer {
    /// Create a mixer for the given clips
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            clips,
            active: Vec::new(),
            easing: EasingType::default(),
        }
    }

    /// Create a mixer of repeating clips that share one duration
    pub fn from_names(names: &[&str], duration: f32) -> Self {
        Self::new(
            names
                .iter()
                .map(|name| AnimationClip::new(name, duration))
                .collect(),
        )
    }

    /// Set the fade-in curve
    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    /// Replace the clip set, e.g. once the asset finishes loading.
    /// Stops everything that was playing.
    pub fn load(&mut self, clips: Vec<AnimationClip>) {
        self.active.clear();
        self.clips = clips;
        tracing::debug!("Clip mixer loaded {} clips", self.clips.len());
    }

    /// Advance playback time and fade ramps by `dt` seconds. Non-finite and
    /// non-positive deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for clip in &mut self.active {
            clip.advance(dt);
        }
    }

    /// Current blend weight of `name` (0 when not playing)
    pub fn weight(&self, name: &str) -> f32 {
        self.find(name).map(|c| c.fade.weight()).unwrap_or(0.0)
    }

    /// Local playback time of `name`, if it is playing
    pub fn time(&self, name: &str) -> Option<f32> {
        self.find(name).map(|c| c.time)
    }

    /// Check if a clip is playing
    pub fn is_playing(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Names of the started clips, oldest first
    pub fn playing(&self) -> Vec<&str> {
        self.active.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of started clips contributing a nonzero weight
    pub fn weighted_count(&self) -> usize {
        self.active
            .iter()
            .filter(|c| c.fade.weight() > 0.0)
            .count()
    }

    fn find(&self, name: &str) -> Option<&ActiveClip> {
        self.active.iter().find(|c| c.name == name)
    }
}

impl ClipRegistry for ClipMixer {
    fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }

    fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    fn stop_all(&mut self) {
        self.active.clear();
    }

    fn play(&mut self, name: &str, options: PlayOptions) {
        let Some(clip) = self.clip(name) else {
            tracing::warn!("Mixer asked to play unknown clip: {}", name);
            return;
        };
        let duration = clip.duration;

        // Restarting a clip resets it rather than stacking a second instance
        self.active.retain(|c| c.name != name);
        self.active.push(ActiveClip {
            name: name.to_string(),
            duration,
            loop_mode: options.loop_mode,
            time: 0.0,
            fade: WeightFade::new(options.fade_in_secs, self.easing),
        });
    }
}
