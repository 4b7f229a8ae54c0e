//! Entry/override animation controller.
//!
//! Owns the avatar transform while the entry motion runs, decides which clip
//! plays, and arbitrates between the procedural fall, the looping fallback
//! clip and clips requested by the host UI. Single-threaded: every mutator
//! runs to completion on the caller's frame and never blocks.

use glam::Vec3;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::clips::{select_fallback_clip, ClipRegistry, PlayOptions};
use crate::config::{Config, EntryConfig, PlaybackConfig, ViewportConfig};
use crate::error::AnimationError;
use crate::viewport::{PresentationProfile, ProfileKind};

use super::motion::{sanitize_delta, Approach};
use super::state::ControllerState;
use super::transform::AvatarTransform;

/// Read-only view of the controller for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    #[serde(flatten)]
    pub state: ControllerState,
    pub transform: AvatarTransform,
    pub target: AvatarTransform,
    pub profile: ProfileKind,
}

/// Drives one avatar's entry motion and clip selection
#[derive(Debug, Clone)]
pub struct EntryController {
    entry: EntryConfig,
    playback: PlaybackConfig,
    viewport: ViewportConfig,
    max_delta: f32,
    /// Position (and scale) interpolation
    height: Approach,
    /// Rotation interpolation
    spin: Approach,
    profile: PresentationProfile,
    transform: AvatarTransform,
    state: ControllerState,
}

impl EntryController {
    /// Create a controller for a viewport `viewport_width` logical pixels wide.
    ///
    /// The transform starts at the top of the entry motion; call
    /// [`EntryController::mount`] once the clip registry is available.
    pub fn new(config: &Config, viewport_width: u32) -> Self {
        let profile = config.viewport.resolve(viewport_width);
        let mut controller = Self {
            entry: config.entry.clone(),
            playback: config.playback.clone(),
            viewport: config.viewport.clone(),
            max_delta: config.frame.max_delta,
            height: config.entry.height_approach(),
            spin: config.entry.spin_approach(),
            profile,
            transform: AvatarTransform::canonical(&profile),
            state: ControllerState::default(),
        };
        controller.transform = controller.entry_pose();
        controller
    }

    /// Start the controller against `registry`.
    ///
    /// With an `initial_request` naming an existing clip the avatar starts
    /// directly under that clip; otherwise the entry motion begins.
    pub fn mount<R: ClipRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        initial_request: Option<&str>,
    ) {
        info!(
            "Mounting avatar controller: {} profile, {} clips, {} policy",
            self.profile.kind,
            registry.clip_names().len(),
            self.entry.policy
        );

        if let Some(name) = initial_request {
            match self.request_animation(registry, name) {
                Ok(()) => return,
                Err(e) => warn!("Initial animation unavailable ({}), playing entry", e),
            }
        }

        self.begin_entry(registry);
    }

    /// Advance one rendered frame by `dt` seconds and return the transform to
    /// render.
    ///
    /// Deltas are clamped to `[0, frame.max_delta]`; a zero, negative or NaN
    /// delta leaves everything unchanged.
    pub fn on_frame(&mut self, dt: f32) -> AvatarTransform {
        let clamped = sanitize_delta(dt, self.max_delta);
        if clamped != dt {
            debug!("Frame delta {} clamped to {}", dt, clamped);
        }

        if clamped > 0.0 && self.state.is_procedural() {
            self.step_entry(clamped);
        }

        self.transform
    }

    /// Switch to the clip `name`.
    ///
    /// Stops every playing clip, snaps the transform to the target pose and
    /// fades `name` in, looping. Requesting the clip that is already the
    /// active override changes nothing. An unknown name leaves state and
    /// playback untouched and returns [`AnimationError::ClipNotFound`].
    pub fn request_animation<R: ClipRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        name: &str,
    ) -> Result<(), AnimationError> {
        if registry.clip(name).is_none() {
            warn!("Requested animation not found: {} (staying {})", name, self.state);
            return Err(AnimationError::ClipNotFound(name.to_string()));
        }

        if let ControllerState::ClipOverrideActive { clip } = &self.state {
            if clip == name {
                debug!("Animation {} already active", name);
                return Ok(());
            }
        }

        let previous = self.state.name();
        registry.stop_all();
        self.transform = self.target();
        registry.play(
            name,
            PlayOptions::looping().with_fade_in(self.playback.fade_in_secs),
        );
        self.state = ControllerState::ClipOverrideActive {
            clip: name.to_string(),
        };

        info!("State change: {} -> {} ({})", previous, self.state, name);
        Ok(())
    }

    /// Re-resolve the presentation profile for a new viewport width.
    ///
    /// Only the target moves. A running entry motion eases toward the new
    /// target; an idle or overridden avatar keeps its live transform until
    /// the next snap.
    pub fn on_viewport_resize(&mut self, width_px: u32) {
        let profile = self.viewport.resolve(width_px);
        if profile == self.profile {
            return;
        }

        debug!(
            "Viewport {}px: {} -> {} profile",
            width_px, self.profile.kind, profile.kind
        );
        self.profile = profile;
    }

    /// Replay the entry motion from the top with a freshly selected fallback.
    pub fn restart_entry<R: ClipRegistry + ?Sized>(&mut self, registry: &mut R) {
        self.begin_entry(registry);
    }

    /// Re-run fallback selection after the registry's clip set changed.
    ///
    /// Only affects the entry and idle states; an active override keeps
    /// playing. When the selection is unchanged the fallback keeps its
    /// playback time.
    pub fn refresh_clips<R: ClipRegistry + ?Sized>(&mut self, registry: &mut R) {
        if let ControllerState::ClipOverrideActive { clip } = &self.state {
            if registry.clip(clip).is_none() {
                warn!("Active animation {} is no longer in the registry", clip);
            }
            return;
        }

        let selected = self.select_fallback(registry);
        if selected.as_deref() == self.state.active_clip() {
            debug!("Fallback clip unchanged after refresh");
            return;
        }

        registry.stop_all();
        self.start_fallback(registry, selected.as_deref());
        match &mut self.state {
            ControllerState::FallingEntry { fallback } | ControllerState::Idle { fallback } => {
                *fallback = selected;
            }
            ControllerState::ClipOverrideActive { .. } => {}
        }
    }

    /// Clip names for building a selector, in registry order
    pub fn available_clip_names<R: ClipRegistry + ?Sized>(&self, registry: &R) -> Vec<String> {
        registry
            .clip_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Current state
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Transform to render this frame
    pub fn transform(&self) -> AvatarTransform {
        self.transform
    }

    /// Current presentation profile
    pub fn profile(&self) -> &PresentationProfile {
        &self.profile
    }

    /// Canonical pose the entry motion converges to and overrides snap to
    pub fn target(&self) -> AvatarTransform {
        AvatarTransform::canonical(&self.profile)
    }

    /// Diagnostics snapshot
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.state.clone(),
            transform: self.transform,
            target: self.target(),
            profile: self.profile.kind,
        }
    }

    /// Top of the entry motion: above the target, spun back.
    fn entry_pose(&self) -> AvatarTransform {
        let base = self.profile.base_position;
        AvatarTransform {
            position: Vec3::new(base.x, self.entry.start_y, base.z),
            rotation_y: self.entry.start_rotation,
            scale: self.profile.scale,
        }
    }

    fn begin_entry<R: ClipRegistry + ?Sized>(&mut self, registry: &mut R) {
        let previous = self.state.name();
        registry.stop_all();
        let fallback = self.play_fallback(registry);
        self.transform = self.entry_pose();
        self.state = ControllerState::FallingEntry { fallback };
        info!(
            "State change: {} -> {} (from y={:.2})",
            previous, self.state, self.transform.position.y
        );
    }

    /// Select and start the fallback clip. Caller has already stopped
    /// everything else.
    fn play_fallback<R: ClipRegistry + ?Sized>(&self, registry: &mut R) -> Option<String> {
        let selected = self.select_fallback(registry);
        self.start_fallback(registry, selected.as_deref());
        selected
    }

    fn select_fallback<R: ClipRegistry + ?Sized>(&self, registry: &R) -> Option<String> {
        let names = registry.clip_names();
        select_fallback_clip(
            &names,
            &self.entry.preferred_clip,
            &self.entry.fallback_keyword,
        )
        .map(str::to_string)
    }

    fn start_fallback<R: ClipRegistry + ?Sized>(&self, registry: &mut R, name: Option<&str>) {
        match name {
            Some(name) => {
                registry.play(name, PlayOptions::looping());
                debug!("Fallback clip: {}", name);
            }
            None => info!("No clips available, entry motion runs without a clip"),
        }
    }

    fn step_entry(&mut self, dt: f32) {
        let target = self.target();
        let t = &mut self.transform;
        t.position = self.height.step_vec3(t.position, target.position, dt);
        t.rotation_y = self.spin.step(t.rotation_y, target.rotation_y, dt);
        t.scale = self.height.step(t.scale, target.scale, dt);

        trace!(
            "Entry step: y={:.4} rot={:.4} scale={:.3}",
            t.position.y,
            t.rotation_y,
            t.scale
        );

        if *t == target {
            let fallback = self.state.active_clip().map(str::to_string);
            self.state = ControllerState::Idle { fallback };
            info!("State change: falling_entry -> {}", self.state);
        }
    }
}
