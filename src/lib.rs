//! hero-avatar - Entry/override animation controller
//!
//! Drives a hero-section 3D avatar inside a host render loop:
//! - Plays a fall-and-spin entry motion while a fallback clip loops
//! - Hands the pose over to host-requested clips with a short fade-in
//! - Keeps scale and anchor position in step with the viewport width
//!
//! The rendering engine owns the scene and the clips; this crate only sees
//! them through [`clips::ClipRegistry`] and publishes an
//! [`avatar::AvatarTransform`] each frame.

pub mod avatar;
pub mod clips;
pub mod config;
pub mod error;
pub mod viewport;

pub use avatar::{AvatarTransform, ControllerState, EntryController};
pub use clips::{AnimationClip, ClipMixer, ClipRegistry};
pub use config::Config;
pub use error::{AnimationError, HeroAvatarError, Result};
pub use viewport::{resolve_profile, PresentationProfile};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
