//! Avatar control module
//!
//! Handles the entry/override state machine, the avatar transform and the
//! procedural motion that moves it.

pub mod controller;
pub mod motion;
pub mod state;
pub mod transform;

pub use controller::{ControllerSnapshot, EntryController};
pub use motion::{Approach, EasingType, FallPolicy};
pub use state::ControllerState;
pub use transform::AvatarTransform;
