//! Doge Party Services Layer
//!
//! Platform-facing pieces the scenes depend on: the input vocabulary,
//! user settings and the board save file.

pub mod input;
pub mod save;
pub mod settings;

pub use input::{Key, KeyAction, Modifiers};
pub use save::{SaveError, SaveRecord};
pub use settings::{Settings, SettingsError};
