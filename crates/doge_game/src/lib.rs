//! Doge Party game logic
//!
//! Scenes, the systems they run, and the [`SceneManager`] that chains them:
//! board → switch players → mini-game (once per player) → board, for a
//! configured number of rounds.

pub mod debug;
pub mod game_mode;
pub mod scene;
pub mod scene_manager;
pub mod scenes;
pub mod systems;

pub use debug::DebugMode;
pub use game_mode::GameMode;
pub use scene::{MiniGameResult, Scene, SceneOutcome, SceneStatus};
pub use scene_manager::{ActiveScene, SceneManager};
