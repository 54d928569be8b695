//! The scene interface
//!
//! A scene is built once, then stepped, reset and re-entered for the whole
//! run. It never switches scenes itself: when it is done it returns
//! [`SceneStatus::Ended`] from `step` or `on_key`, and the
//! [`SceneManager`](crate::SceneManager) decides what comes next.

use doge_core::math::Vec2;
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};

use crate::GameMode;

/// How a mini-game went for the player who just played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiniGameResult {
    pub game: GameMode,
    pub points: i32,
}

/// Completion report, one variant per kind of scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOutcome {
    /// Everyone on the board has taken a turn.
    Board { players: usize },
    SwitchPlayers,
    MiniGame(MiniGameResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Running,
    Ended(SceneOutcome),
}

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Advance one tick of `delta_ms` milliseconds and render once.
    fn step(&mut self, delta_ms: f32, renderer: &mut dyn Renderer) -> SceneStatus;

    /// Re-populate world state from scratch, keeping the scene object.
    fn reset_scene(&mut self);

    fn on_key(&mut self, key: Key, action: KeyAction, mods: Modifiers) -> SceneStatus;

    fn on_mouse_move(&mut self, position: Vec2);
}
