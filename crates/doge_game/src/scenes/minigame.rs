//! Mini-game scene shell
//!
//! Every mini-game is a [`MiniGameWorld`]: its own registry plus the rules
//! that drive it. [`MiniGameScene`] wraps a world and runs the shared
//! systems around it in a fixed order each tick:
//!
//! 1. world rules (spawning, timers, scoring)
//! 2. physics (integration, collision detection, debug hit boxes)
//! 3. world collision handling, which drains the collision events
//! 4. sprite animation
//! 5. one render

use doge_core::ecs::BaseRegistry;
use doge_core::math::Vec2;
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::{debug, info};

use crate::scene::{MiniGameResult, Scene, SceneOutcome, SceneStatus};
use crate::systems::{animation, physics};
use crate::{DebugMode, GameMode};

pub trait MiniGameWorld {
    const MODE: GameMode;
    const NAME: &'static str;

    fn base(&self) -> &BaseRegistry;

    fn base_mut(&mut self) -> &mut BaseRegistry;

    /// Clear every container and spawn the initial entities.
    fn restart(&mut self);

    /// Advance the rules by `delta_ms`. Returns the points earned once the
    /// game is over.
    fn step(&mut self, delta_ms: f32) -> Option<i32>;

    /// React to this tick's collision events, then clear them.
    fn handle_collisions(&mut self);

    fn on_key(&mut self, key: Key, action: KeyAction, mods: Modifiers);

    fn on_mouse_move(&mut self, _position: Vec2) {}

    /// Queue score and timer text for this frame.
    fn queue_hud(&self, _renderer: &mut dyn Renderer) {}
}

pub struct MiniGameScene<W> {
    world: W,
    debug: DebugMode,
}

impl<W: MiniGameWorld> MiniGameScene<W> {
    pub fn new(mut world: W, debug: DebugMode) -> Self {
        world.restart();
        Self { world, debug }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}

impl<W: MiniGameWorld> Scene for MiniGameScene<W> {
    fn name(&self) -> &'static str {
        W::NAME
    }

    fn step(&mut self, delta_ms: f32, renderer: &mut dyn Renderer) -> SceneStatus {
        let finished = self.world.step(delta_ms);

        physics::step(self.world.base_mut(), delta_ms, &self.debug);
        self.world.handle_collisions();
        animation::advance(self.world.base_mut(), delta_ms);

        self.world.queue_hud(renderer);
        renderer.draw(self.world.base());

        match finished {
            Some(points) => {
                info!(game = W::NAME, points, "mini-game over");
                SceneStatus::Ended(SceneOutcome::MiniGame(MiniGameResult {
                    game: W::MODE,
                    points,
                }))
            }
            None => SceneStatus::Running,
        }
    }

    fn reset_scene(&mut self) {
        debug!(game = W::NAME, "restarting mini-game");
        self.world.restart();
    }

    fn on_key(&mut self, key: Key, action: KeyAction, mods: Modifiers) -> SceneStatus {
        self.world.on_key(key, action, mods);
        SceneStatus::Running
    }

    fn on_mouse_move(&mut self, position: Vec2) {
        self.world.on_mouse_move(position);
    }
}
