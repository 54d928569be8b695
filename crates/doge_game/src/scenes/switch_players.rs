//! Interstitial between turns
//!
//! Announces the upcoming mini-game and waits for the next player to press
//! Enter. The first player of a round also gets the game's story, typed out
//! one character per frame.

use doge_core::ecs::{BaseRegistry, Entity};
use doge_core::math::{GameRng, Rng, Vec2, Vec3, Vec4};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::debug;

use crate::scene::{Scene, SceneOutcome, SceneStatus};
use crate::systems::text::{self, Typewriter};
use crate::GameMode;

/// Story wrap width, in characters.
const STORY_COLUMNS: usize = 60;

/// Where the help box sits, how dim the backdrop is and which part of the
/// screen gets blurred behind the help lines.
struct IntroLayout {
    help_origin: Vec2,
    brightness: f32,
    blur_rect: Vec4,
}

fn intro_layout(mode: GameMode) -> IntroLayout {
    let (help_origin, brightness, blur_rect) = match mode {
        GameMode::Mac => (Vec2::new(0.70, 0.5), 0.5, Vec4::new(0.66, 0.42, 0.4, 0.14)),
        GameMode::Planit => (Vec2::new(0.77, 0.5), 0.5, Vec4::new(0.75, 0.43, 0.25, 0.12)),
        GameMode::Shower | GameMode::ConstrainedChaos => {
            (Vec2::new(0.77, 0.6), 0.75, Vec4::new(0.75, 0.4, 0.25, 0.25))
        }
        GameMode::Daycare => (Vec2::new(0.735, 0.7), 0.75, Vec4::new(0.72, 0.6, 0.28, 0.15)),
    };
    IntroLayout {
        help_origin,
        brightness,
        blur_rect,
    }
}

pub struct SwitchPlayersScene {
    registry: BaseRegistry,
    rng: GameRng,
    previous_game: Option<GameMode>,
    next_game: GameMode,
    render_tutorial: bool,
    stories: [Typewriter; GameMode::COUNT],
}

impl SwitchPlayersScene {
    pub fn new(rng: GameRng) -> Self {
        let mut registry = BaseRegistry::default();
        registry.screen_states.emplace(Entity::new());
        Self {
            registry,
            rng,
            previous_game: None,
            next_game: GameMode::Mac,
            render_tutorial: true,
            stories: [Typewriter::default(); GameMode::COUNT],
        }
    }

    /// Pick the next mini-game at random, never the one played last.
    pub fn request_new_minigame(&mut self) -> GameMode {
        let next = match self.previous_game {
            None => GameMode::ALL[self.rng.gen_range(0..GameMode::COUNT)],
            Some(previous) => {
                let pick = self.rng.gen_range(0..GameMode::COUNT - 1);
                let index = if pick >= previous.index() { pick + 1 } else { pick };
                GameMode::ALL[index]
            }
        };
        debug!(game = ?next, "next mini-game selected");
        self.next_game = next;
        self.previous_game = Some(next);
        next
    }

    pub fn change_next_game_mode(&mut self, mode: GameMode) {
        self.next_game = mode;
        self.previous_game = Some(mode);
    }

    pub fn next_game_mode(&self) -> GameMode {
        self.next_game
    }

    /// Skip the story for the remaining players of the round.
    pub fn disable_render(&mut self) {
        self.render_tutorial = false;
    }

    pub fn is_tutorial_shown(&self) -> bool {
        self.render_tutorial
    }

    fn queue_intro(&mut self, renderer: &mut dyn Renderer) {
        let mode = self.next_game;
        let layout = intro_layout(mode);

        text::queue_lines(renderer, &[mode.title()], Vec2::new(0.02, 0.9), 1.1, Vec3::ONE);
        if self.render_tutorial {
            let story = &mut self.stories[mode.index()];
            text::queue_block(
                renderer,
                story.visible(mode.story()),
                STORY_COLUMNS,
                Vec2::new(0.05, 0.8),
                0.86,
            );
            story.advance();
        }
        text::queue_lines(renderer, mode.help(), layout.help_origin, 0.5, Vec3::ONE);
        text::queue_lines(
            renderer,
            &["Press Enter to continue..."],
            Vec2::new(0.60, 0.1),
            0.9,
            Vec3::ONE,
        );
    }
}

impl Scene for SwitchPlayersScene {
    fn name(&self) -> &'static str {
        "switch_players"
    }

    fn step(&mut self, _delta_ms: f32, renderer: &mut dyn Renderer) -> SceneStatus {
        self.queue_intro(renderer);

        let layout = intro_layout(self.next_game);
        if let Some(screen) = self.registry.screen_state_mut() {
            screen.screen_brightness = layout.brightness;
            screen.blur_partial = true;
            screen.blur_rect = layout.blur_rect;
        }
        renderer.render_text_only(&self.registry, self.next_game.intro_background());
        if let Some(screen) = self.registry.screen_state_mut() {
            screen.screen_brightness = 1.0;
            screen.blur_partial = false;
        }
        SceneStatus::Running
    }

    fn reset_scene(&mut self) {
        self.render_tutorial = true;
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) -> SceneStatus {
        if key == Key::Enter && action == KeyAction::Release {
            return SceneStatus::Ended(SceneOutcome::SwitchPlayers);
        }
        SceneStatus::Running
    }

    fn on_mouse_move(&mut self, _position: Vec2) {}
}
