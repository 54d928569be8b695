//! The hub board
//!
//! Opens with the story, typed out one character per frame. After that the
//! players take turns rolling the dice and walking the ring; once everyone
//! has moved the scene ends and the round's mini-games start.

mod registry;
mod world;

pub use registry::{ActivePlayer, BoardRegistry};
pub use world::{BoardState, BoardWorld};

use std::path::PathBuf;

use doge_core::math::{GameRng, Vec2, Vec3, Vec4};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::{debug, info};

use crate::scene::{Scene, SceneOutcome, SceneStatus};
use crate::systems::text::{self, Typewriter};
use crate::systems::{animation, physics};
use crate::DebugMode;

const STORY: &str = "The Doge kingdom is in a war with the Cat kingdom. The cats are too \
    strong and now Doge is losing most of the fights. The King of Doge decided to start a \
    plan called \"Party time\" to win this war. You and other players are on a spaceship \
    and the secret mission is to sneak into their planet to do a secret attack and make \
    their kingdom into a party to win the war! The king said the person who earns the \
    most points will have unlimited snacks in their lifetime. So compete with other \
    players to earn this reward!";

const HELP: [&str; 6] = [
    "Space: roll the dice",
    "F1: to add players",
    "red decrease 3 points",
    "blue increase 3 points",
    "S to save game",
    "L to load game",
];

const STORY_COLUMNS: usize = 60;
const INTRO_BACKGROUND: Vec3 = Vec3::new(0.09, 0.259, 0.714);
const INTRO_BLUR: Vec4 = Vec4::new(0.17, 0.18, 0.62, 0.60);
const INTRO_BRIGHTNESS: f32 = 0.6;
const HELP_BLUR: Vec4 = Vec4::new(0.78, 0.3, 0.22, 0.35);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intro {
    Typing,
    AwaitingContinue,
    Done,
}

pub struct BoardScene {
    world: BoardWorld,
    debug: DebugMode,
    intro: Intro,
    story: Typewriter,
    help_on: bool,
}

impl BoardScene {
    pub fn new(
        rng: GameRng,
        debug: DebugMode,
        max_players: usize,
        save_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            world: BoardWorld::new(rng, debug.clone(), max_players, save_path.into()),
            debug,
            intro: Intro::Typing,
            story: Typewriter::default(),
            help_on: true,
        }
    }

    pub fn world(&self) -> &BoardWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut BoardWorld {
        &mut self.world
    }

    pub fn is_intro_done(&self) -> bool {
        self.intro == Intro::Done
    }

    pub fn award_minigame_points(&mut self, points: &[i32]) {
        self.world.award_minigame_points(points);
    }

    fn finish_intro(&mut self) {
        debug!("board intro finished");
        self.intro = Intro::Done;
        self.story.finish(STORY);
        if let Some(screen) = self.world.base_mut().screen_state_mut() {
            screen.screen_brightness = 1.0;
            screen.blur_partial = false;
        }
    }

    fn step_intro(&mut self, renderer: &mut dyn Renderer) {
        if let Some(screen) = self.world.base_mut().screen_state_mut() {
            screen.screen_brightness = INTRO_BRIGHTNESS;
            screen.blur_partial = true;
            screen.blur_rect = INTRO_BLUR;
        }

        text::queue_block(
            renderer,
            self.story.visible(STORY),
            STORY_COLUMNS,
            Vec2::new(0.20, 0.70),
            0.72,
        );
        text::queue_lines(
            renderer,
            &["Press S to skip story"],
            Vec2::new(0.48, 0.33),
            0.55,
            Vec3::ONE,
        );

        if self.intro == Intro::Typing {
            self.story.advance();
            if self.story.is_done(STORY) {
                self.intro = Intro::AwaitingContinue;
            }
        } else {
            text::queue_lines(
                renderer,
                &["Press H at anytime to toggle help"],
                Vec2::new(0.48, 0.30),
                0.55,
                Vec3::ONE,
            );
            text::queue_lines(
                renderer,
                &["Press Enter to continue..."],
                Vec2::new(0.48, 0.25),
                0.75,
                Vec3::new(1.0, 0.85, 0.2),
            );
        }

        renderer.render_text_only(self.world.base(), INTRO_BACKGROUND);
    }

    fn step_board(&mut self, delta_ms: f32, renderer: &mut dyn Renderer) -> SceneStatus {
        let finished = self.world.step(delta_ms);
        physics::step(self.world.base_mut(), delta_ms, &self.debug);
        animation::advance(self.world.base_mut(), delta_ms);

        let help_on = self.help_on;
        if let Some(screen) = self.world.base_mut().screen_state_mut() {
            screen.blur_partial = help_on;
            screen.blur_rect = HELP_BLUR;
        }
        if help_on {
            text::queue_lines(renderer, &HELP, Vec2::new(0.8, 0.6), 0.6, Vec3::ONE);
        }
        self.world.queue_hud(renderer);
        renderer.draw(self.world.base());

        match finished {
            Some(players) => {
                info!(players, "every player has moved");
                SceneStatus::Ended(SceneOutcome::Board { players })
            }
            None => SceneStatus::Running,
        }
    }
}

impl Scene for BoardScene {
    fn name(&self) -> &'static str {
        "board"
    }

    fn step(&mut self, delta_ms: f32, renderer: &mut dyn Renderer) -> SceneStatus {
        match self.intro {
            Intro::Done => self.step_board(delta_ms, renderer),
            Intro::Typing | Intro::AwaitingContinue => {
                self.step_intro(renderer);
                SceneStatus::Running
            }
        }
    }

    /// Players and points survive re-entering the board; only an explicit
    /// reset starts it over.
    fn reset_scene(&mut self) {
        debug!("restarting board");
        self.world.restart();
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) -> SceneStatus {
        if key == Key::Letter('H') && action == KeyAction::Press {
            self.help_on = !self.help_on;
        }

        match (self.intro, key, action) {
            (Intro::Done, _, _) => self.world.on_key(key, action),
            (Intro::Typing | Intro::AwaitingContinue, Key::Letter('S'), KeyAction::Release) => {
                self.finish_intro()
            }
            (Intro::AwaitingContinue, Key::Enter, KeyAction::Release) => self.finish_intro(),
            _ => {}
        }
        SceneStatus::Running
    }

    fn on_mouse_move(&mut self, _position: Vec2) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_render::HeadlessRenderer;

    fn scene() -> BoardScene {
        let save = std::env::temp_dir().join("doge_board_scene_unused.txt");
        BoardScene::new(doge_core::math::game_rng(Some(5)), DebugMode::new(true), 4, save)
    }

    fn release(scene: &mut BoardScene, key: Key) -> SceneStatus {
        scene.on_key(key, KeyAction::Release, Modifiers::default())
    }

    fn renderer() -> HeadlessRenderer {
        HeadlessRenderer::new(Vec2::new(1200.0, 800.0))
    }

    #[test]
    fn test_story_types_out_then_waits_for_enter() {
        let mut scene = scene();
        let mut renderer = renderer();

        release(&mut scene, Key::Enter);
        assert_eq!(scene.intro, Intro::Typing);

        for _ in 0..STORY.len() + 1 {
            scene.step(16.0, &mut renderer);
        }
        assert_eq!(scene.intro, Intro::AwaitingContinue);
        let frame = renderer.last_frame().unwrap();
        assert_eq!(frame.background, Some(INTRO_BACKGROUND));
        assert!(frame.texts.iter().any(|t| t.text == "Press Enter to continue..."));

        release(&mut scene, Key::Enter);
        assert!(scene.is_intro_done());
        assert_eq!(scene.world().base().screen_state().unwrap().screen_brightness, 1.0);
    }

    #[test]
    fn test_skip_does_not_reach_the_board() {
        let mut scene = scene();
        release(&mut scene, Key::Letter('S'));
        assert!(scene.is_intro_done());
        assert_eq!(scene.world().state(), BoardState::WaitingConfirmation);

        release(&mut scene, Key::Space);
        assert_eq!(scene.world().state(), BoardState::Rolling);
    }

    #[test]
    fn test_keys_are_held_back_during_intro() {
        let mut scene = scene();
        release(&mut scene, Key::F1);
        assert_eq!(scene.world().player_count(), 1);
    }

    #[test]
    fn test_help_toggles_on_press() {
        let mut scene = scene();
        let mut renderer = renderer();
        release(&mut scene, Key::Letter('S'));

        scene.step(16.0, &mut renderer);
        let with_help = renderer.last_frame().unwrap().texts.len();

        scene.on_key(Key::Letter('H'), KeyAction::Press, Modifiers::default());
        scene.step(16.0, &mut renderer);
        let without_help = renderer.last_frame().unwrap().texts.len();

        assert_eq!(with_help - without_help, HELP.len());
        assert!(!scene.world().base().screen_state().unwrap().blur_partial);
    }

    #[test]
    fn test_round_ends_with_player_count() {
        let mut scene = scene();
        let mut renderer = renderer();
        release(&mut scene, Key::Letter('S'));
        release(&mut scene, Key::F1);
        release(&mut scene, Key::F1);

        let mut ended = None;
        for _ in 0..3 {
            release(&mut scene, Key::Space);
            release(&mut scene, Key::Digit(2));
            for _ in 0..100 {
                if let SceneStatus::Ended(outcome) = scene.step(100.0, &mut renderer) {
                    ended = Some(outcome);
                    break;
                }
                if scene.world().state() == BoardState::WaitingConfirmation {
                    break;
                }
            }
        }
        assert_eq!(ended, Some(SceneOutcome::Board { players: 3 }));
    }
}
