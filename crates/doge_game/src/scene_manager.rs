//! Scene lifecycle
//!
//! The manager owns every scene for the whole run and decides which one is
//! active. A round is:
//!
//! ```text
//! Board ─▶ SwitchPlayers ─▶ MiniGame ─┬─▶ SwitchPlayers ─▶ MiniGame … (players left)
//!                                     └─▶ Board (everyone played, rounds_left -= 1)
//! ```
//!
//! The game is over once `rounds_left` reaches zero or `Q` is released.
//!
//! Debug mode adds a second, separate path: digit hotkeys jump straight to
//! a scene without touching `players_played` or `rounds_left`.

use doge_core::math::{game_rng, GameRng, Rng, SeedableRng, Vec2};
use doge_render::Renderer;
use doge_services::settings::GameSettings;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::{debug, info};

use crate::scene::{MiniGameResult, Scene, SceneOutcome, SceneStatus};
use crate::scenes::constrained_chaos::ConstrainedChaosWorld;
use crate::scenes::daycare::DaycareWorld;
use crate::scenes::mac::MacWorld;
use crate::scenes::planit::PlanitWorld;
use crate::scenes::shower::ShowerWorld;
use crate::scenes::{BoardScene, MiniGameScene, SwitchPlayersScene};
use crate::{DebugMode, GameMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveScene {
    Board,
    SwitchPlayers,
    MiniGame(GameMode),
}

pub struct SceneManager {
    board: BoardScene,
    switch_players: SwitchPlayersScene,
    /// Indexed by [`GameMode::index`].
    mini_games: Vec<Box<dyn Scene>>,
    active: ActiveScene,
    current_mini_game: Option<GameMode>,
    num_players: usize,
    players_played: usize,
    rounds_left: u32,
    /// Points of each player who has played this round, in turn order.
    round_points: Vec<i32>,
    quit: bool,
    debug: DebugMode,
}

fn build_mini_game(mode: GameMode, rng: GameRng, debug: DebugMode) -> Box<dyn Scene> {
    match mode {
        GameMode::Mac => Box::new(MiniGameScene::new(MacWorld::new(rng), debug)),
        GameMode::Planit => Box::new(MiniGameScene::new(PlanitWorld::new(rng), debug)),
        GameMode::Shower => Box::new(MiniGameScene::new(ShowerWorld::new(rng), debug)),
        GameMode::ConstrainedChaos => {
            Box::new(MiniGameScene::new(ConstrainedChaosWorld::new(rng), debug))
        }
        GameMode::Daycare => Box::new(MiniGameScene::new(DaycareWorld::new(rng), debug)),
    }
}

impl SceneManager {
    /// Build every scene up front. Each scene gets its own generator, seeded
    /// from `settings.rng_seed` when set.
    pub fn new(settings: &GameSettings, debug: DebugMode) -> Self {
        let mut seeds = game_rng(settings.rng_seed);
        info!(seed = ?settings.rng_seed, rounds = settings.rounds, "creating scenes");
        let mut next_rng = move || GameRng::seed_from_u64(seeds.gen());

        let board = BoardScene::new(
            next_rng(),
            debug.clone(),
            settings.max_players,
            settings.save_path.clone(),
        );
        let switch_players = SwitchPlayersScene::new(next_rng());
        let mini_games = GameMode::ALL
            .iter()
            .map(|&mode| build_mini_game(mode, next_rng(), debug.clone()))
            .collect();

        Self {
            board,
            switch_players,
            mini_games,
            active: ActiveScene::Board,
            current_mini_game: None,
            num_players: 1,
            players_played: 0,
            rounds_left: settings.rounds,
            round_points: Vec::new(),
            quit: false,
            debug,
        }
    }

    pub fn active(&self) -> ActiveScene {
        self.active
    }

    pub fn rounds_left(&self) -> u32 {
        self.rounds_left
    }

    pub fn players_played(&self) -> usize {
        self.players_played
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn current_mini_game(&self) -> Option<GameMode> {
        self.current_mini_game
    }

    pub fn debug(&self) -> &DebugMode {
        &self.debug
    }

    pub fn board(&self) -> &BoardScene {
        &self.board
    }

    pub fn switch_players(&self) -> &SwitchPlayersScene {
        &self.switch_players
    }

    pub fn is_quit_game(&self) -> bool {
        self.quit || self.rounds_left == 0
    }

    pub fn current_scene(&self) -> &dyn Scene {
        match self.active {
            ActiveScene::Board => &self.board,
            ActiveScene::SwitchPlayers => &self.switch_players,
            ActiveScene::MiniGame(mode) => self.mini_games[mode.index()].as_ref(),
        }
    }

    fn current_scene_mut(&mut self) -> &mut dyn Scene {
        match self.active {
            ActiveScene::Board => &mut self.board,
            ActiveScene::SwitchPlayers => &mut self.switch_players,
            ActiveScene::MiniGame(mode) => self.mini_games[mode.index()].as_mut(),
        }
    }

    /// Step the active scene once. Does nothing after the game is over.
    pub fn step(&mut self, delta_ms: f32, renderer: &mut dyn Renderer) {
        if self.is_quit_game() {
            return;
        }
        if let SceneStatus::Ended(outcome) = self.current_scene_mut().step(delta_ms, renderer) {
            self.complete(outcome);
        }
    }

    /// Handle the global hotkeys, then hand the key to the active scene.
    pub fn on_key(&mut self, key: Key, action: KeyAction, mods: Modifiers) {
        if action == KeyAction::Release {
            match key {
                Key::Letter('D') => {
                    let enabled = self.debug.toggle();
                    info!(enabled, "debug mode toggled");
                }
                Key::Letter('R') => {
                    debug!(scene = self.current_scene().name(), "resetting scene");
                    self.current_scene_mut().reset_scene();
                }
                Key::Letter('Q') => {
                    info!("quit requested");
                    self.quit = true;
                }
                Key::Digit(digit) if self.debug.is_enabled() => self.debug_jump(digit),
                _ => {}
            }
        }

        if let SceneStatus::Ended(outcome) = self.current_scene_mut().on_key(key, action, mods) {
            self.complete(outcome);
        }
    }

    pub fn on_mouse_move(&mut self, position: Vec2) {
        self.current_scene_mut().on_mouse_move(position);
    }

    /// Advance the lifecycle after the active scene reported `outcome`.
    pub fn complete(&mut self, outcome: SceneOutcome) {
        match outcome {
            SceneOutcome::Board { players } => self.board_finished(players),
            SceneOutcome::SwitchPlayers => self.switch_finished(),
            SceneOutcome::MiniGame(result) => self.mini_game_finished(result),
        }
        debug!(
            active = ?self.active,
            players_played = self.players_played,
            rounds_left = self.rounds_left,
            "scene transition"
        );
    }

    fn board_finished(&mut self, players: usize) {
        self.num_players = players;
        self.players_played = 0;
        self.round_points.clear();
        self.current_mini_game = None;

        self.switch_players.reset_scene();
        self.switch_players.request_new_minigame();
        self.active = ActiveScene::SwitchPlayers;
    }

    fn switch_finished(&mut self) {
        let game = match self.current_mini_game {
            Some(game) => game,
            None => {
                let game = self.switch_players.next_game_mode();
                self.current_mini_game = Some(game);
                self.switch_players.reset_scene();
                game
            }
        };
        self.mini_games[game.index()].reset_scene();
        self.active = ActiveScene::MiniGame(game);
    }

    fn mini_game_finished(&mut self, result: MiniGameResult) {
        self.players_played += 1;
        self.round_points.push(result.points);

        if self.players_played < self.num_players {
            self.switch_players.change_next_game_mode(result.game);
            self.switch_players.disable_render();
            self.active = ActiveScene::SwitchPlayers;
            return;
        }

        self.board.award_minigame_points(&self.round_points);
        self.round_points.clear();
        self.current_mini_game = None;
        self.rounds_left = self.rounds_left.saturating_sub(1);
        self.active = ActiveScene::Board;
        info!(rounds_left = self.rounds_left, "round complete");
    }

    /// Debug-only jumps. `1`..=`5` force a mini-game through the switch
    /// screen, `0` returns to the board.
    fn debug_jump(&mut self, digit: u8) {
        if digit == 0 {
            debug!("debug jump to board");
            self.active = ActiveScene::Board;
        } else if let Some(game) = GameMode::from_debug_digit(digit) {
            debug!(?game, "debug jump to mini-game");
            self.current_mini_game = None;
            self.switch_players.change_next_game_mode(game);
            self.active = ActiveScene::SwitchPlayers;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_render::HeadlessRenderer;

    const SEEDS: [u64; 4] = [1, 17, 99, 2024];

    fn seeded_settings(rounds: u32, seed: u64) -> GameSettings {
        GameSettings {
            rounds,
            max_players: 4,
            rng_seed: Some(seed),
            save_path: std::env::temp_dir().join("doge_manager_unused.txt"),
        }
    }

    fn seeded_manager(rounds: u32, seed: u64) -> SceneManager {
        SceneManager::new(&seeded_settings(rounds, seed), DebugMode::new(false))
    }

    fn manager(rounds: u32) -> SceneManager {
        seeded_manager(rounds, 17)
    }

    fn release(manager: &mut SceneManager, key: Key) {
        manager.on_key(key, KeyAction::Release, Modifiers::default());
    }

    /// Report whatever the active scene would report when it ends.
    fn finish_active(manager: &mut SceneManager, players: usize) {
        let outcome = match manager.active() {
            ActiveScene::Board => SceneOutcome::Board { players },
            ActiveScene::SwitchPlayers => SceneOutcome::SwitchPlayers,
            ActiveScene::MiniGame(game) => SceneOutcome::MiniGame(MiniGameResult { game, points: 2 }),
        };
        manager.complete(outcome);
    }

    #[test]
    fn test_every_round_count_terminates() {
        for seed in SEEDS {
            for rounds in 1..=4 {
                for players in 1..=4 {
                    let mut manager = seeded_manager(rounds, seed);
                    let mut transitions = 0;
                    while !manager.is_quit_game() {
                        finish_active(&mut manager, players);
                        transitions += 1;
                        assert!(
                            transitions < 1000,
                            "seed={seed} R={rounds} P={players} never ended"
                        );
                    }
                    assert_eq!(manager.rounds_left(), 0);
                    assert_eq!(manager.active(), ActiveScene::Board);
                    // board + (switch + mini-game) per player, every round
                    assert_eq!(transitions, rounds as usize * (1 + 2 * players));
                }
            }
        }
    }

    #[test]
    fn test_last_player_returns_to_board() {
        let mut manager = manager(5);
        finish_active(&mut manager, 3);
        assert_eq!(manager.active(), ActiveScene::SwitchPlayers);
        assert!(manager.switch_players().is_tutorial_shown());

        finish_active(&mut manager, 3);
        let ActiveScene::MiniGame(game) = manager.active() else {
            panic!("expected a mini-game, got {:?}", manager.active());
        };

        // first two players
        for _ in 0..2 {
            finish_active(&mut manager, 3);
            assert_eq!(manager.active(), ActiveScene::SwitchPlayers);
            assert!(!manager.switch_players().is_tutorial_shown());
            finish_active(&mut manager, 3);
            assert_eq!(manager.active(), ActiveScene::MiniGame(game));
        }
        assert_eq!(manager.players_played(), 2);
        assert_eq!(manager.rounds_left(), 5);

        finish_active(&mut manager, 3);
        assert_eq!(manager.active(), ActiveScene::Board);
        assert_eq!(manager.rounds_left(), 4);
        assert_eq!(manager.current_mini_game(), None);
    }

    #[test]
    fn test_round_points_reach_the_board() {
        let mut manager = manager(3);
        let before = manager.board().world().registry().players.components()[0].points;

        finish_active(&mut manager, 1);
        finish_active(&mut manager, 1);
        finish_active(&mut manager, 1);

        let after = manager.board().world().registry().players.components()[0].points;
        assert_eq!(after, before + 2);
    }

    #[test]
    fn test_consecutive_rounds_pick_different_games() {
        for seed in SEEDS {
            let mut manager = seeded_manager(10, seed);
            let mut previous = None;
            for _ in 0..5 {
                finish_active(&mut manager, 1);
                finish_active(&mut manager, 1);
                let ActiveScene::MiniGame(game) = manager.active() else {
                    panic!("expected a mini-game");
                };
                assert_ne!(Some(game), previous, "seed={seed}");
                previous = Some(game);
                finish_active(&mut manager, 1);
            }
        }
    }

    #[test]
    fn test_quit_hotkey() {
        let mut manager = manager(3);
        assert!(!manager.is_quit_game());
        manager.on_key(Key::Letter('Q'), KeyAction::Press, Modifiers::default());
        assert!(!manager.is_quit_game());
        release(&mut manager, Key::Letter('Q'));
        assert!(manager.is_quit_game());

        let mut renderer = HeadlessRenderer::new(Vec2::new(1200.0, 800.0));
        manager.step(16.0, &mut renderer);
        assert_eq!(renderer.frames_rendered(), 0);
    }

    #[test]
    fn test_debug_jumps_bypass_bookkeeping() {
        let mut manager = manager(3);

        release(&mut manager, Key::Digit(2));
        assert_eq!(manager.active(), ActiveScene::Board);

        release(&mut manager, Key::Letter('D'));
        assert!(manager.debug().is_enabled());

        release(&mut manager, Key::Digit(2));
        assert_eq!(manager.active(), ActiveScene::SwitchPlayers);
        assert_eq!(manager.switch_players().next_game_mode(), GameMode::Shower);

        release(&mut manager, Key::Enter);
        assert_eq!(manager.active(), ActiveScene::MiniGame(GameMode::Shower));
        assert_eq!(manager.rounds_left(), 3);
        assert_eq!(manager.players_played(), 0);

        release(&mut manager, Key::Digit(0));
        assert_eq!(manager.active(), ActiveScene::Board);
        assert_eq!(manager.rounds_left(), 3);
    }

    #[test]
    fn test_step_drives_the_board() {
        let mut manager = manager(2);
        let mut renderer = HeadlessRenderer::new(Vec2::new(1200.0, 800.0));

        release(&mut manager, Key::Letter('S'));
        release(&mut manager, Key::Space);
        release(&mut manager, Key::Space);
        for _ in 0..200 {
            manager.step(100.0, &mut renderer);
            if manager.active() != ActiveScene::Board {
                break;
            }
        }

        assert_eq!(manager.active(), ActiveScene::SwitchPlayers);
        assert_eq!(manager.num_players(), 1);
        assert!(renderer.frames_rendered() > 0);
        assert_eq!(manager.current_scene().name(), "switch_players");
    }
}
