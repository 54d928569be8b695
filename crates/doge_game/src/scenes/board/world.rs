//! Board rules: turns, dice, movement along the ring, space effects and the
//! save file.

use std::path::PathBuf;

use doge_core::components::{
    Player, PlayerBoardMovement, RenderLayer, Space, SpaceKind, SpriteAnimation, TextureId,
    UiElement, UiPass,
};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{GameRng, Rng, Vec2, Vec3};
use doge_render::Renderer;
use doge_services::save::{self, SaveRecord};
use doge_services::{Key, KeyAction};
use tracing::{debug, info, warn};

use super::registry::BoardRegistry;
use crate::systems::{spawn, text};
use crate::DebugMode;

/// Time between two hops while a roll is played out.
const HOP_MS: f32 = 200.0;
/// Pause on the landing space before the next player's turn.
const LANDED_MS: f32 = 1000.0;
const MAX_ROLL: usize = 10;
const SPACE_EFFECT: i32 = 3;
const DICE_FRAME_MS: f32 = 60.0;
/// Milliseconds for the camera to close the gap to its target.
const CAMERA_LAG_MS: f32 = 160.0;

const SPACE_GAP: f32 = 50.0;
const BOARD_LEFT: f32 = 50.0;
const BOARD_RIGHT: f32 = 1000.0;
const BOARD_TOP: f32 = 100.0;
const BOARD_BOTTOM: f32 = 700.0;
const SPACE_SIZE: f32 = 45.0;
const PLAYER_SIZE: Vec2 = Vec2::new(60.0, 60.0);
const DICE_SIZE: f32 = 100.0;
const DICE_POSITION: Vec2 = Vec2::new(1100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    /// The active player may add players, save, load, or confirm the turn.
    WaitingConfirmation,
    Rolling,
    Moving,
    Landed,
}

/// Board positions of the ring, counter-clockwise from the start space in
/// the bottom right corner.
fn ring_positions() -> Vec<Vec2> {
    let columns = ((BOARD_RIGHT - BOARD_LEFT) / SPACE_GAP) as usize;
    let rows = ((BOARD_BOTTOM - BOARD_TOP) / SPACE_GAP) as usize;
    let step = |i: usize| i as f32 * SPACE_GAP;

    let bottom = (0..columns).map(|i| Vec2::new(BOARD_RIGHT - step(i), BOARD_BOTTOM));
    let left = (0..rows).map(|i| Vec2::new(BOARD_LEFT, BOARD_BOTTOM - step(i)));
    let top = (0..columns).map(|i| Vec2::new(BOARD_LEFT + step(i), BOARD_TOP));
    let right = (0..rows).map(|i| Vec2::new(BOARD_RIGHT, BOARD_TOP + step(i)));
    bottom.chain(left).chain(top).chain(right).collect()
}

fn space_kind(index: usize) -> SpaceKind {
    match index {
        0 => SpaceKind::Start,
        i if i % 4 == 2 => SpaceKind::Red,
        _ => SpaceKind::Blue,
    }
}

fn space_texture(kind: SpaceKind) -> TextureId {
    match kind {
        SpaceKind::Start => TextureId::StartSpace,
        SpaceKind::Blue => TextureId::BlueSpace,
        SpaceKind::Red => TextureId::RedSpace,
    }
}

pub struct BoardWorld {
    registry: BoardRegistry,
    rng: GameRng,
    debug: DebugMode,
    max_players: usize,
    save_path: PathBuf,
    state: BoardState,
    timer_ms: f32,
    board_start: Entity,
    current_player: Entity,
    dice: Entity,
}

impl BoardWorld {
    pub fn new(
        rng: GameRng,
        debug: DebugMode,
        max_players: usize,
        save_path: PathBuf,
    ) -> Self {
        let mut world = Self {
            registry: BoardRegistry::default(),
            rng,
            debug,
            max_players: max_players.max(1),
            save_path,
            state: BoardState::WaitingConfirmation,
            timer_ms: 0.0,
            board_start: Entity::new(),
            current_player: Entity::new(),
            dice: Entity::new(),
        };
        world.restart();
        world
    }

    pub fn registry(&self) -> &BoardRegistry {
        &self.registry
    }

    pub fn base(&self) -> &BaseRegistry {
        &self.registry.base
    }

    pub fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.registry.base
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn current_player(&self) -> Entity {
        self.current_player
    }

    pub fn player_count(&self) -> usize {
        self.registry.players.len()
    }

    /// Fresh board with a single player on the start space.
    pub fn restart(&mut self) {
        self.registry.clear_all_components();
        spawn::create_camera(&mut self.registry.base);
        spawn::create_screen(&mut self.registry.base);
        spawn::create_sprite(
            &mut self.registry.base,
            TextureId::BoardBackground,
            RenderLayer::Background,
            Vec2::new(525.0, 400.0),
            Vec2::new(2400.0, 1500.0),
        );

        self.board_start = self.create_spaces();
        self.dice = self.create_dice();
        self.state = BoardState::WaitingConfirmation;
        self.timer_ms = 0.0;

        if let Some(first) = self.add_player() {
            self.set_active(first);
        }
        self.snap_camera();
    }

    /// Lay out the ring and link every space to the next. Returns the start.
    fn create_spaces(&mut self) -> Entity {
        let spaces: Vec<Entity> = ring_positions()
            .into_iter()
            .enumerate()
            .map(|(index, position)| {
                let kind = space_kind(index);
                let space = spawn::create_sprite(
                    &mut self.registry.base,
                    space_texture(kind),
                    RenderLayer::World,
                    position,
                    Vec2::splat(SPACE_SIZE),
                );
                self.registry.spaces.insert(space, Space { kind, next_space: None });
                space
            })
            .collect();

        for (index, &space) in spaces.iter().enumerate() {
            let next = spaces[(index + 1) % spaces.len()];
            self.registry.spaces.get_mut(space).next_space = Some(next);
        }
        spaces[0]
    }

    fn create_dice(&mut self) -> Entity {
        let base = &mut self.registry.base;
        let dice = spawn::create_sprite(
            base,
            TextureId::Dice,
            RenderLayer::Ui,
            DICE_POSITION,
            Vec2::splat(DICE_SIZE),
        );
        base.ui_elements.insert(dice, UiElement);
        base.ui_passes.insert(dice, UiPass { display: false });
        base.sprite_animations
            .insert(dice, SpriteAnimation::new(1, MAX_ROLL as u32, DICE_FRAME_MS));
        dice
    }

    /// Put a new player on the start space, unless the board is full.
    pub fn add_player(&mut self) -> Option<Entity> {
        if self.registry.players.len() >= self.max_players {
            debug!(max = self.max_players, "board is full");
            return None;
        }
        let player_id = self.registry.players.len() + 1;
        let start = self.registry.base.transforms.get(self.board_start).position;

        let player = spawn::create_sprite(
            &mut self.registry.base,
            TextureId::Doge,
            RenderLayer::Foreground,
            start,
            PLAYER_SIZE,
        );
        self.registry
            .base
            .sprite_animations
            .insert(player, SpriteAnimation::new(1, 4, 150.0));
        self.registry.players.insert(player, Player::new(player_id));
        self.registry.player_movements.insert(
            player,
            PlayerBoardMovement {
                roll_count_left: 0,
                current_space: self.board_start,
                target_space: self.board_start,
            },
        );
        info!(player_id, "player joined the board");
        Some(player)
    }

    fn set_active(&mut self, player: Entity) {
        self.registry.active_player.clear();
        self.registry.active_player.emplace(player);
        self.current_player = player;
    }

    /// Advance one tick. Returns the number of players once the last player
    /// of the round has finished their turn.
    pub fn step(&mut self, delta_ms: f32) -> Option<usize> {
        self.update_standings();
        self.follow_active_player(delta_ms);

        match self.state {
            BoardState::WaitingConfirmation | BoardState::Rolling => None,
            BoardState::Moving => {
                self.timer_ms -= delta_ms;
                if self.timer_ms <= 0.0 {
                    self.timer_ms += HOP_MS;
                    self.hop();
                }
                None
            }
            BoardState::Landed => {
                self.timer_ms -= delta_ms;
                if self.timer_ms > 0.0 {
                    return None;
                }
                self.state = BoardState::WaitingConfirmation;
                self.registry.base.ui_passes.get_mut(self.dice).display = false;
                self.next_turn().then(|| self.registry.players.len())
            }
        }
    }

    fn hop(&mut self) {
        let player = self.current_player;
        let from = self.registry.player_movements.get(player).current_space;
        let to = self
            .registry
            .spaces
            .get(from)
            .next_space
            .unwrap_or(self.board_start);
        let position = self.registry.base.transforms.get(to).position;
        self.registry.base.transforms.get_mut(player).position = position;

        let movement = self.registry.player_movements.get_mut(player);
        movement.current_space = to;
        movement.target_space = to;
        movement.roll_count_left = movement.roll_count_left.saturating_sub(1);
        if movement.roll_count_left == 0 {
            self.land();
        }
    }

    fn land(&mut self) {
        let space = self.registry.player_movements.get(self.current_player).current_space;
        let kind = self.registry.spaces.get(space).kind;
        let player = self.registry.players.get_mut(self.current_player);
        match kind {
            SpaceKind::Blue => player.points += SPACE_EFFECT,
            SpaceKind::Red => player.points = (player.points - SPACE_EFFECT).max(0),
            SpaceKind::Start => {}
        }
        debug!(player_id = player.player_id, ?kind, points = player.points, "landed");

        self.state = BoardState::Landed;
        self.timer_ms = LANDED_MS;
    }

    /// Hand the turn to the next player. Returns true when the turn wrapped
    /// around to the first player.
    fn next_turn(&mut self) -> bool {
        let players = self.registry.players.entities();
        let index = players
            .iter()
            .position(|&p| p == self.current_player)
            .unwrap_or(0);
        let (next, wrapped) = match players.get(index + 1) {
            Some(&next) => (next, false),
            None => (players[0], true),
        };
        self.set_active(next);
        wrapped
    }

    fn update_standings(&mut self) {
        let points: Vec<i32> = self.registry.players.components().iter().map(|p| p.points).collect();
        for player in self.registry.players.components_mut() {
            player.standing = 1 + points.iter().filter(|&&other| other > player.points).count();
        }
    }

    fn follow_active_player(&mut self, delta_ms: f32) {
        let Some(target) = self
            .registry
            .base
            .transforms
            .try_get(self.current_player)
            .map(|t| t.position)
        else {
            return;
        };
        let blend = (delta_ms / CAMERA_LAG_MS).clamp(0.0, 1.0);
        for camera in self.registry.base.cameras.components_mut() {
            camera.target = target;
            camera.position = camera.position.lerp(target, blend);
        }
    }

    fn snap_camera(&mut self) {
        self.follow_active_player(CAMERA_LAG_MS);
    }

    pub fn on_key(&mut self, key: Key, action: KeyAction) {
        if action != KeyAction::Release {
            return;
        }
        match (self.state, key) {
            (BoardState::WaitingConfirmation | BoardState::Rolling, Key::Letter('S')) => self.save(),
            (BoardState::WaitingConfirmation | BoardState::Rolling, Key::Letter('L')) => self.load(),
            (BoardState::WaitingConfirmation, Key::F1) => {
                self.add_player();
            }
            (BoardState::WaitingConfirmation, Key::Space) => self.start_rolling(),
            (BoardState::Rolling, Key::Space) => {
                let roll = self.rng.gen_range(1..=MAX_ROLL as u32);
                self.roll(roll);
            }
            (BoardState::Rolling, Key::Digit(digit)) if self.debug.is_enabled() => {
                let roll = if digit == 0 { MAX_ROLL as u32 } else { u32::from(digit) };
                debug!(roll, "forced roll");
                self.roll(roll);
            }
            _ => {}
        }
    }

    fn start_rolling(&mut self) {
        self.state = BoardState::Rolling;
        let base = &mut self.registry.base;
        base.ui_passes.get_mut(self.dice).display = true;
        base.sprite_animations.get_mut(self.dice).frame_ms = DICE_FRAME_MS;
    }

    fn roll(&mut self, roll: u32) {
        let movement = self.registry.player_movements.get_mut(self.current_player);
        movement.roll_count_left += roll;
        info!(roll, "dice rolled");

        let dice = self.registry.base.sprite_animations.get_mut(self.dice);
        dice.frame = roll.saturating_sub(1);
        dice.frame_ms = 0.0;

        self.state = BoardState::Moving;
        self.timer_ms = HOP_MS;
    }

    /// Add the points each player earned in the mini-games of the round
    /// just finished, in player order.
    pub fn award_minigame_points(&mut self, points: &[i32]) {
        for (player, earned) in self.registry.players.components_mut().iter_mut().zip(points) {
            player.points += earned;
            debug!(player_id = player.player_id, earned, total = player.points, "mini-game points awarded");
        }
    }

    fn save(&self) {
        let records: Vec<SaveRecord> = self
            .registry
            .players
            .iter()
            .map(|(player, state)| SaveRecord {
                points: state.points,
                position: self.registry.base.transforms.get(player).position,
            })
            .collect();

        match save::write_save(&self.save_path, &records) {
            Ok(()) => info!(path = %self.save_path.display(), players = records.len(), "board saved"),
            Err(err) => warn!(error = %err, "could not save the board"),
        }
    }

    /// Restore points and positions from the save file, creating players as
    /// needed. A missing or empty save leaves the board untouched.
    fn load(&mut self) {
        let records = match save::read_save(&self.save_path) {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "could not load the board");
                return;
            }
        };
        if records.is_empty() {
            warn!(path = %self.save_path.display(), "save file holds no players");
            return;
        }

        for (index, record) in records.iter().enumerate() {
            let existing = self.registry.players.entities().get(index).copied();
            let Some(player) = existing.or_else(|| self.add_player()) else {
                warn!(max = self.max_players, "save holds more players than the board allows");
                break;
            };
            let space = match self.space_at(record.position) {
                Some(space) => space,
                None => {
                    warn!(position = ?record.position, "saved position is not a board space");
                    self.board_start
                }
            };

            self.registry.players.get_mut(player).points = record.points;
            *self.registry.player_movements.get_mut(player) = PlayerBoardMovement {
                roll_count_left: 0,
                current_space: space,
                target_space: space,
            };
            let position = self.registry.base.transforms.get(space).position;
            self.registry.base.transforms.get_mut(player).position = position;
        }
        info!(path = %self.save_path.display(), players = records.len(), "board loaded");
    }

    fn space_at(&self, position: Vec2) -> Option<Entity> {
        self.registry.spaces.entities().iter().copied().find(|&space| {
            self.registry.base.transforms.get(space).position.distance(position) < 1.0
        })
    }

    pub fn queue_hud(&self, renderer: &mut dyn Renderer) {
        for (row, (player, state)) in self.registry.players.iter().enumerate() {
            let color = if player == self.current_player {
                Vec3::new(1.0, 0.85, 0.2)
            } else {
                Vec3::ONE
            };
            let line = format!(
                "Player {}: {} points (#{})",
                state.player_id, state.points, state.standing
            );
            let origin = Vec2::new(0.02, 0.95 - row as f32 * 0.035);
            text::queue_lines(renderer, &[line], origin, 0.6, color);
        }

        let player_id = self
            .registry
            .players
            .try_get(self.current_player)
            .map_or(0, |p| p.player_id);
        let prompt = match self.state {
            BoardState::WaitingConfirmation => {
                format!("Player {player_id}: press Space when ready")
            }
            BoardState::Rolling => "Press Space to roll the dice".to_string(),
            BoardState::Moving => {
                let left = self
                    .registry
                    .player_movements
                    .try_get(self.current_player)
                    .map_or(0, |m| m.roll_count_left);
                format!("{left} spaces to go")
            }
            BoardState::Landed => format!("Player {player_id} landed"),
        };
        text::queue_lines(renderer, &[prompt], Vec2::new(0.02, 0.05), 0.7, Vec3::ONE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(max_players: usize) -> BoardWorld {
        let dir = std::env::temp_dir().join("doge_board_unused.txt");
        BoardWorld::new(doge_core::math::game_rng(Some(3)), DebugMode::new(true), max_players, dir)
    }

    fn release(world: &mut BoardWorld, key: Key) {
        world.on_key(key, KeyAction::Release);
    }

    /// Confirm, force a roll and play the turn out. Returns what the last
    /// step reported.
    fn play_turn(world: &mut BoardWorld, roll: u8) -> Option<usize> {
        release(world, Key::Space);
        release(world, Key::Digit(roll));
        assert_eq!(world.state(), BoardState::Moving);
        for _ in 0..200 {
            let ended = world.step(HOP_MS);
            if world.state() == BoardState::WaitingConfirmation {
                return ended;
            }
        }
        panic!("turn never finished");
    }

    fn points(world: &BoardWorld, player: Entity) -> i32 {
        world.registry().players.get(player).points
    }

    #[test]
    fn test_spaces_form_a_closed_ring() {
        let world = world(4);
        let spaces = &world.registry().spaces;
        assert_eq!(spaces.len(), ring_positions().len());

        let start = spaces.entities()[0];
        assert_eq!(spaces.get(start).kind, SpaceKind::Start);
        let mut space = start;
        for _ in 0..spaces.len() {
            space = spaces.get(space).next_space.unwrap();
        }
        assert_eq!(space, start);
        assert_eq!(world.base().transforms.get(start).position, Vec2::new(1000.0, 700.0));
    }

    #[test]
    fn test_f1_adds_players_up_to_the_limit() {
        let mut world = world(3);
        assert_eq!(world.player_count(), 1);
        for _ in 0..5 {
            release(&mut world, Key::F1);
        }
        assert_eq!(world.player_count(), 3);

        let ids: Vec<_> = world.registry().players.components().iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(world.registry().active_player.len(), 1);
    }

    #[test]
    fn test_blue_and_red_spaces() {
        let mut world = world(1);
        let player = world.current_player();

        // start (0) → blue (1)
        play_turn(&mut world, 1);
        assert_eq!(points(&world, player), 13);

        // blue (1) → red (2)
        play_turn(&mut world, 1);
        assert_eq!(points(&world, player), 10);

        world.registry.players.get_mut(player).points = 1;
        // red (2) → … → red (6)
        play_turn(&mut world, 4);
        assert_eq!(points(&world, player), 0);

        let on = world.registry().player_movements.get(player).current_space;
        assert_eq!(world.registry().spaces.get(on).kind, SpaceKind::Red);
        assert_eq!(world.base().transforms.get(player).position, Vec2::new(700.0, 700.0));
    }

    #[test]
    fn test_board_ends_after_last_player() {
        let mut world = world(4);
        release(&mut world, Key::F1);
        let first = world.current_player();

        assert_eq!(play_turn(&mut world, 3), None);
        assert_ne!(world.current_player(), first);

        assert_eq!(play_turn(&mut world, 3), Some(2));
        assert_eq!(world.current_player(), first);
        assert!(world.registry().active_player.has(first));
    }

    #[test]
    fn test_digits_only_force_a_roll_in_debug_mode() {
        let mut world = world(1);
        world.debug.set(false);
        release(&mut world, Key::Space);
        release(&mut world, Key::Digit(4));
        assert_eq!(world.state(), BoardState::Rolling);

        release(&mut world, Key::Space);
        assert_eq!(world.state(), BoardState::Moving);
        let left = world.registry().player_movements.get(world.current_player()).roll_count_left;
        assert!((1..=MAX_ROLL as u32).contains(&left));
    }

    #[test]
    fn test_standings_follow_points() {
        let mut world = world(3);
        release(&mut world, Key::F1);
        release(&mut world, Key::F1);
        world.award_minigame_points(&[5, 0, 5]);
        world.step(16.0);

        let standings: Vec<_> = world.registry().players.components().iter().map(|p| p.standing).collect();
        assert_eq!(standings, vec![1, 3, 1]);
    }

    #[test]
    fn test_save_and_load_restore_players() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.txt");
        let mut world = BoardWorld::new(doge_core::math::game_rng(Some(9)), DebugMode::new(true), 4, path.clone());
        release(&mut world, Key::F1);
        play_turn(&mut world, 5);
        let moved = world.registry().players.entities()[0];
        let saved_position = world.base().transforms.get(moved).position;
        let saved_points = points(&world, moved);

        release(&mut world, Key::Letter('S'));
        assert!(path.exists());

        world.restart();
        assert_eq!(world.player_count(), 1);
        release(&mut world, Key::Letter('L'));

        assert_eq!(world.player_count(), 2);
        let first = world.registry().players.entities()[0];
        assert_eq!(points(&world, first), saved_points);
        assert_eq!(world.base().transforms.get(first).position, saved_position);
        let movement = world.registry().player_movements.get(first);
        assert_eq!(movement.roll_count_left, 0);
        assert_eq!(world.base().transforms.get(movement.current_space).position, saved_position);
    }

    #[test]
    fn test_load_without_save_keeps_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut world =
            BoardWorld::new(doge_core::math::game_rng(Some(1)), DebugMode::new(false), 4, dir.path().join("none.txt"));
        release(&mut world, Key::Letter('L'));
        assert_eq!(world.player_count(), 1);
        assert_eq!(world.state(), BoardState::WaitingConfirmation);
    }
}
