//! Survive in space: dodge the rocks drifting in from the right.
//!
//! Every rock that leaves the screen on the left while the player is still
//! alive is worth a point. The first hit starts the death timer.

use doge_core::components::{Color, Player, TextureId};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{GameRng, Rng, Vec2, Vec3};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};

use crate::scenes::minigame::MiniGameWorld;
use crate::systems::{death, physics, spawn, text};
use crate::GameMode;

const MAX_ROCKS: usize = 25;
const ROCK_DELAY_MS: f32 = 2000.0;
const ROCK_SIZE: f32 = 50.0;
const ROCK_SPEED: f32 = 0.1;
const PLAYER_SPEED: f32 = 0.2;
const PLAYER_SIZE: Vec2 = Vec2::new(100.0, 50.0);

#[derive(Debug, Clone, Copy, Default)]
pub struct Rock;

doge_core::define_registry! {
    pub struct MacRegistry: BaseRegistry {
        rocks: Rock,
        players: Player,
    }
}

pub struct MacWorld {
    registry: MacRegistry,
    rng: GameRng,
    player: Entity,
    points: i32,
    next_rock_spawn_ms: f32,
}

impl MacWorld {
    pub fn new(rng: GameRng) -> Self {
        Self {
            registry: MacRegistry::default(),
            rng,
            player: Entity::new(),
            points: 0,
            next_rock_spawn_ms: 0.0,
        }
    }

    pub fn registry(&self) -> &MacRegistry {
        &self.registry
    }

    fn is_alive(&self) -> bool {
        !self.registry.base.death_timers.has(self.player)
    }

    fn spawn_rock(&mut self, position: Vec2, velocity: Vec2) -> Entity {
        let rock = spawn::create_body(
            &mut self.registry.base,
            TextureId::Rock,
            position,
            Vec2::splat(ROCK_SIZE),
            velocity,
        );
        self.registry.rocks.emplace(rock);
        rock
    }

    fn spawn_rocks(&mut self, delta_ms: f32, fov: Vec2) {
        self.next_rock_spawn_ms -= delta_ms;
        if self.registry.rocks.len() >= MAX_ROCKS || self.next_rock_spawn_ms >= 0.0 {
            return;
        }
        self.next_rock_spawn_ms = ROCK_DELAY_MS / 2.0 + self.rng.gen::<f32>() * ROCK_DELAY_MS / 2.0;

        let y = 50.0 + self.rng.gen::<f32>() * (fov.y - 100.0);
        let vertical = if self.rng.gen_bool(0.5) { -ROCK_SPEED } else { ROCK_SPEED };
        self.spawn_rock(Vec2::new(fov.x + ROCK_SIZE, y), Vec2::new(-ROCK_SPEED, vertical));
    }

    /// Bounce rocks off the top and bottom edges, retire the ones that left
    /// on the left.
    fn update_rocks(&mut self, fov: Vec2) {
        let alive = self.is_alive();
        let mut escaped = Vec::new();
        let BaseRegistry {
            transforms,
            velocities,
            ..
        } = &mut self.registry.base;

        for &rock in self.registry.rocks.entities() {
            let (Some(transform), Some(velocity)) =
                (transforms.try_get(rock), velocities.try_get_mut(rock))
            else {
                continue;
            };
            let half = transform.half_extents();
            if (transform.position.y < half.y && velocity.0.y < 0.0)
                || (transform.position.y > fov.y - half.y && velocity.0.y > 0.0)
            {
                velocity.0.y = -velocity.0.y;
            }
            if transform.position.x < -half.x {
                escaped.push(rock);
            }
        }

        for rock in escaped {
            self.registry.remove_all_components_of(rock);
            if alive {
                self.points += 1;
            }
        }
    }

    fn keep_player_on_screen(&mut self, fov: Vec2) {
        if let Some(transform) = self.registry.base.transforms.try_get_mut(self.player) {
            let half = transform.half_extents();
            transform.position = transform.position.clamp(half, fov - half);
        }
    }

    fn bounce_rocks(&mut self, a: Entity, b: Entity) {
        let velocities = &mut self.registry.base.velocities;
        let (Some(va), Some(vb)) = (velocities.try_get(a).copied(), velocities.try_get(b).copied())
        else {
            return;
        };
        velocities.get_mut(a).0 = vb.0;
        velocities.get_mut(b).0 = va.0;
    }
}

impl MiniGameWorld for MacWorld {
    const MODE: GameMode = GameMode::Mac;
    const NAME: &'static str = "mac";

    fn base(&self) -> &BaseRegistry {
        &self.registry.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.registry.base
    }

    fn restart(&mut self) {
        self.registry.clear_all_components();
        self.registry.list_all_components();

        spawn::create_stage(&mut self.registry.base, TextureId::SpaceBackground);
        self.player = spawn::create_body(
            &mut self.registry.base,
            TextureId::Doge,
            Vec2::new(100.0, 200.0),
            PLAYER_SIZE,
            Vec2::ZERO,
        );
        self.registry.players.insert(self.player, Player::new(0));
        self.registry
            .base
            .colors
            .insert(self.player, Color(Vec3::new(1.0, 0.8, 0.8)));

        self.points = 0;
        self.next_rock_spawn_ms = 0.0;
    }

    fn step(&mut self, delta_ms: f32) -> Option<i32> {
        let fov = self.registry.base.camera().copied().unwrap_or_default().fov;

        self.spawn_rocks(delta_ms, fov);
        self.update_rocks(fov);
        self.keep_player_on_screen(fov);

        death::tick(&mut self.registry.base, delta_ms).then_some(self.points)
    }

    fn handle_collisions(&mut self) {
        for (entity, other) in physics::drain_collisions(&mut self.registry.base) {
            let rock_hit = self.registry.rocks.has(other);
            if rock_hit && self.registry.rocks.has(entity) && entity < other {
                self.bounce_rocks(entity, other);
            }
            if rock_hit && self.registry.players.has(entity) && self.is_alive() {
                death::start(&mut self.registry.base, entity);
                if let Some(color) = self.registry.base.colors.try_get_mut(entity) {
                    color.0 = Vec3::new(0.8, 0.1, 0.1);
                }
            }
        }
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) {
        if !self.is_alive() {
            return;
        }
        let speed = if action.is_down() { PLAYER_SPEED } else { 0.0 };
        let base = &mut self.registry.base;
        let (Some(velocity), Some(transform)) = (
            base.velocities.try_get_mut(self.player),
            base.transforms.try_get_mut(self.player),
        ) else {
            return;
        };

        match key {
            Key::Left => {
                velocity.0.x = -speed;
                transform.scale.x = -transform.scale.x.abs();
            }
            Key::Right => {
                velocity.0.x = speed;
                transform.scale.x = transform.scale.x.abs();
            }
            Key::Up => velocity.0.y = -speed,
            Key::Down => velocity.0.y = speed,
            _ => {}
        }
    }

    fn queue_hud(&self, renderer: &mut dyn Renderer) {
        text::queue_lines(
            renderer,
            &[format!("Points: {}", self.points)],
            Vec2::new(0.02, 0.95),
            1.0,
            Vec3::ONE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MiniGameResult, Scene, SceneOutcome, SceneStatus};
    use crate::scenes::minigame::MiniGameScene;
    use crate::DebugMode;
    use doge_render::HeadlessRenderer;

    fn world() -> MacWorld {
        let mut world = MacWorld::new(doge_core::math::game_rng(Some(7)));
        world.restart();
        world
    }

    #[test]
    fn test_rock_hit_ends_game_after_death_timer() {
        let mut world = world();
        let position = world.registry.base.transforms.get(world.player).position;
        world.spawn_rock(position, Vec2::ZERO);

        physics::detect_collisions(&mut world.registry.base);
        world.handle_collisions();

        assert!(world.registry.base.death_timers.has(world.player));
        assert!(world.registry.base.collisions.is_empty());
        assert_eq!(world.step(500.0), None);
        assert_eq!(world.step(600.0), Some(0));
    }

    #[test]
    fn test_escaped_rock_scores() {
        let mut world = world();
        let rock = world.spawn_rock(Vec2::new(-ROCK_SIZE, 300.0), Vec2::new(-ROCK_SPEED, 0.0));

        assert_eq!(world.step(0.0), None);

        assert_eq!(world.points, 1);
        assert!(!world.registry.rocks.has(rock));
        assert!(!world.registry.base.transforms.has(rock));
    }

    #[test]
    fn test_arrow_keys_move_player() {
        let mut world = world();
        world.on_key(Key::Left, KeyAction::Press, Modifiers::default());
        assert_eq!(world.registry.base.velocities.get(world.player).0.x, -PLAYER_SPEED);
        assert!(world.registry.base.transforms.get(world.player).scale.x < 0.0);

        world.on_key(Key::Left, KeyAction::Release, Modifiers::default());
        assert_eq!(world.registry.base.velocities.get(world.player).0.x, 0.0);
    }

    #[test]
    fn test_scene_reports_result_when_dead() {
        let mut scene = MiniGameScene::new(world(), DebugMode::new(false));
        let mut renderer = HeadlessRenderer::new(Vec2::new(1200.0, 800.0));
        let player = scene.world().player;
        death::start(scene.world_mut().base_mut(), player);

        assert_eq!(scene.step(16.0, &mut renderer), SceneStatus::Running);
        assert_eq!(renderer.frames_rendered(), 1);
        assert_eq!(
            scene.step(1000.0, &mut renderer),
            SceneStatus::Ended(SceneOutcome::MiniGame(MiniGameResult {
                game: GameMode::Mac,
                points: 0,
            }))
        );

        scene.reset_scene();
        assert!(scene.world().base().death_timers.is_empty());
    }
}
