//! Steal the energy: catch falling sushi, dodge the cats the alien drops.

use doge_core::components::{Acceleration, Color, Player, RenderLayer, TextureId};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{GameRng, Rng, Vec2, Vec3};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};

use crate::scenes::minigame::MiniGameWorld;
use crate::systems::{death, physics, spawn, text};
use crate::GameMode;

const GRAVITY: f32 = 0.0003;
const JUMP_SPEED: f32 = 0.35;
const PLAYER_SPEED: f32 = 0.4;
const ALIEN_SPEED: f32 = 0.2;
const CAT_WALK_SPEED: f32 = 0.15;
const CAT_DELAY_MS: f32 = 4000.0;
const SUSHI_DELAY_MS: f32 = 5000.0;
const PLAYER_SIZE: Vec2 = Vec2::new(80.0, 80.0);
const CAT_SIZE: Vec2 = Vec2::new(60.0, 50.0);
const SUSHI_SIZE: Vec2 = Vec2::new(40.0, 30.0);

#[derive(Debug, Clone, Copy, Default)]
pub struct Cat;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sushi;

/// The alien at the top of the screen that follows the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alien;

/// Standing on the floor; only grounded entities can jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grounded;

doge_core::define_registry! {
    pub struct ShowerRegistry: BaseRegistry {
        players: Player,
        cats: Cat,
        sushi: Sushi,
        aliens: Alien,
        grounded: Grounded,
    }
}

pub struct ShowerWorld {
    registry: ShowerRegistry,
    rng: GameRng,
    player: Entity,
    alien: Entity,
    points: i32,
    next_cat_spawn_ms: f32,
    next_sushi_spawn_ms: f32,
}

impl ShowerWorld {
    pub fn new(rng: GameRng) -> Self {
        Self {
            registry: ShowerRegistry::default(),
            rng,
            player: Entity::new(),
            alien: Entity::new(),
            points: 0,
            next_cat_spawn_ms: CAT_DELAY_MS / 2.0,
            next_sushi_spawn_ms: 0.0,
        }
    }

    pub fn registry(&self) -> &ShowerRegistry {
        &self.registry
    }

    fn is_alive(&self) -> bool {
        !self.registry.base.death_timers.has(self.player)
    }

    fn spawn_falling(&mut self, texture: TextureId, position: Vec2, size: Vec2) -> Entity {
        let entity = spawn::create_body(&mut self.registry.base, texture, position, size, Vec2::ZERO);
        self.registry
            .base
            .accelerations
            .insert(entity, Acceleration(Vec2::new(0.0, GRAVITY)));
        entity
    }

    fn chase_player(&mut self) {
        let base = &mut self.registry.base;
        let Some(target) = base.transforms.try_get(self.player).map(|t| t.position.x) else {
            return;
        };
        let Some(x) = base.transforms.try_get(self.alien).map(|t| t.position.x) else {
            return;
        };
        if let Some(velocity) = base.velocities.try_get_mut(self.alien) {
            velocity.0.x = (target - x).signum() * ALIEN_SPEED;
            if (target - x).abs() < 1.0 {
                velocity.0.x = 0.0;
            }
        }
    }

    fn spawn_drops(&mut self, delta_ms: f32, fov: Vec2) {
        self.next_cat_spawn_ms -= delta_ms;
        if self.next_cat_spawn_ms < 0.0 {
            self.next_cat_spawn_ms = CAT_DELAY_MS / 3.0 + self.rng.gen::<f32>() * CAT_DELAY_MS / 2.0;
            let drop_at = self.registry.base.transforms.get(self.alien).position;
            let cat = self.spawn_falling(TextureId::Cat, drop_at + Vec2::new(0.0, 60.0), CAT_SIZE);
            self.registry.cats.emplace(cat);
        }

        self.next_sushi_spawn_ms -= delta_ms;
        if self.next_sushi_spawn_ms < 0.0 {
            self.next_sushi_spawn_ms =
                SUSHI_DELAY_MS / 2.0 + self.rng.gen::<f32>() * SUSHI_DELAY_MS / 2.0;
            let x = 50.0 + self.rng.gen::<f32>() * (fov.x - 100.0);
            let sushi = self.spawn_falling(TextureId::Sushi, Vec2::new(x, 50.0), SUSHI_SIZE);
            self.registry.sushi.emplace(sushi);
        }
    }

    /// Land everything that reached the floor. Landed cats start walking,
    /// landed sushi is lost.
    fn land(&mut self, fov: Vec2) {
        let mut lost = Vec::new();
        let falling: Vec<Entity> = self.registry.base.accelerations.entities().to_vec();
        for entity in falling {
            let rising = self
                .registry
                .base
                .velocities
                .try_get(entity)
                .is_some_and(|velocity| velocity.0.y < 0.0);
            let Some(transform) = self.registry.base.transforms.try_get_mut(entity) else {
                continue;
            };
            let floor = fov.y - transform.half_extents().y;
            if rising || transform.position.y < floor {
                if entity == self.player {
                    self.registry.grounded.remove(entity);
                }
                continue;
            }
            if self.registry.sushi.has(entity) {
                lost.push(entity);
                continue;
            }
            transform.position.y = floor;

            let walk = if self.rng.gen_bool(0.5) { -CAT_WALK_SPEED } else { CAT_WALK_SPEED };
            if let Some(velocity) = self.registry.base.velocities.try_get_mut(entity) {
                velocity.0.y = 0.0;
                if self.registry.cats.has(entity) && !self.registry.grounded.has(entity) {
                    velocity.0.x = walk;
                }
            }
            if !self.registry.grounded.has(entity) {
                self.registry.grounded.emplace(entity);
            }
        }

        for entity in self.registry.cats.entities() {
            if let Some(transform) = self.registry.base.transforms.try_get(*entity) {
                if transform.position.x < -CAT_SIZE.x || transform.position.x > fov.x + CAT_SIZE.x {
                    lost.push(*entity);
                }
            }
        }
        for entity in lost {
            self.registry.remove_all_components_of(entity);
        }
    }

    fn keep_player_on_screen(&mut self, fov: Vec2) {
        if let Some(transform) = self.registry.base.transforms.try_get_mut(self.player) {
            let half = transform.half_extents().x;
            transform.position.x = transform.position.x.clamp(half, fov.x - half);
        }
    }
}

impl MiniGameWorld for ShowerWorld {
    const MODE: GameMode = GameMode::Shower;
    const NAME: &'static str = "shower";

    fn base(&self) -> &BaseRegistry {
        &self.registry.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.registry.base
    }

    fn restart(&mut self) {
        self.registry.clear_all_components();
        spawn::create_stage(&mut self.registry.base, TextureId::ShowerBackground);
        let fov = self.registry.base.camera().copied().unwrap_or_default().fov;

        self.player = self.spawn_falling(
            TextureId::Doge,
            Vec2::new(fov.x / 2.0, fov.y - PLAYER_SIZE.y / 2.0),
            PLAYER_SIZE,
        );
        self.registry.players.insert(self.player, Player::new(0));
        self.registry.grounded.emplace(self.player);

        self.alien = spawn::create_sprite(
            &mut self.registry.base,
            TextureId::Cat,
            RenderLayer::Foreground,
            Vec2::new(fov.x / 2.0, 60.0),
            Vec2::new(120.0, 80.0),
        );
        self.registry.base.velocities.emplace(self.alien);
        self.registry
            .base
            .colors
            .insert(self.alien, Color(Vec3::new(0.4, 1.0, 0.4)));
        self.registry.aliens.emplace(self.alien);

        self.points = 0;
        self.next_cat_spawn_ms = CAT_DELAY_MS / 2.0;
        self.next_sushi_spawn_ms = 0.0;
    }

    fn step(&mut self, delta_ms: f32) -> Option<i32> {
        let fov = self.registry.base.camera().copied().unwrap_or_default().fov;

        self.chase_player();
        self.spawn_drops(delta_ms, fov);
        self.land(fov);
        self.keep_player_on_screen(fov);

        death::tick(&mut self.registry.base, delta_ms).then_some(self.points)
    }

    fn handle_collisions(&mut self) {
        for (entity, other) in physics::drain_collisions(&mut self.registry.base) {
            if entity != self.player || !self.is_alive() {
                continue;
            }
            if self.registry.cats.has(other) {
                death::start(&mut self.registry.base, entity);
            } else if self.registry.sushi.has(other) {
                self.points += 1;
                self.registry.remove_all_components_of(other);
            }
        }
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) {
        if !self.is_alive() {
            return;
        }
        let grounded = self.registry.grounded.has(self.player);
        let Some(velocity) = self.registry.base.velocities.try_get_mut(self.player) else {
            return;
        };
        let speed = if action.is_down() { PLAYER_SPEED } else { 0.0 };
        match key {
            Key::Space if action == KeyAction::Press && grounded => {
                velocity.0.y = -JUMP_SPEED;
                self.registry.grounded.remove(self.player);
            }
            Key::Left => velocity.0.x = -speed,
            Key::Right => velocity.0.x = speed,
            _ => {}
        }
    }

    fn queue_hud(&self, renderer: &mut dyn Renderer) {
        text::queue_lines(
            renderer,
            &[format!("Sushi: {}", self.points)],
            Vec2::new(0.02, 0.95),
            1.0,
            Vec3::ONE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> ShowerWorld {
        let mut world = ShowerWorld::new(doge_core::math::game_rng(Some(3)));
        world.restart();
        world
    }

    fn drop_on_player(world: &mut ShowerWorld, texture: TextureId) -> Entity {
        let position = world.registry.base.transforms.get(world.player).position;
        world.spawn_falling(texture, position, SUSHI_SIZE)
    }

    #[test]
    fn test_catching_sushi_scores() {
        let mut world = world();
        let sushi = drop_on_player(&mut world, TextureId::Sushi);
        world.registry.sushi.emplace(sushi);

        physics::detect_collisions(&mut world.registry.base);
        world.handle_collisions();

        assert_eq!(world.points, 1);
        assert!(!world.registry.sushi.has(sushi));
        assert!(world.is_alive());
    }

    #[test]
    fn test_cat_scratch_starts_death_timer() {
        let mut world = world();
        let cat = drop_on_player(&mut world, TextureId::Cat);
        world.registry.cats.emplace(cat);

        physics::detect_collisions(&mut world.registry.base);
        world.handle_collisions();

        assert!(!world.is_alive());
        assert_eq!(world.step(1001.0), Some(0));
    }

    #[test]
    fn test_jump_needs_ground() {
        let mut world = world();
        let mods = Modifiers::default();

        world.on_key(Key::Space, KeyAction::Press, mods);
        assert_eq!(world.registry.base.velocities.get(world.player).0.y, -JUMP_SPEED);
        assert!(!world.registry.grounded.has(world.player));

        world.registry.base.velocities.get_mut(world.player).0.y = 0.0;
        world.on_key(Key::Space, KeyAction::Press, mods);
        assert_eq!(world.registry.base.velocities.get(world.player).0.y, 0.0);
    }

    #[test]
    fn test_player_lands_on_floor() {
        let mut world = world();
        let fov = world.registry.base.camera().unwrap().fov;
        world.registry.grounded.remove(world.player);
        world.registry.base.transforms.get_mut(world.player).position.y = fov.y + 10.0;

        world.land(fov);

        assert!(world.registry.grounded.has(world.player));
        assert_eq!(
            world.registry.base.transforms.get(world.player).position.y,
            fov.y - PLAYER_SIZE.y / 2.0
        );
    }
}
