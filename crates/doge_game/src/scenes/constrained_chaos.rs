//! Constrained chaos: cross the arena past a spinning chain weapon.
//!
//! The weapon is a set of arms hanging off a hub in the middle of the
//! arena. Each arm is a chain of balls joined by damped springs; the first
//! ball of an arm is pulled towards a point circling the hub, the others
//! towards the ball before them. The hub changes direction at random.

use doge_core::components::{Color, Player, RenderLayer, TextureId};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{GameRng, Rng, Vec2, Vec3};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::trace;

use crate::scenes::minigame::MiniGameWorld;
use crate::systems::{death, physics, spawn, text};
use crate::GameMode;

const ARMS: usize = 3;
const BALLS_PER_ARM: usize = 3;
const BALL_SIZE: f32 = 40.0;
const HUB_RADIUS: f32 = 60.0;
const REST_LENGTH: f32 = 70.0;
/// Spring stiffness, per ms².
const STIFFNESS: f32 = 0.0004;
/// Velocity damping, per ms.
const DAMPING: f32 = 0.01;
/// Longest spring integration step; larger frames are subdivided.
const MAX_SUBSTEP_MS: f32 = 4.0;
/// Hub angular speed, radians per ms.
const SPIN_SPEED: f32 = 0.0025;
const SPIN_CHANGE_MS: f32 = 3000.0;
const PLAYER_SPEED: f32 = 0.25;
const PLAYER_SIZE: Vec2 = Vec2::new(60.0, 40.0);
const GOAL_WIDTH: f32 = 40.0;
const GOAL_POINTS: i32 = 3;
const TIME_LIMIT_MS: f32 = 30_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Circles the hub at this angle offset.
    Hub { offset: f32 },
    Ball(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponBall {
    pub anchor: Anchor,
    pub swing: Vec2,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Goal;

doge_core::define_registry! {
    pub struct ChaosRegistry: BaseRegistry {
        players: Player,
        /// Ordered so that every ball comes after its anchor.
        weapon_balls: WeaponBall,
        goals: Goal,
    }
}

pub struct ConstrainedChaosWorld {
    registry: ChaosRegistry,
    rng: GameRng,
    player: Entity,
    hub_angle: f32,
    spin: f32,
    next_spin_change_ms: f32,
    elapsed_ms: f32,
    points: i32,
}

impl ConstrainedChaosWorld {
    pub fn new(rng: GameRng) -> Self {
        Self {
            registry: ChaosRegistry::default(),
            rng,
            player: Entity::new(),
            hub_angle: 0.0,
            spin: SPIN_SPEED,
            next_spin_change_ms: SPIN_CHANGE_MS,
            elapsed_ms: 0.0,
            points: 0,
        }
    }

    pub fn registry(&self) -> &ChaosRegistry {
        &self.registry
    }

    fn is_playing(&self) -> bool {
        self.registry.base.death_timers.is_empty()
    }

    fn hub(&self) -> Vec2 {
        self.registry.base.camera().copied().unwrap_or_default().fov * 0.5
    }

    fn anchor_position(&self, anchor: Anchor) -> Vec2 {
        match anchor {
            Anchor::Hub { offset } => {
                self.hub() + Vec2::from_angle(self.hub_angle + offset) * HUB_RADIUS
            }
            Anchor::Ball(parent) => self
                .registry
                .base
                .transforms
                .try_get(parent)
                .map(|t| t.position)
                .unwrap_or_else(|| self.hub()),
        }
    }

    fn spawn_weapon(&mut self) {
        let hub = self.hub();
        for arm in 0..ARMS {
            let offset = arm as f32 * std::f32::consts::TAU / ARMS as f32;
            let direction = Vec2::from_angle(offset);
            let mut anchor = Anchor::Hub { offset };
            for link in 0..BALLS_PER_ARM {
                let distance = HUB_RADIUS + REST_LENGTH * (link + 1) as f32;
                let ball = spawn::create_sprite(
                    &mut self.registry.base,
                    TextureId::Weapon,
                    RenderLayer::World,
                    hub + direction * distance,
                    Vec2::splat(BALL_SIZE),
                );
                self.registry.base.colliders.emplace(ball);
                self.registry.weapon_balls.insert(
                    ball,
                    WeaponBall {
                        anchor,
                        swing: Vec2::ZERO,
                    },
                );
                anchor = Anchor::Ball(ball);
            }
        }
    }

    fn integrate_springs(&mut self, delta_ms: f32) {
        let substeps = (delta_ms / MAX_SUBSTEP_MS).ceil().max(1.0);
        let dt = delta_ms / substeps;
        for _ in 0..substeps as usize {
            self.hub_angle += self.spin * dt;
            for i in 0..self.registry.weapon_balls.len() {
                let entity = self.registry.weapon_balls.entities()[i];
                let ball = self.registry.weapon_balls.components()[i];
                let anchor = self.anchor_position(ball.anchor);
                let Some(transform) = self.registry.base.transforms.try_get_mut(entity) else {
                    continue;
                };

                let link = transform.position - anchor;
                let stretch = link.length() - REST_LENGTH;
                let force = -STIFFNESS * stretch * link.normalize_or_zero() - DAMPING * ball.swing;
                let swing = ball.swing + force * dt;
                transform.position += swing * dt;
                self.registry.weapon_balls.components_mut()[i].swing = swing;
            }
        }
    }

    fn keep_player_in_arena(&mut self, fov: Vec2) {
        if let Some(transform) = self.registry.base.transforms.try_get_mut(self.player) {
            let half = transform.half_extents();
            transform.position = transform.position.clamp(half, fov - half);
        }
    }

    fn finish(&mut self, color: Vec3) {
        death::start(&mut self.registry.base, self.player);
        if let Some(c) = self.registry.base.colors.try_get_mut(self.player) {
            c.0 = color;
        }
    }
}

impl MiniGameWorld for ConstrainedChaosWorld {
    const MODE: GameMode = GameMode::ConstrainedChaos;
    const NAME: &'static str = "constrained_chaos";

    fn base(&self) -> &BaseRegistry {
        &self.registry.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.registry.base
    }

    fn restart(&mut self) {
        self.registry.clear_all_components();
        spawn::create_stage(&mut self.registry.base, TextureId::ArenaBackground);
        let fov = self.hub() * 2.0;

        self.player = spawn::create_body(
            &mut self.registry.base,
            TextureId::Doge,
            Vec2::new(fov.x / 8.0, fov.y / 3.0),
            PLAYER_SIZE,
            Vec2::ZERO,
        );
        self.registry.base.colors.emplace(self.player);
        self.registry.players.insert(self.player, Player::new(0));

        let goal = spawn::create_body(
            &mut self.registry.base,
            TextureId::Goal,
            Vec2::new(fov.x - GOAL_WIDTH / 2.0, fov.y / 2.0),
            Vec2::new(GOAL_WIDTH, fov.y),
            Vec2::ZERO,
        );
        self.registry.goals.emplace(goal);

        self.hub_angle = 0.0;
        self.spin = SPIN_SPEED;
        self.next_spin_change_ms = SPIN_CHANGE_MS;
        self.elapsed_ms = 0.0;
        self.points = 0;
        self.spawn_weapon();
    }

    fn step(&mut self, delta_ms: f32) -> Option<i32> {
        self.elapsed_ms += delta_ms;
        self.next_spin_change_ms -= delta_ms;
        if self.next_spin_change_ms < 0.0 {
            self.next_spin_change_ms = SPIN_CHANGE_MS;
            if self.rng.gen_bool(0.5) {
                self.spin = -self.spin;
                trace!(spin = self.spin, "weapon reversed");
            }
        }

        self.integrate_springs(delta_ms);
        let fov = self.hub() * 2.0;
        self.keep_player_in_arena(fov);

        if self.is_playing() && self.elapsed_ms > TIME_LIMIT_MS {
            self.finish(Vec3::new(0.5, 0.5, 0.5));
        }

        death::tick(&mut self.registry.base, delta_ms).then_some(self.points)
    }

    fn handle_collisions(&mut self) {
        for (entity, other) in physics::drain_collisions(&mut self.registry.base) {
            if entity != self.player || !self.is_playing() {
                continue;
            }
            if self.registry.goals.has(other) {
                self.points = GOAL_POINTS;
                self.finish(Vec3::new(0.0, 1.0, 0.0));
            } else if self.registry.weapon_balls.has(other) {
                self.finish(Vec3::new(1.0, 0.0, 0.0));
            }
        }
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) {
        if !self.is_playing() {
            return;
        }
        let speed = if action.is_down() { PLAYER_SPEED } else { 0.0 };
        let Some(velocity) = self.registry.base.velocities.try_get_mut(self.player) else {
            return;
        };
        match key {
            Key::Left => velocity.0.x = -speed,
            Key::Right => velocity.0.x = speed,
            Key::Up => velocity.0.y = -speed,
            Key::Down => velocity.0.y = speed,
            _ => {}
        }
    }

    fn queue_hud(&self, renderer: &mut dyn Renderer) {
        let left = ((TIME_LIMIT_MS - self.elapsed_ms) / 1000.0).max(0.0);
        text::queue_lines(
            renderer,
            &[format!("Time left: {left:.0}")],
            Vec2::new(0.02, 0.95),
            1.0,
            Vec3::ONE,
        );
    }
}
