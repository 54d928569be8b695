//! Time to refill: slingshot around the planet into the energy pack.
//!
//! The ship gets a single launch. The pack only counts when the ship comes
//! back at it (moving left), so a straight shot is a crash.

use doge_core::components::{
    Acceleration, Color, EffectId, Player, RenderLayer, RenderRequest, TextureId, Transform,
};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{GameRng, Rng, Vec2, Vec3};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::debug;

use crate::scenes::minigame::MiniGameWorld;
use crate::systems::{death, physics, spawn, text};
use crate::GameMode;

/// Gravitational parameter of the planet, in units³/ms².
const PLANET_GM: f32 = 25.0;
/// Launch velocity per unit of distance between ship and cursor.
const LAUNCH_FACTOR: f32 = 0.0005;
const PLANET_SIZE: f32 = 150.0;
const SHIP_SIZE: Vec2 = Vec2::new(80.0, 40.0);
const TARGET_SIZE: f32 = 60.0;
const TARGET_POINTS: i32 = 1;
/// How far past the screen edge the ship may drift before it is lost.
const OUT_OF_BOUNDS_MARGIN: f32 = 200.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanetTag;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyPack;

doge_core::define_registry! {
    pub struct PlanitRegistry: BaseRegistry {
        players: Player,
        planets: PlanetTag,
        targets: EnergyPack,
    }
}

pub struct PlanitWorld {
    registry: PlanitRegistry,
    rng: GameRng,
    ship: Entity,
    planet: Entity,
    aim_line: Option<Entity>,
    mouse: Vec2,
    launched: bool,
    points: i32,
}

impl PlanitWorld {
    pub fn new(rng: GameRng) -> Self {
        Self {
            registry: PlanitRegistry::default(),
            rng,
            ship: Entity::new(),
            planet: Entity::new(),
            aim_line: None,
            mouse: Vec2::ZERO,
            launched: false,
            points: 0,
        }
    }

    pub fn registry(&self) -> &PlanitRegistry {
        &self.registry
    }

    fn is_alive(&self) -> bool {
        !self.registry.base.death_timers.has(self.ship)
    }

    fn ship_position(&self) -> Vec2 {
        self.registry
            .base
            .transforms
            .try_get(self.ship)
            .map(|t| t.position)
            .unwrap_or_default()
    }

    fn launch(&mut self) {
        let velocity = (self.mouse - self.ship_position()) * LAUNCH_FACTOR;
        debug!(?velocity, "ship launched");
        let base = &mut self.registry.base;
        if let Some(v) = base.velocities.try_get_mut(self.ship) {
            v.0 = velocity;
        }
        base.accelerations.insert(self.ship, Acceleration::default());
        if let Some(line) = self.aim_line.take() {
            self.registry.remove_all_components_of(line);
        }
        self.launched = true;
    }

    fn apply_gravity(&mut self) {
        let center = self
            .registry
            .base
            .transforms
            .try_get(self.planet)
            .map(|t| t.position)
            .unwrap_or_default();
        let position = self.ship_position();
        if let Some(acceleration) = self.registry.base.accelerations.try_get_mut(self.ship) {
            let to_center = center - position;
            let r2 = to_center.length_squared().max(1.0);
            acceleration.0 = to_center.normalize_or_zero() * (PLANET_GM / r2);
        }
        if let Some(velocity) = self.registry.base.velocities.try_get(self.ship).copied() {
            if let Some(transform) = self.registry.base.transforms.try_get_mut(self.ship) {
                transform.rotation = velocity.0.y.atan2(velocity.0.x);
            }
        }
    }

    fn update_aim_line(&mut self) {
        let Some(line) = self.aim_line else {
            return;
        };
        let from = self.ship_position();
        let to_mouse = self.mouse - from;
        if let Some(transform) = self.registry.base.transforms.try_get_mut(line) {
            transform.position = from + to_mouse * 0.5;
            transform.scale = Vec2::new(to_mouse.length(), 4.0);
            transform.rotation = to_mouse.y.atan2(to_mouse.x);
        }
    }

    fn crash(&mut self) {
        death::start(&mut self.registry.base, self.ship);
        if let Some(acceleration) = self.registry.base.accelerations.try_get_mut(self.ship) {
            acceleration.0 = Vec2::ZERO;
        }
        if let Some(color) = self.registry.base.colors.try_get_mut(self.ship) {
            color.0 = Vec3::new(1.0, 0.0, 0.0);
        }
    }
}

impl MiniGameWorld for PlanitWorld {
    const MODE: GameMode = GameMode::Planit;
    const NAME: &'static str = "planit";

    fn base(&self) -> &BaseRegistry {
        &self.registry.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.registry.base
    }

    fn restart(&mut self) {
        self.registry.clear_all_components();
        spawn::create_stage(&mut self.registry.base, TextureId::SpaceBackground);
        let fov = self.registry.base.camera().copied().unwrap_or_default().fov;
        let base = &mut self.registry.base;

        self.planet = spawn::create_body(
            base,
            TextureId::Planet,
            fov * 0.5,
            Vec2::splat(PLANET_SIZE),
            Vec2::ZERO,
        );
        self.registry.planets.emplace(self.planet);

        let target_y = self.rng.gen_range(100.0..200.0);
        let target = spawn::create_body(
            base,
            TextureId::Target,
            Vec2::new(220.0, target_y),
            Vec2::splat(TARGET_SIZE),
            Vec2::ZERO,
        );
        self.registry.targets.emplace(target);

        self.ship = spawn::create_body(
            base,
            TextureId::Doge,
            Vec2::new(100.0, fov.y * 0.5),
            SHIP_SIZE,
            Vec2::ZERO,
        );
        base.colors.emplace(self.ship);
        self.registry.players.insert(self.ship, Player::new(0));

        let line = Entity::new();
        base.transforms.insert(line, Transform::default());
        base.render_requests.insert(
            line,
            RenderRequest {
                effect: EffectId::Colored,
                ..RenderRequest::sprite(TextureId::Target, RenderLayer::Foreground)
            },
        );
        base.colors.insert(line, Color(Vec3::new(1.0, 0.85, 0.0)));
        self.aim_line = Some(line);

        self.mouse = Vec2::new(fov.x * 0.5, fov.y * 0.25);
        self.launched = false;
        self.points = 0;
    }

    fn step(&mut self, delta_ms: f32) -> Option<i32> {
        if self.launched {
            self.apply_gravity();
        } else {
            self.update_aim_line();
        }

        let fov = self.registry.base.camera().copied().unwrap_or_default().fov;
        let position = self.ship_position();
        let bounds = Vec2::splat(OUT_OF_BOUNDS_MARGIN);
        if self.is_alive() && (position.cmplt(-bounds).any() || position.cmpgt(fov + bounds).any())
        {
            debug!("ship drifted off screen");
            self.crash();
        }

        death::tick(&mut self.registry.base, delta_ms).then_some(self.points)
    }

    fn handle_collisions(&mut self) {
        for (entity, other) in physics::drain_collisions(&mut self.registry.base) {
            if entity != self.ship || !self.launched || !self.is_alive() {
                continue;
            }
            if self.registry.planets.has(other) {
                self.crash();
            } else if self.registry.targets.has(other) {
                let returning = self
                    .registry
                    .base
                    .velocities
                    .try_get(entity)
                    .is_some_and(|v| v.0.x <= 0.0);
                if returning {
                    self.points += TARGET_POINTS;
                    death::start(&mut self.registry.base, entity);
                    if let Some(color) = self.registry.base.colors.try_get_mut(entity) {
                        color.0 = Vec3::new(0.0, 1.0, 0.0);
                    }
                } else {
                    self.crash();
                }
            }
        }
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) {
        if key == Key::Space && action == KeyAction::Release && !self.launched && self.is_alive() {
            self.launch();
        }
    }

    fn on_mouse_move(&mut self, position: Vec2) {
        self.mouse = position;
    }

    fn queue_hud(&self, renderer: &mut dyn Renderer) {
        if !self.launched {
            text::queue_lines(
                renderer,
                &["Aim with the mouse, SPACE to launch"],
                Vec2::new(0.02, 0.95),
                1.0,
                Vec3::ONE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PlanitWorld {
        let mut world = PlanitWorld::new(doge_core::math::game_rng(Some(11)));
        world.restart();
        world
    }

    fn target(world: &PlanitWorld) -> Entity {
        world.registry.targets.entities()[0]
    }

    #[test]
    fn test_launch_heads_for_cursor() {
        let mut world = world();
        let start = world.ship_position();
        world.on_mouse_move(start + Vec2::new(200.0, -100.0));
        world.on_key(Key::Space, KeyAction::Release, Modifiers::default());

        assert!(world.launched);
        assert!(world.aim_line.is_none());
        assert_eq!(
            world.registry.base.velocities.get(world.ship).0,
            Vec2::new(200.0, -100.0) * LAUNCH_FACTOR
        );

        world.step(16.0);
        let pull = world.registry.base.accelerations.get(world.ship).0;
        assert!(pull.x > 0.0, "planet is to the right of the ship");
    }

    #[test]
    fn test_returning_to_pack_scores() {
        let mut world = world();
        world.launch();
        let pack = world.registry.base.transforms.get(target(&world)).position;
        world.registry.base.transforms.get_mut(world.ship).position = pack;
        world.registry.base.velocities.get_mut(world.ship).0 = Vec2::new(-0.1, 0.0);

        physics::detect_collisions(&mut world.registry.base);
        world.handle_collisions();

        assert_eq!(world.points, TARGET_POINTS);
        assert_eq!(world.step(1001.0), Some(TARGET_POINTS));
    }

    #[test]
    fn test_straight_shot_into_pack_crashes() {
        let mut world = world();
        world.launch();
        let pack = world.registry.base.transforms.get(target(&world)).position;
        world.registry.base.transforms.get_mut(world.ship).position = pack;
        world.registry.base.velocities.get_mut(world.ship).0 = Vec2::new(0.1, 0.0);

        physics::detect_collisions(&mut world.registry.base);
        world.handle_collisions();

        assert_eq!(world.points, 0);
        assert!(!world.is_alive());
    }

    #[test]
    fn test_drifting_away_is_fatal() {
        let mut world = world();
        world.launch();
        world.registry.base.transforms.get_mut(world.ship).position = Vec2::new(-1000.0, 0.0);

        assert_eq!(world.step(0.0), None);
        assert!(!world.is_alive());
    }
}
