//! Doge-y daycare: keep the puppies fed, watered and entertained.
//!
//! Each puppy has three needs in `[0, 1]` that drain over time and fill up
//! while the puppy sits close to a matching bowl or a chew toy. Bowls run dry
//! and are refilled by pressing `F` over them. Puppies wander off on their
//! own; holding `F` over one drags it with the mouse. When the clock runs out
//! the average happiness is converted to points.

use doge_core::components::{Color, EffectId, RenderLayer, RenderRequest, TextureId, Transform};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{GameRng, Rng, Vec2, Vec3};
use doge_render::Renderer;
use doge_services::{Key, KeyAction, Modifiers};
use tracing::debug;

use crate::scenes::minigame::MiniGameWorld;
use crate::systems::{physics, spawn, text};
use crate::GameMode;

const NUM_PUPPIES: usize = 5;
const NUM_FOOD_BOWLS: usize = 2;
const NUM_WATER_BOWLS: usize = 2;
const NUM_CHEW_TOYS: usize = 2;

const GAME_DURATION_MS: f32 = 45_000.0;
/// Time for a full need to drain completely.
const DEPLETION_MS: f32 = 30_000.0;
/// Time for an empty need to fill up next to its source.
const SATURATION_MS: f32 = 5_000.0;
/// Time for a full bowl to run dry while a puppy uses it.
const BOWL_DEPLETION_MS: f32 = 10_000.0;

/// Wander speed, units per ms.
const WANDER_SPEED: f32 = 0.1;
/// Chance per tick that an idle puppy picks a new spot.
const WANDER_PROBABILITY: f64 = 0.001;
const ARRIVAL_DISTANCE: f32 = 5.0;

const PUPPY_SIZE: f32 = 30.0;
const BOWL_SIZE: f32 = 60.0;
const MAX_POINTS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Puppy {
    pub eating: f32,
    pub drinking: f32,
    pub playing: f32,
}

impl Puppy {
    pub fn happiness(&self) -> f32 {
        (self.eating + self.drinking + self.playing) / 3.0
    }

    fn need_mut(&mut self, need: Need) -> &mut f32 {
        match need {
            Need::Eating => &mut self.eating,
            Need::Drinking => &mut self.drinking,
            Need::Playing => &mut self.playing,
        }
    }

    fn need(&self, need: Need) -> f32 {
        match need {
            Need::Eating => self.eating,
            Need::Drinking => self.drinking,
            Need::Playing => self.playing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Need {
    Eating,
    Drinking,
    Playing,
}

impl Need {
    const ALL: [Need; 3] = [Need::Eating, Need::Drinking, Need::Playing];

    fn color(self) -> Vec3 {
        match self {
            Need::Eating => Vec3::new(1.0, 0.6, 0.0),
            Need::Drinking => Vec3::new(0.0, 0.5, 1.0),
            Need::Playing => Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bowl {
    pub need: Need,
    pub amount: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChewToy;

/// Bar above a puppy showing one of its needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    pub puppy: Entity,
    pub need: Need,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderTarget(pub Vec2);

/// Follows the mouse while `F` is held.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dragged;

doge_core::define_registry! {
    pub struct DaycareRegistry: BaseRegistry {
        puppies: Puppy,
        bowls: Bowl,
        chew_toys: ChewToy,
        progress_bars: ProgressBar,
        wander_targets: WanderTarget,
        dragged: Dragged,
    }
}

pub struct DaycareWorld {
    registry: DaycareRegistry,
    rng: GameRng,
    mouse: Vec2,
    game_time_ms: f32,
}

impl DaycareWorld {
    pub fn new(rng: GameRng) -> Self {
        Self {
            registry: DaycareRegistry::default(),
            rng,
            mouse: Vec2::ZERO,
            game_time_ms: 0.0,
        }
    }

    pub fn registry(&self) -> &DaycareRegistry {
        &self.registry
    }

    pub fn average_happiness(&self) -> f32 {
        let puppies = self.registry.puppies.components();
        if puppies.is_empty() {
            return 0.0;
        }
        puppies.iter().map(Puppy::happiness).sum::<f32>() / puppies.len() as f32
    }

    fn points(&self) -> i32 {
        (self.average_happiness() * MAX_POINTS).round() as i32
    }

    fn fov(&self) -> Vec2 {
        self.registry.base.camera().copied().unwrap_or_default().fov
    }

    fn random_position(&mut self, margin: f32) -> Vec2 {
        let fov = self.fov();
        Vec2::new(
            self.rng.gen_range(margin..fov.x - margin),
            self.rng.gen_range(margin..fov.y - margin),
        )
    }

    fn spawn_puppy(&mut self, position: Vec2) -> Entity {
        let base = &mut self.registry.base;
        let puppy = spawn::create_body(base, TextureId::Puppy, position, Vec2::splat(PUPPY_SIZE), Vec2::ZERO);
        self.registry.puppies.emplace(puppy);

        for need in Need::ALL {
            let bar = Entity::new();
            base.transforms.insert(bar, Transform::new(position, Vec2::new(0.0, PUPPY_SIZE / 6.0)));
            base.render_requests.insert(
                bar,
                RenderRequest {
                    effect: EffectId::Colored,
                    ..RenderRequest::sprite(TextureId::Puppy, RenderLayer::Foreground)
                },
            );
            base.colors.insert(bar, Color(need.color()));
            self.registry.progress_bars.insert(bar, ProgressBar { puppy, need });
        }
        puppy
    }

    fn spawn_bowl(&mut self, texture: TextureId, position: Vec2) -> Entity {
        spawn::create_body(
            &mut self.registry.base,
            texture,
            position,
            Vec2::splat(BOWL_SIZE),
            Vec2::ZERO,
        )
    }

    /// Entity of `candidates` whose box contains `point`, nearest first.
    fn under_point(&self, candidates: &[Entity], point: Vec2) -> Option<Entity> {
        candidates
            .iter()
            .filter_map(|&entity| {
                let transform = self.registry.base.transforms.try_get(entity)?;
                let offset = (point - transform.position).abs();
                let half = transform.half_extents();
                (offset.x <= half.x && offset.y <= half.y).then_some((entity, offset.length()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity)
    }

    fn wander(&mut self) {
        let puppies: Vec<Entity> = self.registry.puppies.entities().to_vec();
        for puppy in puppies {
            if self.registry.dragged.has(puppy) {
                continue;
            }
            let Some(position) = self.registry.base.transforms.try_get(puppy).map(|t| t.position)
            else {
                continue;
            };

            if let Some(target) = self.registry.wander_targets.try_get(puppy).copied() {
                if position.distance(target.0) < ARRIVAL_DISTANCE {
                    self.registry.wander_targets.remove(puppy);
                    if let Some(velocity) = self.registry.base.velocities.try_get_mut(puppy) {
                        velocity.0 = Vec2::ZERO;
                    }
                }
                continue;
            }

            if self.rng.gen_bool(WANDER_PROBABILITY) {
                let target = self.random_position(PUPPY_SIZE);
                self.registry.wander_targets.insert(puppy, WanderTarget(target));
                if let Some(velocity) = self.registry.base.velocities.try_get_mut(puppy) {
                    velocity.0 = (target - position).normalize_or_zero() * WANDER_SPEED;
                }
            }
        }
    }

    fn follow_mouse(&mut self) {
        for &puppy in self.registry.dragged.entities() {
            if let Some(transform) = self.registry.base.transforms.try_get_mut(puppy) {
                transform.position = self.mouse;
            }
        }
    }

    fn update_needs(&mut self, delta_ms: f32) {
        let depletion = delta_ms / DEPLETION_MS;
        let saturation = delta_ms / SATURATION_MS;
        let DaycareRegistry {
            base,
            puppies,
            bowls,
            chew_toys,
            ..
        } = &mut self.registry;

        for (puppy, needs) in puppies.iter_mut() {
            for need in Need::ALL {
                let value = needs.need_mut(need);
                *value = (*value - depletion).max(0.0);
            }
            let Some(position) = base.transforms.try_get(puppy).map(|t| t.position) else {
                continue;
            };
            let near = |source: Entity| {
                base.transforms.try_get(source).is_some_and(|t| {
                    let offset = (position - t.position).abs();
                    offset.x <= t.scale.x.abs() * 2.0 && offset.y <= t.scale.y.abs() * 2.0
                })
            };

            for need in [Need::Eating, Need::Drinking] {
                let bowl = bowls
                    .iter_mut()
                    .find(|(entity, bowl)| bowl.need == need && bowl.amount > 0.0 && near(*entity));
                if let Some((_, bowl)) = bowl {
                    let value = needs.need_mut(need);
                    *value = (*value + saturation).min(1.0);
                    bowl.amount = (bowl.amount - delta_ms / BOWL_DEPLETION_MS).max(0.0);
                }
            }
            if chew_toys.entities().iter().any(|&toy| near(toy)) {
                needs.playing = (needs.playing + saturation).min(1.0);
            }
        }
    }

    fn update_bars(&mut self) {
        let DaycareRegistry {
            base,
            puppies,
            progress_bars,
            ..
        } = &mut self.registry;
        for (bar, info) in progress_bars.iter() {
            let (Some(puppy), Some(needs)) =
                (base.transforms.try_get(info.puppy).copied(), puppies.try_get(info.puppy))
            else {
                continue;
            };
            let Some(transform) = base.transforms.try_get_mut(bar) else {
                continue;
            };
            let row = match info.need {
                Need::Eating => 1.0,
                Need::Drinking => 2.0,
                Need::Playing => 3.0,
            };
            transform.position =
                puppy.position - Vec2::new(0.0, puppy.half_extents().y + row * transform.scale.y);
            transform.scale.x = puppy.scale.x.abs() * 1.5 * needs.need(info.need);
        }
    }

    fn shade_bowls(&mut self) {
        let DaycareRegistry { base, bowls, .. } = &mut self.registry;
        for (entity, bowl) in bowls.iter() {
            if let Some(color) = base.colors.try_get_mut(entity) {
                color.0 = bowl.need.color() * (0.4 + 0.6 * bowl.amount);
            }
        }
    }

    fn grab(&mut self) {
        let puppies = self.registry.puppies.entities().to_vec();
        if let Some(puppy) = self.under_point(&puppies, self.mouse) {
            if !self.registry.dragged.has(puppy) {
                self.registry.dragged.emplace(puppy);
            }
            self.registry.wander_targets.remove(puppy);
            if let Some(velocity) = self.registry.base.velocities.try_get_mut(puppy) {
                velocity.0 = Vec2::ZERO;
            }
            return;
        }

        let bowls = self.registry.bowls.entities().to_vec();
        if let Some(entity) = self.under_point(&bowls, self.mouse) {
            let bowl = self.registry.bowls.get_mut(entity);
            if bowl.amount <= 0.0 {
                debug!(?bowl.need, "bowl refilled");
                bowl.amount = 1.0;
            }
        }
    }
}

impl MiniGameWorld for DaycareWorld {
    const MODE: GameMode = GameMode::Daycare;
    const NAME: &'static str = "daycare";

    fn base(&self) -> &BaseRegistry {
        &self.registry.base
    }

    fn base_mut(&mut self) -> &mut BaseRegistry {
        &mut self.registry.base
    }

    fn restart(&mut self) {
        self.registry.clear_all_components();
        spawn::create_stage(&mut self.registry.base, TextureId::DaycareBackground);

        for _ in 0..NUM_PUPPIES {
            let position = self.random_position(PUPPY_SIZE);
            self.spawn_puppy(position);
        }
        for (count, need) in [(NUM_FOOD_BOWLS, Need::Eating), (NUM_WATER_BOWLS, Need::Drinking)] {
            for _ in 0..count {
                let position = self.random_position(BOWL_SIZE);
                let bowl = self.spawn_bowl(TextureId::Bowl, position);
                self.registry.base.colors.insert(bowl, Color(need.color()));
                self.registry.bowls.insert(bowl, Bowl { need, amount: 1.0 });
            }
        }
        for _ in 0..NUM_CHEW_TOYS {
            let position = self.random_position(BOWL_SIZE);
            let toy = self.spawn_bowl(TextureId::Target, position);
            self.registry.chew_toys.emplace(toy);
        }

        self.game_time_ms = 0.0;
    }

    fn step(&mut self, delta_ms: f32) -> Option<i32> {
        self.wander();
        self.follow_mouse();
        self.update_needs(delta_ms);
        self.update_bars();
        self.shade_bowls();

        self.game_time_ms += delta_ms;
        (self.game_time_ms > GAME_DURATION_MS).then(|| self.points())
    }

    fn handle_collisions(&mut self) {
        // Needs are driven by distance, so overlaps carry no rule here.
        physics::drain_collisions(&mut self.registry.base);
    }

    fn on_key(&mut self, key: Key, action: KeyAction, _mods: Modifiers) {
        if key != Key::Letter('F') {
            return;
        }
        match action {
            KeyAction::Press => self.grab(),
            KeyAction::Release => self.registry.dragged.clear(),
            KeyAction::Repeat => {}
        }
    }

    fn on_mouse_move(&mut self, position: Vec2) {
        self.mouse = position;
    }

    fn queue_hud(&self, renderer: &mut dyn Renderer) {
        let left = ((GAME_DURATION_MS - self.game_time_ms) / 1000.0).max(0.0);
        let lines = [
            format!("Time left: {left:.0}"),
            format!("Happiness: {:.0}%", self.average_happiness() * 100.0),
        ];
        text::queue_lines(renderer, &lines, Vec2::new(0.02, 0.95), 1.0, Vec3::ONE);
    }
}
