//! Motion integration and collision detection.
//!
//! Collision events are written to `collisions` in duplicates mode, once per
//! side of each overlapping pair. The owning world must drain them (handle,
//! then `clear`) every tick.

use doge_core::components::{
    Collision, Color, EffectId, GeometryId, RenderLayer, RenderRequest, TextureId, Transform,
    UiPass,
};
use doge_core::ecs::{BaseRegistry, Entity, Registry};
use doge_core::math::{Vec2, Vec3};

use crate::DebugMode;

const HIT_BOX_LINE_WIDTH: f32 = 2.0;

/// Integrate motion, detect overlaps and refresh debug hit boxes.
pub fn step(registry: &mut BaseRegistry, delta_ms: f32, debug: &DebugMode) {
    integrate(registry, delta_ms);
    detect_collisions(registry);

    clear_debug_visuals(registry);
    if debug.is_enabled() {
        draw_hit_boxes(registry);
    }
}

pub fn integrate(registry: &mut BaseRegistry, delta_ms: f32) {
    let BaseRegistry {
        accelerations,
        velocities,
        transforms,
        ..
    } = registry;

    for (entity, acceleration) in accelerations.iter() {
        if let Some(velocity) = velocities.try_get_mut(entity) {
            velocity.0 += acceleration.0 * delta_ms;
        }
    }
    for (entity, velocity) in velocities.iter() {
        if let Some(transform) = transforms.try_get_mut(entity) {
            transform.position += velocity.0 * delta_ms;
        }
    }
}

/// Axis-aligned box test on centers and half extents.
pub fn overlaps(center_a: Vec2, half_a: Vec2, center_b: Vec2, half_b: Vec2) -> bool {
    let distance = (center_a - center_b).abs();
    let reach = half_a + half_b;
    distance.x < reach.x && distance.y < reach.y
}

fn hit_boxes(registry: &BaseRegistry) -> Vec<(Entity, Vec2, Vec2)> {
    registry
        .colliders
        .iter()
        .filter_map(|(entity, collider)| {
            let transform = registry.transforms.try_get(entity)?;
            Some((entity, transform.position, transform.half_extents() * collider.shrink))
        })
        .collect()
}

pub fn detect_collisions(registry: &mut BaseRegistry) {
    let boxes = hit_boxes(registry);
    for (i, &(a, center_a, half_a)) in boxes.iter().enumerate() {
        for &(b, center_b, half_b) in &boxes[i + 1..] {
            if overlaps(center_a, half_a, center_b, half_b) {
                registry.collisions.emplace_with_duplicates(a, Collision { other: b });
                registry.collisions.emplace_with_duplicates(b, Collision { other: a });
            }
        }
    }
}

/// Take this tick's collision events as `(entity, other)` pairs, leaving the
/// event container empty.
pub fn drain_collisions(registry: &mut BaseRegistry) -> Vec<(Entity, Entity)> {
    let events = registry
        .collisions
        .iter()
        .map(|(entity, collision)| (entity, collision.other))
        .collect();
    registry.collisions.clear();
    events
}

/// Delete every entity tagged with a debug component.
pub fn clear_debug_visuals(registry: &mut BaseRegistry) {
    let stale: Vec<Entity> = registry.debug_components.entities().to_vec();
    for entity in stale {
        registry.remove_all_components_of(entity);
    }
}

fn draw_hit_boxes(registry: &mut BaseRegistry) {
    for (_, center, half) in hit_boxes(registry) {
        let edges = [
            (Vec2::new(0.0, -half.y), Vec2::new(half.x * 2.0, HIT_BOX_LINE_WIDTH)),
            (Vec2::new(0.0, half.y), Vec2::new(half.x * 2.0, HIT_BOX_LINE_WIDTH)),
            (Vec2::new(-half.x, 0.0), Vec2::new(HIT_BOX_LINE_WIDTH, half.y * 2.0)),
            (Vec2::new(half.x, 0.0), Vec2::new(HIT_BOX_LINE_WIDTH, half.y * 2.0)),
        ];
        for (offset, scale) in edges {
            let line = Entity::new();
            registry.transforms.insert(line, Transform::new(center + offset, scale));
            registry.render_requests.insert(
                line,
                RenderRequest {
                    texture: TextureId::Target,
                    effect: EffectId::Colored,
                    geometry: GeometryId::DebugLine,
                    layer: RenderLayer::Foreground,
                },
            );
            registry.colors.insert(line, Color(Vec3::new(1.0, 0.0, 0.0)));
            registry.ui_passes.insert(line, UiPass::default());
            registry.debug_components.emplace(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_core::components::{Acceleration, Velocity};

    fn body(registry: &mut BaseRegistry, position: Vec2) -> Entity {
        let e = Entity::new();
        registry.transforms.insert(e, Transform::new(position, Vec2::splat(10.0)));
        registry.colliders.emplace(e);
        e
    }

    #[test]
    fn test_integrate_applies_acceleration_then_velocity() {
        let mut registry = BaseRegistry::default();
        let e = Entity::new();
        registry.transforms.emplace(e);
        registry.velocities.insert(e, Velocity(Vec2::new(1.0, 0.0)));
        registry.accelerations.insert(e, Acceleration(Vec2::new(0.0, 0.5)));

        integrate(&mut registry, 2.0);

        assert_eq!(registry.velocities.get(e).0, Vec2::new(1.0, 1.0));
        assert_eq!(registry.transforms.get(e).position, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_overlapping_pair_records_both_sides() {
        let mut registry = BaseRegistry::default();
        let a = body(&mut registry, Vec2::new(0.0, 0.0));
        let b = body(&mut registry, Vec2::new(8.0, 0.0));
        let far = body(&mut registry, Vec2::new(100.0, 0.0));

        step(&mut registry, 0.0, &DebugMode::new(false));

        assert_eq!(registry.collisions.len(), 2);
        assert_eq!(registry.collisions.get(a).other, b);
        assert_eq!(registry.collisions.get(b).other, a);
        assert!(!registry.collisions.has(far));
    }

    #[test]
    fn test_entity_hit_twice_keeps_both_events() {
        let mut registry = BaseRegistry::default();
        let middle = body(&mut registry, Vec2::ZERO);
        body(&mut registry, Vec2::new(-6.0, 0.0));
        body(&mut registry, Vec2::new(6.0, 0.0));

        detect_collisions(&mut registry);

        let hits_on_middle = registry
            .collisions
            .entities()
            .iter()
            .filter(|&&e| e == middle)
            .count();
        assert_eq!(hits_on_middle, 2);

        let events = drain_collisions(&mut registry);
        assert_eq!(events.len(), 4);
        assert!(registry.collisions.is_empty());
    }

    #[test]
    fn test_debug_boxes_are_rebuilt_each_step() {
        let mut registry = BaseRegistry::default();
        body(&mut registry, Vec2::ZERO);
        let debug = DebugMode::new(true);

        step(&mut registry, 0.0, &debug);
        assert_eq!(registry.debug_components.len(), 4);
        step(&mut registry, 0.0, &debug);
        assert_eq!(registry.debug_components.len(), 4);

        debug.set(false);
        step(&mut registry, 0.0, &debug);
        assert!(registry.debug_components.is_empty());
        assert_eq!(registry.render_requests.len(), 0);
    }
}
