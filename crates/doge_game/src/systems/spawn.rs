//! Entity factories used by every world's restart.

use doge_core::components::{Collider, RenderLayer, RenderRequest, TextureId, Transform, Velocity};
use doge_core::ecs::{BaseRegistry, Entity};
use doge_core::math::Vec2;

/// Camera, screen state and a full-screen background: what every scene
/// starts from.
pub fn create_stage(registry: &mut BaseRegistry, background: TextureId) -> Entity {
    create_camera(registry);
    create_screen(registry);
    create_background(registry, background)
}

pub fn create_camera(registry: &mut BaseRegistry) -> Entity {
    let entity = Entity::new();
    registry.cameras.emplace(entity);
    entity
}

pub fn create_screen(registry: &mut BaseRegistry) -> Entity {
    let entity = Entity::new();
    registry.screen_states.emplace(entity);
    entity
}

pub fn create_sprite(
    registry: &mut BaseRegistry,
    texture: TextureId,
    layer: RenderLayer,
    position: Vec2,
    scale: Vec2,
) -> Entity {
    let entity = Entity::new();
    registry.transforms.insert(entity, Transform::new(position, scale));
    registry
        .render_requests
        .insert(entity, RenderRequest::sprite(texture, layer));
    entity
}

/// Sprite covering the camera's view.
pub fn create_background(registry: &mut BaseRegistry, texture: TextureId) -> Entity {
    let fov = registry.camera().copied().unwrap_or_default().fov;
    create_sprite(registry, texture, RenderLayer::Background, fov * 0.5, fov)
}

/// Moving sprite that takes part in collision detection.
pub fn create_body(
    registry: &mut BaseRegistry,
    texture: TextureId,
    position: Vec2,
    scale: Vec2,
    velocity: Vec2,
) -> Entity {
    let entity = create_sprite(registry, texture, RenderLayer::World, position, scale);
    registry.velocities.insert(entity, Velocity(velocity));
    registry.colliders.insert(entity, Collider::default());
    entity
}
