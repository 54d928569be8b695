//! Sprite sheet playback.

use doge_core::ecs::BaseRegistry;

pub fn advance(registry: &mut BaseRegistry, delta_ms: f32) {
    for animation in registry.sprite_animations.components_mut() {
        animation.advance(delta_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_core::components::SpriteAnimation;
    use doge_core::ecs::Entity;

    #[test]
    fn test_every_sprite_advances() {
        let mut registry = BaseRegistry::default();
        let a = Entity::new();
        let b = Entity::new();
        registry.sprite_animations.insert(a, SpriteAnimation::new(1, 4, 50.0));
        registry.sprite_animations.insert(b, SpriteAnimation::new(1, 2, 200.0));

        advance(&mut registry, 100.0);

        assert_eq!(registry.sprite_animations.get(a).frame, 2);
        assert_eq!(registry.sprite_animations.get(b).frame, 0);
    }
}
