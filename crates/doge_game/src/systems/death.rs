//! Death timers
//!
//! A world starts a [`DeathTimer`] on the player when it gets hit. The screen
//! fades out while the timer runs; the world ends the scene once it expires.

use doge_core::components::DeathTimer;
use doge_core::ecs::{BaseRegistry, Entity};

/// Start the countdown for `entity` unless one is already running.
pub fn start(registry: &mut BaseRegistry, entity: Entity) {
    if !registry.death_timers.has(entity) {
        registry.death_timers.emplace(entity);
        if let Some(velocity) = registry.velocities.try_get_mut(entity) {
            velocity.0 = Default::default();
        }
    }
}

/// Count every timer down by `delta_ms`. Returns `true` once any of them
/// dropped below zero.
pub fn tick(registry: &mut BaseRegistry, delta_ms: f32) -> bool {
    let mut expired = false;
    let mut least_left: Option<f32> = None;
    for timer in registry.death_timers.components_mut() {
        timer.counter_ms -= delta_ms;
        expired |= timer.counter_ms < 0.0;
        least_left = Some(least_left.map_or(timer.counter_ms, |l| l.min(timer.counter_ms)));
    }

    if let (Some(left), Some(screen)) = (least_left, registry.screen_state_mut()) {
        let full = DeathTimer::default().counter_ms;
        screen.darken_screen_factor = (1.0 - left / full).clamp(0.0, 1.0);
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_core::components::Velocity;
    use doge_core::math::Vec2;

    #[test]
    fn test_timer_expires_after_its_duration() {
        let mut registry = BaseRegistry::default();
        registry.screen_states.emplace(Entity::new());
        let player = Entity::new();
        registry.velocities.insert(player, Velocity(Vec2::X));

        start(&mut registry, player);
        start(&mut registry, player);
        assert_eq!(registry.death_timers.len(), 1);
        assert_eq!(registry.velocities.get(player).0, Vec2::ZERO);

        assert!(!tick(&mut registry, 600.0));
        assert!(registry.screen_state().unwrap().darken_screen_factor > 0.5);
        assert!(!tick(&mut registry, 400.0));
        assert!(tick(&mut registry, 1.0));
    }
}
