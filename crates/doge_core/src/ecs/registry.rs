//! Registries: per-scene bundles of component containers
//!
//! A registry owns one [`ComponentContainer`] per component role. Registries
//! are declared with [`define_registry!`](crate::define_registry), which
//! generates both the struct and the container walk from a single field list,
//! so a container cannot be left out of (or listed twice in) the broadcast
//! operations.

use tracing::debug;

use super::{ContainerInterface, Entity};
use crate::components::{
    Acceleration, Camera, Collider, Collision, Color, DebugComponent, DeathTimer, MeshRef,
    RenderRequest, ScreenState, SpriteAnimation, Transform, UiElement, UiPass, Velocity,
};

/// Whole-registry operations, available on every declared registry.
pub trait Registry {
    /// Visit every container exactly once, in declaration order (base first).
    fn for_each_container(&self, visit: &mut dyn FnMut(&'static str, &dyn ContainerInterface));

    fn for_each_container_mut(
        &mut self,
        visit: &mut dyn FnMut(&'static str, &mut dyn ContainerInterface),
    );

    fn clear_all_components(&mut self) {
        self.for_each_container_mut(&mut |_: &'static str, container: &mut dyn ContainerInterface| {
            container.clear()
        });
    }

    fn remove_all_components_of(&mut self, entity: Entity) {
        self.for_each_container_mut(&mut |_: &'static str, container: &mut dyn ContainerInterface| {
            container.remove(entity)
        });
    }

    /// `(container, live entries)` for every container.
    fn component_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts = Vec::new();
        self.for_each_container(&mut |name: &'static str, container: &dyn ContainerInterface| {
            counts.push((name, container.len()))
        });
        counts
    }

    /// Names of the containers `entity` has a component in.
    fn components_of(&self, entity: Entity) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.for_each_container(&mut |name: &'static str, container: &dyn ContainerInterface| {
            if container.has(entity) {
                names.push(name);
            }
        });
        names
    }

    fn list_all_components(&self) {
        debug!("registry contents:");
        for (name, count) in self.component_counts() {
            if count > 0 {
                debug!("  {count} components of type {name}");
            }
        }
    }

    fn list_all_components_of(&self, entity: Entity) {
        debug!("components of entity {entity}:");
        for name in self.components_of(entity) {
            debug!("  type {name}");
        }
    }
}

/// Declare a registry struct and its [`Registry`] implementation.
///
/// ```ignore
/// define_registry! {
///     /// Containers for the rock-dodging game.
///     pub struct MacRegistry: BaseRegistry {
///         rocks: Rock,
///         players: Player,
///     }
/// }
/// ```
///
/// With a `: Base` clause the struct embeds the base registry as `base`,
/// and the base containers are walked first.
#[macro_export]
macro_rules! define_registry {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $base:ty)? {
            $( $(#[$field_meta:meta])* $field:ident : $component:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        $vis struct $name {
            $( pub base: $base, )?
            $(
                $(#[$field_meta])*
                pub $field: $crate::ecs::ComponentContainer<$component>,
            )*
        }

        impl $crate::ecs::Registry for $name {
            fn for_each_container(
                &self,
                visit: &mut dyn FnMut(&'static str, &dyn $crate::ecs::ContainerInterface),
            ) {
                $( <$base as $crate::ecs::Registry>::for_each_container(&self.base, visit); )?
                $( visit(stringify!($field), &self.$field); )*
            }

            fn for_each_container_mut(
                &mut self,
                visit: &mut dyn FnMut(&'static str, &mut dyn $crate::ecs::ContainerInterface),
            ) {
                $( <$base as $crate::ecs::Registry>::for_each_container_mut(&mut self.base, visit); )?
                $( visit(stringify!($field), &mut self.$field); )*
            }
        }
    };
}

crate::define_registry! {
    /// Containers every scene has.
    pub struct BaseRegistry {
        render_requests: RenderRequest,
        death_timers: DeathTimer,
        transforms: Transform,
        velocities: Velocity,
        accelerations: Acceleration,
        sprite_animations: SpriteAnimation,
        ui_elements: UiElement,
        ui_passes: UiPass,
        /// Event container, filled in duplicates mode.
        collisions: Collision,
        colliders: Collider,
        meshes: MeshRef,
        screen_states: ScreenState,
        debug_components: DebugComponent,
        colors: Color,
        cameras: Camera,
    }
}

impl BaseRegistry {
    /// The scene's single screen state, if the world created one.
    pub fn screen_state(&self) -> Option<&ScreenState> {
        self.screen_states.components().first()
    }

    pub fn screen_state_mut(&mut self) -> Option<&mut ScreenState> {
        self.screen_states.components_mut().first_mut()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.cameras.components().first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Player;
    use std::collections::HashSet;

    crate::define_registry! {
        struct TestRegistry: BaseRegistry {
            players: Player,
            scores: u32,
        }
    }

    fn populated() -> (TestRegistry, Vec<Entity>) {
        let mut registry = TestRegistry::default();
        let entities: Vec<_> = (0..3).map(|_| Entity::new()).collect();
        for (i, &e) in entities.iter().enumerate() {
            registry.base.transforms.emplace(e);
            registry.players.insert(e, Player::new(i));
            registry.scores.insert(e, i as u32);
        }
        registry.base.collisions.emplace_with_duplicates(entities[0], Collision { other: entities[1] });
        registry.base.collisions.emplace_with_duplicates(entities[0], Collision { other: entities[2] });
        (registry, entities)
    }

    #[test]
    fn test_every_container_listed_once() {
        let registry = TestRegistry::default();
        let names: Vec<_> = registry.component_counts().into_iter().map(|(name, _)| name).collect();
        let unique: HashSet<_> = names.iter().copied().collect();

        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 17);
        assert!(unique.contains("collisions"));
        assert!(unique.contains("scores"));
    }

    #[test]
    fn test_remove_all_components_of() {
        let (mut registry, e) = populated();

        registry.remove_all_components_of(e[0]);

        assert!(registry.components_of(e[0]).is_empty());
        assert!(!registry.base.collisions.has(e[0]));
        assert_eq!(registry.components_of(e[1]), vec!["transforms", "players", "scores"]);
        assert_eq!(registry.players.len(), 2);
    }

    #[test]
    fn test_clear_all_components_is_idempotent() {
        let (mut registry, e) = populated();

        registry.clear_all_components();
        let after_once = registry.component_counts();
        registry.clear_all_components();

        assert_eq!(registry.component_counts(), after_once);
        assert!(after_once.iter().all(|&(_, count)| count == 0));
        assert!(!registry.players.has(e[2]));
    }

    #[test]
    fn test_base_registry_singletons() {
        let mut base = BaseRegistry::default();
        assert!(base.screen_state().is_none());

        base.screen_states.emplace(Entity::new());
        if let Some(screen) = base.screen_state_mut() {
            screen.screen_brightness = 0.5;
        }
        assert_eq!(base.screen_state().map(|s| s.screen_brightness), Some(0.5));
    }
}
