//! Dense component storage
//!
//! Components live in a contiguous `Vec<T>` with a parallel `Vec<Entity>`
//! (slot `i` of one belongs to slot `i` of the other). A hash index maps an
//! entity to its slot so lookups stay O(1). Removal swaps the victim with the
//! last slot and pops, so arrays never have holes; iteration order is
//! therefore insertion order perturbed by removals.

use std::any::type_name;
use std::collections::HashMap;

use super::Entity;

/// Storage for one component type inside a registry.
#[derive(Debug, Clone)]
pub struct ComponentContainer<T> {
    index: HashMap<Entity, usize>,
    entities: Vec<Entity>,
    components: Vec<T>,
    /// Set once `emplace_with_duplicates` stored a second entry for an entity.
    has_duplicates: bool,
}

impl<T> ComponentContainer<T> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entities: Vec::new(),
            components: Vec::new(),
            has_duplicates: false,
        }
    }

    /// Attach `component` to `entity`.
    ///
    /// # Panics
    /// If `entity` already has a component in this container.
    pub fn insert(&mut self, entity: Entity, component: T) -> &mut T {
        assert!(
            !self.has(entity),
            "entity {entity} already has a `{}` component",
            type_name::<T>()
        );
        self.push(entity, component)
    }

    /// Attach a default-constructed component to `entity`.
    ///
    /// # Panics
    /// If `entity` already has a component in this container.
    pub fn emplace(&mut self, entity: Entity) -> &mut T
    where
        T: Default,
    {
        self.insert(entity, T::default())
    }

    /// Attach `component` without the uniqueness check.
    ///
    /// Only meant for event-like components (collisions) that are drained
    /// with [`clear`](Self::clear) every tick. Lookups through `get` return the
    /// most recently stored entry.
    pub fn emplace_with_duplicates(&mut self, entity: Entity, component: T) -> &mut T {
        if self.has(entity) {
            self.has_duplicates = true;
        }
        self.push(entity, component)
    }

    fn push(&mut self, entity: Entity, component: T) -> &mut T {
        let slot = self.components.len();
        self.index.insert(entity, slot);
        self.entities.push(entity);
        self.components.push(component);
        &mut self.components[slot]
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// # Panics
    /// If `entity` has no component here. Check with [`has`](Self::has) first.
    pub fn get(&self, entity: Entity) -> &T {
        match self.index.get(&entity) {
            Some(&slot) => &self.components[slot],
            None => panic!("entity {entity} has no `{}` component", type_name::<T>()),
        }
    }

    /// # Panics
    /// If `entity` has no component here. Check with [`has`](Self::has) first.
    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        match self.index.get(&entity) {
            Some(&slot) => &mut self.components[slot],
            None => panic!("entity {entity} has no `{}` component", type_name::<T>()),
        }
    }

    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        self.index.get(&entity).map(|&slot| &self.components[slot])
    }

    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.index.get(&entity).map(|&slot| &mut self.components[slot])
    }

    /// Detach `entity`'s component. Returns `false` (and does nothing) when
    /// the entity is not present.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.index.remove(&entity) else {
            return false;
        };

        if self.has_duplicates {
            self.remove_every_entry_of(entity);
            return true;
        }

        self.entities.swap_remove(slot);
        self.components.swap_remove(slot);
        if let Some(&moved) = self.entities.get(slot) {
            self.index.insert(moved, slot);
        }
        true
    }

    // Slow path for event containers: the index only tracks one slot per
    // entity, so scan for the rest and rebuild it.
    fn remove_every_entry_of(&mut self, entity: Entity) {
        for slot in (0..self.entities.len()).rev() {
            if self.entities[slot] == entity {
                self.entities.swap_remove(slot);
                self.components.swap_remove(slot);
            }
        }

        self.index.clear();
        for (slot, &e) in self.entities.iter().enumerate() {
            self.index.insert(e, slot);
        }
        self.has_duplicates = self.index.len() != self.entities.len();
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.entities.clear();
        self.components.clear();
        self.has_duplicates = false;
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entities in storage order; slot `i` owns `components()[i]`.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn components(&self) -> &[T] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }
}

impl<T> Default for ComponentContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Health(i32);

    fn spawn(n: usize) -> Vec<Entity> {
        (0..n).map(|_| Entity::new()).collect()
    }

    fn assert_consistent<T>(container: &ComponentContainer<T>) {
        assert_eq!(container.entities().len(), container.components().len());
        for (slot, &e) in container.entities().iter().enumerate() {
            assert_eq!(container.index[&e], slot);
        }
    }

    #[test]
    fn test_swap_remove_order() {
        let e = spawn(5);
        let mut healths = ComponentContainer::new();
        for (i, &entity) in e.iter().enumerate() {
            healths.insert(entity, Health(i as i32));
        }

        assert!(healths.remove(e[1]));

        assert_eq!(healths.entities(), &[e[0], e[4], e[2], e[3]]);
        assert_eq!(healths.get(e[4]), &Health(4));
        assert!(!healths.has(e[1]));
        assert_consistent(&healths);
    }

    #[test]
    fn test_duplicate_insert_panics_without_mutation() {
        let e = Entity::new();
        let mut healths = ComponentContainer::new();
        healths.insert(e, Health(7));

        let result = catch_unwind(AssertUnwindSafe(|| {
            healths.insert(e, Health(99));
        }));
        assert!(result.is_err());

        let result = catch_unwind(AssertUnwindSafe(|| {
            healths.emplace(e);
        }));
        assert!(result.is_err());

        assert_eq!(healths.len(), 1);
        assert_eq!(healths.get(e), &Health(7));
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn test_get_missing_panics() {
        let healths: ComponentContainer<Health> = ComponentContainer::new();
        healths.get(Entity::new());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let e = spawn(2);
        let mut healths: ComponentContainer<Health> = ComponentContainer::new();
        healths.emplace(e[0]);

        assert!(!healths.remove(e[1]));
        assert!(healths.remove(e[0]));
        assert!(!healths.remove(e[0]));
        assert!(healths.is_empty());
    }

    #[test]
    fn test_membership_after_mixed_operations() {
        let e = spawn(8);
        let mut healths = ComponentContainer::new();
        for (i, &entity) in e.iter().enumerate() {
            healths.insert(entity, Health(i as i32 * 10));
        }

        for &victim in &[e[0], e[7], e[3], e[3], e[5]] {
            healths.remove(victim);
            assert_consistent(&healths);
        }
        healths.insert(e[3], Health(-1));

        let expected = [(1, 10), (2, 20), (3, -1), (4, 40), (6, 60)];
        assert_eq!(healths.len(), expected.len());
        for (i, value) in expected {
            assert_eq!(healths.get(e[i]), &Health(value));
        }
        for i in [0, 5, 7] {
            assert!(!healths.has(e[i]));
        }
        assert_consistent(&healths);
    }

    #[test]
    fn test_duplicates_mode() {
        let e = spawn(2);
        let mut hits = ComponentContainer::new();
        hits.emplace_with_duplicates(e[0], Health(1));
        hits.emplace_with_duplicates(e[0], Health(2));
        hits.emplace_with_duplicates(e[1], Health(3));

        assert_eq!(hits.len(), 3);
        assert!(hits.has(e[0]));
        assert_eq!(hits.get(e[0]), &Health(2));

        hits.clear();
        assert_eq!(hits.len(), 0);
        assert!(!hits.has(e[0]));
        assert!(!hits.has(e[1]));
    }

    #[test]
    fn test_remove_drops_every_duplicate() {
        let e = spawn(3);
        let mut hits = ComponentContainer::new();
        hits.emplace_with_duplicates(e[0], Health(1));
        hits.emplace_with_duplicates(e[1], Health(2));
        hits.emplace_with_duplicates(e[0], Health(3));
        hits.emplace_with_duplicates(e[2], Health(4));

        hits.remove(e[0]);

        assert!(!hits.has(e[0]));
        assert!(hits.entities().iter().all(|&x| x != e[0]));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.get(e[2]), &Health(4));
        assert_consistent(&hits);
    }

    #[test]
    fn test_iter_pairs_follow_storage_order() {
        let e = spawn(3);
        let mut healths = ComponentContainer::new();
        for (i, &entity) in e.iter().enumerate() {
            healths.insert(entity, Health(i as i32));
        }
        for (_, health) in healths.iter_mut() {
            health.0 += 100;
        }

        let pairs: Vec<_> = healths.iter().map(|(e, h)| (e, h.0)).collect();
        assert_eq!(pairs, vec![(e[0], 100), (e[1], 101), (e[2], 102)]);
    }
}
