//! Type-erased container access
//!
//! Registries hold containers of many component types. Whole-registry
//! operations (wipe everything, delete one entity everywhere) only need the
//! four operations below, so they go through `dyn ContainerInterface`.
//! Typed access (`get`, `insert`, `emplace`) stays on [`ComponentContainer`].

use super::{ComponentContainer, Entity};

#[allow(clippy::len_without_is_empty)]
pub trait ContainerInterface {
    fn clear(&mut self);
    fn remove(&mut self, entity: Entity);
    fn has(&self, entity: Entity) -> bool;
    fn len(&self) -> usize;
}

impl<T> ContainerInterface for ComponentContainer<T> {
    fn clear(&mut self) {
        ComponentContainer::clear(self);
    }

    fn remove(&mut self, entity: Entity) {
        ComponentContainer::remove(self, entity);
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentContainer::has(self, entity)
    }

    fn len(&self) -> usize {
        ComponentContainer::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heterogeneous_broadcast() {
        let e = Entity::new();
        let mut numbers: ComponentContainer<u32> = ComponentContainer::new();
        let mut names: ComponentContainer<String> = ComponentContainer::new();
        numbers.insert(e, 3);
        names.insert(e, "doge".to_string());

        let erased: [&mut dyn ContainerInterface; 2] = [&mut numbers, &mut names];
        for container in erased {
            assert!(container.has(e));
            container.remove(e);
            assert_eq!(container.len(), 0);
        }
    }
}
