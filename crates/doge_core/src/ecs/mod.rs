//! Entity/component storage.
//!
//! Deliberately small: entities are bare ids, each component type gets a
//! dense [`ComponentContainer`], and a scene groups its containers in a
//! registry declared with [`define_registry!`](crate::define_registry).
//! Systems are plain functions over a registry; there is no scheduler and no
//! archetype machinery. Everything here is single-threaded.

mod container;
mod entity;
mod erased;
mod registry;

pub use container::ComponentContainer;
pub use entity::Entity;
pub use erased::ContainerInterface;
pub use registry::{BaseRegistry, Registry};
