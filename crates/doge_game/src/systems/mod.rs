//! Systems shared by several scenes.
//!
//! Each system is a plain function over the [`BaseRegistry`] part of a scene
//! registry. Scenes call them in a fixed order: world logic, then
//! [`physics::step`], then collision handling, then [`animation::advance`].
//!
//! [`BaseRegistry`]: doge_core::ecs::BaseRegistry

pub mod animation;
pub mod death;
pub mod physics;
pub mod spawn;
pub mod text;
