//! Doge Party Core
//!
//! Contains the simulation building blocks every scene shares:
//! - Entity/component storage (dense containers, registries)
//! - Component catalogue
//! - Frame clock
//! - Math and seeded randomness

pub mod components;
pub mod ecs;
pub mod math;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
