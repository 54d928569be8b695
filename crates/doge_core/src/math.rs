//! Math utilities
//!
//! Re-exports glam and the random number stack. Scenes own a [`GameRng`] so
//! runs can be replayed from a seed.

pub use glam::*;
pub use rand::{Rng, SeedableRng};

/// Per-scene random generator. ChaCha8 gives the same sequence for the same
/// seed on every platform.
pub type GameRng = rand_chacha::ChaCha8Rng;

/// Generator seeded from `seed`, or from OS entropy when there is none.
pub fn game_rng(seed: Option<u64>) -> GameRng {
    match seed {
        Some(seed) => GameRng::seed_from_u64(seed),
        None => GameRng::from_entropy(),
    }
}
