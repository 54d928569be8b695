//! Concrete scenes.

pub mod board;
pub mod constrained_chaos;
pub mod daycare;
pub mod mac;
pub mod minigame;
pub mod planit;
pub mod shower;
pub mod switch_players;

pub use board::BoardScene;
pub use minigame::{MiniGameScene, MiniGameWorld};
pub use switch_players::SwitchPlayersScene;
