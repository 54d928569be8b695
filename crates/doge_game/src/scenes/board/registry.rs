use doge_core::components::{Player, PlayerBoardMovement, Space};
use doge_core::ecs::BaseRegistry;

/// Tag on the player whose turn it is. Exactly one player carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivePlayer;

doge_core::define_registry! {
    /// Containers of the hub board.
    pub struct BoardRegistry: BaseRegistry {
        players: Player,
        active_player: ActivePlayer,
        player_movements: PlayerBoardMovement,
        spaces: Space,
    }
}
