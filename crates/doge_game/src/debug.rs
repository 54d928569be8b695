//! Debug mode switch shared by the scene manager and every scene.

use std::cell::Cell;
use std::rc::Rc;

/// Shared on/off switch for debug visuals and debug hotkeys.
///
/// Clones observe the same flag. Each [`SceneManager`](crate::SceneManager)
/// creates its own, so independent managers (tests) never interfere.
#[derive(Debug, Clone, Default)]
pub struct DebugMode(Rc<Cell<bool>>);

impl DebugMode {
    pub fn new(enabled: bool) -> Self {
        Self(Rc::new(Cell::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, enabled: bool) {
        self.0.set(enabled);
    }

    /// Flip the flag, returning the new state.
    pub fn toggle(&self) -> bool {
        let enabled = !self.0.get();
        self.0.set(enabled);
        enabled
    }
}
