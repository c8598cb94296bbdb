use serde::{Deserialize, Serialize};

/// Unique identifier for a player within a level instance.
///
/// Ids are assigned at player-creation time and stay stable for the whole
/// level, so goal-arrival bookkeeping can never misattribute an arrival.
pub type PlayerId = u64;

/// Which logical control scheme drives a player entity.
///
/// The host decides what physical keys feed each slot (arrows/WASD for the
/// primary scheme, an independent key set for the secondary one); the core
/// only sees the slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlBinding {
    Primary,
    Secondary,
}

impl ControlBinding {
    /// Index into `TickInput::controls`.
    pub fn slot(self) -> usize {
        match self {
            ControlBinding::Primary => 0,
            ControlBinding::Secondary => 1,
        }
    }
}
