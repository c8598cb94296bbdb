use serde::{Deserialize, Serialize};

/// Logical control signals for a single player, sampled once per tick.
///
/// `jump_pressed` is an edge (true only on the tick the control went down);
/// `jump_held` is the level. The host derives both from whatever devices it
/// supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSignals {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
    pub jump_held: bool,
}

/// Everything the host feeds the level simulation for one tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Per-slot control signals; players read the slot their binding names.
    /// A missing slot reads as all-false.
    pub controls: Vec<ControlSignals>,
    /// Edge-triggered pause hotkey.
    pub pause_pressed: bool,
    /// Edge-triggered mute hotkey.
    pub mute_pressed: bool,
    /// Whether the HUD scene is up and consuming broadcasts. Coin-progress
    /// updates are held back and retried while this is false.
    pub hud_active: bool,
}

impl TickInput {
    /// Signals for a control slot, defaulting to no input when absent.
    pub fn signals(&self, slot: usize) -> ControlSignals {
        self.controls.get(slot).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_reads_as_idle() {
        let input = TickInput::default();
        assert_eq!(input.signals(1), ControlSignals::default());
    }

    #[test]
    fn present_slot_reads_back() {
        let input = TickInput {
            controls: vec![ControlSignals {
                left: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(input.signals(0).left);
        assert!(!input.signals(0).right);
    }
}
