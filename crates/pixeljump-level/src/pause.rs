use pixeljump_core::command::Command;

/// Pause toggle with memory of the HUD state it suspended.
///
/// Pausing hides the HUD and freezes the simulation; resuming restores
/// exactly the HUD visibility it found. A simulation frozen for another
/// reason (level complete, transition staged) stays frozen through a
/// pause/resume cycle because the level's freeze gate checks that state
/// independently of the pause flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct PauseCoordinator {
    paused: bool,
    hud_was_visible: bool,
}

impl PauseCoordinator {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle(&mut self, hud_visible: bool, out: &mut Vec<Command>) {
        if self.paused {
            self.paused = false;
            out.push(Command::HidePauseMenu);
            out.push(Command::SetHudVisible(self.hud_was_visible));
        } else {
            self.paused = true;
            self.hud_was_visible = hud_visible;
            out.push(Command::ShowPauseMenu);
            out.push(Command::SetHudVisible(false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_hides_hud_and_resume_restores_it() {
        let mut pause = PauseCoordinator::default();
        let mut out = Vec::new();
        pause.toggle(true, &mut out);
        assert!(pause.is_paused());
        assert_eq!(
            out,
            vec![Command::ShowPauseMenu, Command::SetHudVisible(false)]
        );

        out.clear();
        pause.toggle(false, &mut out);
        assert!(!pause.is_paused());
        assert_eq!(
            out,
            vec![Command::HidePauseMenu, Command::SetHudVisible(true)]
        );
    }

    #[test]
    fn resume_does_not_show_a_hud_that_was_hidden() {
        let mut pause = PauseCoordinator::default();
        let mut out = Vec::new();
        pause.toggle(false, &mut out);
        out.clear();
        pause.toggle(false, &mut out);
        assert_eq!(
            out,
            vec![Command::HidePauseMenu, Command::SetHudVisible(false)]
        );
    }
}
