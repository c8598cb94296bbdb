pub mod catalog;
pub mod command;
pub mod error;
pub mod input;
pub mod level_data;
pub mod player;
pub mod progress;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::input::{ControlSignals, TickInput};
    use crate::level_data::{LevelObject, ObjectKind};

    /// A ground rectangle anchored at its bottom edge, Tiled-style.
    pub fn ground(x: f32, y: f32, width: f32, height: f32) -> LevelObject {
        LevelObject {
            kind: ObjectKind::Ground,
            x,
            y,
            width,
            height,
        }
    }

    pub fn hazard(x: f32, y: f32, width: f32, height: f32) -> LevelObject {
        LevelObject {
            kind: ObjectKind::Hazard,
            x,
            y,
            width,
            height,
        }
    }

    pub fn goal(x: f32, y: f32) -> LevelObject {
        LevelObject {
            kind: ObjectKind::Goal,
            x,
            y,
            width: 16.0,
            height: 16.0,
        }
    }

    pub fn spawn(x: f32, y: f32) -> LevelObject {
        LevelObject {
            kind: ObjectKind::Spawn,
            x,
            y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Idle inputs for `n` players with the HUD already active.
    pub fn idle_input(n: usize) -> TickInput {
        TickInput {
            controls: vec![ControlSignals::default(); n],
            pause_pressed: false,
            mute_pressed: false,
            hud_active: true,
        }
    }

    /// Held-right inputs for player slot 0 (others idle).
    pub fn run_right_input(n: usize) -> TickInput {
        let mut input = idle_input(n);
        input.controls[0].right = true;
        input
    }

    /// Jump edge + hold for player slot 0 (others idle).
    pub fn jump_input(n: usize) -> TickInput {
        let mut input = idle_input(n);
        input.controls[0].jump_pressed = true;
        input.controls[0].jump_held = true;
        input
    }
}
