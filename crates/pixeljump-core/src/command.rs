use serde::{Deserialize, Serialize};

/// Scenes the core can ask the host to start, run, or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneName {
    MainMenu,
    Level,
    Hud,
    /// Bridge scene between levels; restarting the level scene directly
    /// while it is still tearing down risks using half-destroyed resources,
    /// so the hand-off is staged through this scene one tick later.
    LevelTransition,
    Summary,
}

/// Payload carried across scene transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePayload {
    pub level_id: u32,
    pub score_carry: u32,
    pub player_count: u8,
    /// Set when the summary follows the last level.
    pub final_level: bool,
}

/// Coin-progress snapshot broadcast to the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinProgress {
    pub collected: u32,
    pub remaining: u32,
    pub total: u32,
}

/// Oscillator shape for placeholder sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Outbound effects produced by a simulation tick.
///
/// The core never touches rendering, audio, or scene machinery directly;
/// it returns these values and the host dispatches them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A scoring event: the delta just earned and the running total.
    ScoreAdd { delta: u32, total: u32 },
    /// Coin counters changed.
    CoinsUpdate(CoinProgress),
    /// Transient user-facing notice.
    Notify { message: String, duration_ms: u32 },
    /// Show or hide the HUD overlay (used by the pause coordinator).
    SetHudVisible(bool),
    ShowPauseMenu,
    HidePauseMenu,
    /// Start the HUD with its initial score and coin counters.
    RunHud { score: u32, coins: CoinProgress },
    /// Placeholder beep; the host gates this on the persisted sound setting.
    PlayTone {
        freq_hz: u32,
        duration_ms: u32,
        wave: Waveform,
    },
    StartScene {
        scene: SceneName,
        payload: ScenePayload,
    },
    StopScene(SceneName),
}
