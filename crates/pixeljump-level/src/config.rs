use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Gravity acceleration (units/s^2, y grows downward).
pub const GRAVITY_Y: f32 = 1100.0;
/// Horizontal run acceleration (units/s^2).
pub const ACCEL_X: f32 = 900.0;
/// Horizontal drag while no direction is held (units/s^2).
pub const DRAG_X: f32 = 900.0;
/// Horizontal speed cap.
pub const MAX_VEL_X: f32 = 300.0;
/// Vertical speed cap.
pub const MAX_VEL_Y: f32 = 1000.0;
/// Jump launch velocity (negative = upward).
pub const JUMP_SPEED: f32 = -420.0;
/// Cap on how long holding jump keeps reapplying launch velocity.
pub const JUMP_MAX_HOLD_MS: f32 = 180.0;
/// Window during which the jump animation stays up even if ground contact
/// is regained within a tick.
pub const JUMP_ANIM_GRACE_MS: f32 = 140.0;
/// |vx| below this renders the idle pose instead of the run cycle.
pub const RUN_ANIM_DEADBAND: f32 = 10.0;

/// Kinematic integration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    pub accel_x: f32,
    pub drag_x: f32,
    pub max_vel_x: f32,
    pub max_vel_y: f32,
    pub jump_speed: f32,
    pub jump_max_hold_ms: f32,
    pub jump_anim_grace_ms: f32,
    pub run_anim_deadband: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y,
            accel_x: ACCEL_X,
            drag_x: DRAG_X,
            max_vel_x: MAX_VEL_X,
            max_vel_y: MAX_VEL_Y,
            jump_speed: JUMP_SPEED,
            jump_max_hold_ms: JUMP_MAX_HOLD_MS,
            jump_anim_grace_ms: JUMP_ANIM_GRACE_MS,
            run_anim_deadband: RUN_ANIM_DEADBAND,
        }
    }
}

/// Collision body for the player sprite. These are per-asset tuning data,
/// not design invariants, so they live in configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBodyConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerBodyConfig {
    fn default() -> Self {
        Self {
            width: 28.0,
            height: 48.0,
        }
    }
}

/// On-screen size of a platform stamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

/// Decorative platform stamping: display size varies per level theme, the
/// stamp sits `y_offset` below the raw surface line, and the collider is
/// trimmed by `collider_inset` on each side after snapping to the stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformVisualConfig {
    pub display: DisplaySize,
    /// Per-level-id overrides, keyed by the level id as a string.
    pub themed_display: BTreeMap<String, DisplaySize>,
    pub y_offset: f32,
    pub collider_inset: f32,
}

impl Default for PlatformVisualConfig {
    fn default() -> Self {
        let mut themed_display = BTreeMap::new();
        themed_display.insert(
            "2".to_string(),
            DisplaySize {
                width: 112.0,
                height: 48.0,
            },
        );
        themed_display.insert(
            "3".to_string(),
            DisplaySize {
                width: 120.0,
                height: 52.0,
            },
        );
        Self {
            display: DisplaySize {
                width: 140.0,
                height: 60.0,
            },
            themed_display,
            y_offset: 40.0,
            collider_inset: 0.0,
        }
    }
}

impl PlatformVisualConfig {
    pub fn display_for_level(&self, level_id: u32) -> DisplaySize {
        self.themed_display
            .get(&level_id.to_string())
            .copied()
            .unwrap_or(self.display)
    }
}

/// Coin pickup sizing and placement clearance above the surface top.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub size: f32,
    pub clearance: f32,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            size: 16.0,
            clearance: 30.0,
        }
    }
}

/// Goal flag sensor: anchor offset from the raw object plus sensor extent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            offset_x: 8.0,
            offset_y: -10.0,
            width: 16.0,
            height: 32.0,
        }
    }
}

/// Top-level level-play configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub physics: PhysicsConfig,
    pub player_body: PlayerBodyConfig,
    pub platform_visual: PlatformVisualConfig,
    pub coin: CoinConfig,
    pub goal: GoalConfig,
    pub score_per_coin: u32,
    pub goal_warning_cooldown_ms: f32,
    /// Horizontal offset the second player spawns at to avoid overlap.
    pub second_spawn_offset_x: f32,
    /// Height of the fallback stage band when a level has no ground.
    pub stage_fallback_band: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            player_body: PlayerBodyConfig::default(),
            platform_visual: PlatformVisualConfig::default(),
            coin: CoinConfig::default(),
            goal: GoalConfig::default(),
            score_per_coin: 10,
            goal_warning_cooldown_ms: 1500.0,
            second_spawn_offset_x: 40.0,
            stage_fallback_band: 64.0,
        }
    }
}

impl LevelConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("PIXELJUMP_CONFIG")
            .unwrap_or_else(|_| "config/pixeljump.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<LevelConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    LevelConfig::default()
                },
            },
            Err(_) => LevelConfig::default(),
        }
    }
}
