use pixeljump_core::input::ControlSignals;
use pixeljump_core::player::PlayerId;
use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::objects::WorldBounds;
use crate::physics::{Aabb, Body, Vec2, step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Movement mode at the moment of takeoff: whether a direction control
/// was held. The airborne pose is keyed off this snapshot for the whole
/// arc, not off anything that changes mid-air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TakeoffMode {
    Idle,
    Run,
}

/// Which animation the host should display for a player this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKey {
    IdleLeft,
    IdleRight,
    RunLeft,
    RunRight,
    JumpIdleLeft,
    JumpIdleRight,
    JumpRunLeft,
    JumpRunRight,
}

fn idle(facing: Facing) -> AnimationKey {
    match facing {
        Facing::Left => AnimationKey::IdleLeft,
        Facing::Right => AnimationKey::IdleRight,
    }
}

fn run(facing: Facing) -> AnimationKey {
    match facing {
        Facing::Left => AnimationKey::RunLeft,
        Facing::Right => AnimationKey::RunRight,
    }
}

fn jump_key(mode: TakeoffMode, facing: Facing) -> AnimationKey {
    match (mode, facing) {
        (TakeoffMode::Idle, Facing::Left) => AnimationKey::JumpIdleLeft,
        (TakeoffMode::Idle, Facing::Right) => AnimationKey::JumpIdleRight,
        (TakeoffMode::Run, Facing::Left) => AnimationKey::JumpRunLeft,
        (TakeoffMode::Run, Facing::Right) => AnimationKey::JumpRunRight,
    }
}

/// Full per-player simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub body: Body,
    pub facing: Facing,
    pub animation: AnimationKey,
    /// Remaining variable-height budget while the jump button is held.
    hold_budget_ms: f32,
    holding: bool,
    /// Mode and facing captured at takeoff. Keyed into the jump pose
    /// while airborne; cleared once grounded with the button released
    /// and the animation window spent.
    takeoff: Option<(TakeoffMode, Facing)>,
    /// Countdown keeping the jump pose up even if ground contact is
    /// regained right after takeoff.
    jump_anim_ms: f32,
}

impl PlayerState {
    pub fn new(id: PlayerId, spawn: Vec2, width: f32, height: f32) -> Self {
        Self {
            id,
            body: Body::new(spawn, width, height),
            facing: Facing::Right,
            animation: AnimationKey::IdleRight,
            hold_budget_ms: 0.0,
            holding: false,
            takeoff: None,
            jump_anim_ms: 0.0,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        self.body.aabb()
    }

    /// Put the player back at `spawn` with all motion and jump state
    /// cleared. Used on hazard contact.
    pub fn reset_to_spawn(&mut self, spawn: Vec2) {
        self.body.pos = spawn;
        self.body.vel = Vec2::default();
        self.body.on_floor = false;
        self.facing = Facing::Right;
        self.animation = AnimationKey::IdleRight;
        self.hold_budget_ms = 0.0;
        self.holding = false;
        self.takeoff = None;
        self.jump_anim_ms = 0.0;
    }
}

/// Advance one player by `dt_ms`. Returns true when a jump started this
/// tick, so the caller can cue a sound.
pub fn tick_player(
    state: &mut PlayerState,
    signals: ControlSignals,
    cfg: &PhysicsConfig,
    colliders: &[Aabb],
    bounds: &WorldBounds,
    dt_ms: f32,
) -> bool {
    let dt = dt_ms / 1000.0;

    let accel_x = match (signals.left, signals.right) {
        (true, false) => -cfg.accel_x,
        (false, true) => cfg.accel_x,
        _ => 0.0,
    };
    if accel_x < 0.0 {
        state.facing = Facing::Left;
    } else if accel_x > 0.0 {
        state.facing = Facing::Right;
    }

    let mut just_jumped = false;
    if signals.jump_pressed && state.body.on_floor {
        state.body.vel.y = cfg.jump_speed;
        state.holding = true;
        state.hold_budget_ms = cfg.jump_max_hold_ms;
        let mode = if signals.left || signals.right {
            TakeoffMode::Run
        } else {
            TakeoffMode::Idle
        };
        state.takeoff = Some((mode, state.facing));
        state.jump_anim_ms = cfg.jump_anim_grace_ms;
        just_jumped = true;
    } else if state.holding {
        // Holding the button sustains takeoff speed for a bounded window,
        // giving taller jumps than a tap.
        if signals.jump_held && state.hold_budget_ms > 0.0 {
            state.body.vel.y = cfg.jump_speed;
            state.hold_budget_ms -= dt_ms;
        } else {
            state.holding = false;
        }
    }

    step(&mut state.body, accel_x, cfg, colliders, bounds, dt);

    state.jump_anim_ms = (state.jump_anim_ms - dt_ms).max(0.0);
    if state.body.on_floor && !just_jumped && !signals.jump_held {
        state.holding = false;
        if state.jump_anim_ms <= 0.0 {
            state.takeoff = None;
        }
    }

    state.animation = select_animation(state, cfg);
    just_jumped
}

fn select_animation(state: &PlayerState, cfg: &PhysicsConfig) -> AnimationKey {
    if let Some((mode, facing)) = state.takeoff
        && (!state.body.on_floor || state.jump_anim_ms > 0.0)
    {
        return jump_key(mode, facing);
    }
    let running = state.body.vel.x.abs() >= cfg.run_anim_deadband;
    if state.body.on_floor {
        if running { run(state.facing) } else { idle(state.facing) }
    } else {
        // Airborne without a takeoff (walked off an edge).
        let mode = if running {
            TakeoffMode::Run
        } else {
            TakeoffMode::Idle
        };
        jump_key(mode, state.facing)
    }
}
