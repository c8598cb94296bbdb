//! Level simulation for pixeljump.
//!
//! The level owns all mutable state (players, coins, goal arrivals, pause
//! and completion flags) and advances through [`LevelState::tick`], which
//! takes sampled input plus a persistence handle and returns the commands
//! the host must dispatch in order. Nothing in here touches rendering,
//! audio, or scene machinery directly.

pub mod builder;
pub mod coins;
pub mod config;
pub mod objects;
pub mod pause;
pub mod physics;
pub mod player;

use std::collections::BTreeSet;

use pixeljump_core::catalog::{LevelCatalog, TextureSet, resolve_theme};
use pixeljump_core::command::{Command, CoinProgress, ScenePayload, SceneName, Waveform};
use pixeljump_core::error::LevelError;
use pixeljump_core::input::TickInput;
use pixeljump_core::level_data::LevelMap;
use pixeljump_core::player::{ControlBinding, PlayerId};
use pixeljump_core::progress::{ProgressRecord, ProgressStore};

use crate::builder::{LevelGeometry, build_geometry};
use crate::coins::{Coin, CoinTally, distribute_coins};
use crate::config::LevelConfig;
use crate::objects::parse_level;
use crate::physics::{Aabb, Vec2};
use crate::player::{PlayerState, tick_player};

/// How a level run is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelParams {
    pub level_id: u32,
    pub player_count: u8,
    /// Score carried over from earlier levels in the same run.
    pub score_carry: u32,
}

fn tone(freq_hz: u32, duration_ms: u32, wave: Waveform) -> Command {
    Command::PlayTone {
        freq_hz,
        duration_ms,
        wave,
    }
}

fn jump_tone() -> Command {
    tone(523, 100, Waveform::Square)
}

fn coin_tone() -> Command {
    tone(880, 80, Waveform::Sine)
}

fn hurt_tone() -> Command {
    tone(130, 250, Waveform::Sawtooth)
}

fn win_tone() -> Command {
    tone(784, 450, Waveform::Triangle)
}

/// The running simulation for one level.
#[derive(Debug)]
pub struct LevelState {
    level_id: u32,
    max_level: u32,
    player_count: u8,
    cfg: LevelConfig,
    geometry: LevelGeometry,
    coins: Vec<Coin>,
    players: Vec<PlayerState>,
    score: u32,
    goal_arrivals: BTreeSet<PlayerId>,
    /// Countdown before the next goal-gate notice may show.
    goal_notice_cooldown_ms: f32,
    all_coins_notified: bool,
    complete: bool,
    pause: pause::PauseCoordinator,
    /// Scene hand-off staged by completion and emitted one tick later, so
    /// the host never restarts scenes mid-teardown.
    pending_transition: Option<Command>,
    /// Coin counters changed while the HUD was down; rebroadcast once it
    /// comes back.
    pending_coin_progress: bool,
    torn_down: bool,
}

impl LevelState {
    /// Parse the map, build geometry and coins, and place the players.
    pub fn build(
        params: &LevelParams,
        map: &LevelMap,
        catalog: &LevelCatalog,
        cfg: LevelConfig,
        textures: &TextureSet,
    ) -> Result<Self, LevelError> {
        catalog.resolve(params.level_id)?;
        let layer = map.object_layer()?;
        let parsed = parse_level(&layer.objects);
        let theme = resolve_theme(params.level_id, textures);
        let geometry = build_geometry(&parsed, params.level_id, &cfg, &theme, textures);

        // Coin layout follows the raw tile rectangles so it is identical
        // across themes.
        let raw_rects: Vec<Aabb> = geometry.surfaces.iter().map(|s| s.raw).collect();
        let coins = distribute_coins(&raw_rects, &cfg.coin);

        let player_count = params.player_count.clamp(1, 2);
        let players = (0..player_count)
            .map(|i| {
                let spawn = spawn_for(&geometry, &cfg, i as usize);
                PlayerState::new(
                    PlayerId::from(i),
                    spawn,
                    cfg.player_body.width,
                    cfg.player_body.height,
                )
            })
            .collect();

        tracing::info!(
            level = params.level_id,
            players = player_count,
            coins = coins.len(),
            "level built"
        );

        Ok(Self {
            level_id: params.level_id,
            max_level: catalog.max_level(),
            player_count,
            cfg,
            geometry,
            coins,
            players,
            score: params.score_carry,
            goal_arrivals: BTreeSet::new(),
            goal_notice_cooldown_ms: 0.0,
            all_coins_notified: false,
            complete: false,
            pause: pause::PauseCoordinator::default(),
            pending_transition: None,
            pending_coin_progress: true,
            torn_down: false,
        })
    }

    /// Commands to dispatch once, right after [`LevelState::build`].
    pub fn startup_commands(&self) -> Vec<Command> {
        vec![Command::RunHud {
            score: self.score,
            coins: self.coin_progress(),
        }]
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn coin_tally(&self) -> CoinTally {
        CoinTally::of(&self.coins)
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Where the camera should look: the centroid of all players.
    pub fn camera_target(&self) -> Vec2 {
        let n = self.players.len().max(1) as f32;
        let sum = self
            .players
            .iter()
            .fold(Vec2::default(), |acc, p| {
                Vec2::new(acc.x + p.body.pos.x, acc.y + p.body.pos.y)
            });
        Vec2::new(sum.x / n, sum.y / n)
    }

    fn coin_progress(&self) -> CoinProgress {
        let tally = self.coin_tally();
        CoinProgress {
            collected: tally.collected,
            remaining: tally.remaining(),
            total: tally.total,
        }
    }

    fn physics_frozen(&self) -> bool {
        self.pause.is_paused() || self.complete
    }

    /// Advance the level by `dt_ms`. Commands come back in dispatch order.
    pub fn tick(
        &mut self,
        input: &TickInput,
        dt_ms: f32,
        store: &mut dyn ProgressStore,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        if self.torn_down {
            return out;
        }

        if input.mute_pressed {
            self.toggle_sound(store, &mut out);
        }
        if input.pause_pressed {
            self.pause.toggle(input.hud_active, &mut out);
        }

        if let Some(cmd) = self.pending_transition.take() {
            out.push(cmd);
            self.torn_down = true;
            return out;
        }

        if self.pending_coin_progress && input.hud_active {
            out.push(Command::CoinsUpdate(self.coin_progress()));
            self.pending_coin_progress = false;
        }

        if self.physics_frozen() {
            return out;
        }

        self.goal_notice_cooldown_ms = (self.goal_notice_cooldown_ms - dt_ms).max(0.0);

        for (idx, player) in self.players.iter_mut().enumerate() {
            let binding = if idx == 0 {
                ControlBinding::Primary
            } else {
                ControlBinding::Secondary
            };
            let jumped = tick_player(
                player,
                input.signals(binding.slot()),
                &self.cfg.physics,
                &self.geometry.colliders,
                &self.geometry.bounds,
                dt_ms,
            );
            if jumped {
                out.push(jump_tone());
            }
        }

        self.collect_coins(input.hud_active, &mut out);
        self.apply_hazards(&mut out);
        self.check_goals(store, &mut out);

        out
    }

    /// Abort the run: cancel staged work and stop the HUD. The level goes
    /// inert; further ticks return nothing.
    pub fn teardown(&mut self) -> Vec<Command> {
        self.torn_down = true;
        self.pending_transition = None;
        self.pending_coin_progress = false;
        vec![Command::StopScene(SceneName::Hud)]
    }

    fn toggle_sound(&mut self, store: &mut dyn ProgressStore, out: &mut Vec<Command>) {
        let mut settings = store.load_settings();
        settings.sound_enabled = !settings.sound_enabled;
        let saved = store.save_settings(settings);
        out.push(Command::Notify {
            message: if saved.sound_enabled {
                "Sound: ON".to_string()
            } else {
                "Sound: OFF".to_string()
            },
            duration_ms: 1000,
        });
    }

    fn collect_coins(&mut self, hud_active: bool, out: &mut Vec<Command>) {
        let mut collected_any = false;
        for player in &self.players {
            let hitbox = player.hitbox();
            for coin in self.coins.iter_mut().filter(|c| !c.collected) {
                if hitbox.intersects(&coin.hitbox(&self.cfg.coin)) {
                    coin.collected = true;
                    collected_any = true;
                    self.score += self.cfg.score_per_coin;
                    out.push(Command::ScoreAdd {
                        delta: self.cfg.score_per_coin,
                        total: self.score,
                    });
                    out.push(coin_tone());
                }
            }
        }
        if !collected_any {
            return;
        }

        if hud_active {
            out.push(Command::CoinsUpdate(self.coin_progress()));
        } else {
            self.pending_coin_progress = true;
        }
        if self.coin_tally().all_collected() && !self.all_coins_notified {
            self.all_coins_notified = true;
            out.push(Command::Notify {
                message: "All coins collected! Reach the flag!".to_string(),
                duration_ms: 2000,
            });
        }
    }

    fn apply_hazards(&mut self, out: &mut Vec<Command>) {
        for (idx, player) in self.players.iter_mut().enumerate() {
            let hit = self
                .geometry
                .hazards
                .iter()
                .any(|h| player.hitbox().intersects(&h.hitbox));
            if !hit {
                continue;
            }
            // Death resets position only; score and coins stay earned.
            player.reset_to_spawn(spawn_for(&self.geometry, &self.cfg, idx));
            self.goal_arrivals.remove(&player.id);
            out.push(hurt_tone());
        }
    }

    fn check_goals(&mut self, store: &mut dyn ProgressStore, out: &mut Vec<Command>) {
        let at_goal: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| {
                self.geometry
                    .goals
                    .iter()
                    .any(|g| p.hitbox().intersects(g))
            })
            .map(|p| p.id)
            .collect();
        if at_goal.is_empty() {
            return;
        }

        if !self.coin_tally().all_collected() {
            self.notice(out, "Collect all the coins to open the goal!");
            return;
        }

        for id in at_goal {
            self.goal_arrivals.insert(id);
        }
        if self.goal_arrivals.len() == self.players.len() {
            self.finish_level(store, out);
        } else {
            self.notice(out, "Waiting for your teammate...");
        }
    }

    /// Rate-limited transient notice for the goal gate.
    fn notice(&mut self, out: &mut Vec<Command>, message: &str) {
        if self.goal_notice_cooldown_ms > 0.0 {
            return;
        }
        self.goal_notice_cooldown_ms = self.cfg.goal_warning_cooldown_ms;
        out.push(Command::Notify {
            message: message.to_string(),
            duration_ms: 1500,
        });
    }

    fn finish_level(&mut self, store: &mut dyn ProgressStore, out: &mut Vec<Command>) {
        if self.complete {
            return;
        }
        self.complete = true;

        let saved = store.save_progress(ProgressRecord {
            unlocked_level: (self.level_id + 1).min(self.max_level),
            high_score: self.score,
        });
        tracing::info!(
            level = self.level_id,
            score = self.score,
            unlocked = saved.unlocked_level,
            "level complete"
        );

        out.push(win_tone());
        out.push(Command::StopScene(SceneName::Hud));

        let final_level = self.level_id >= self.max_level;
        let payload = ScenePayload {
            level_id: if final_level {
                self.level_id
            } else {
                self.level_id + 1
            },
            score_carry: self.score,
            player_count: self.player_count,
            final_level,
        };
        self.pending_transition = Some(Command::StartScene {
            scene: if final_level {
                SceneName::Summary
            } else {
                SceneName::LevelTransition
            },
            payload,
        });
    }
}

fn spawn_for(geometry: &LevelGeometry, cfg: &LevelConfig, index: usize) -> Vec2 {
    Vec2::new(
        geometry.spawn.x + cfg.second_spawn_offset_x * index as f32,
        geometry.spawn.y,
    )
}
