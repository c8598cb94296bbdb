use crate::config::CoinConfig;
use crate::physics::{Aabb, Vec2};

/// A placed coin. Collection flips `collected`; coins are never respawned
/// within a level run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub pos: Vec2,
    pub collected: bool,
}

impl Coin {
    pub fn hitbox(&self, cfg: &CoinConfig) -> Aabb {
        Aabb::centered(self.pos, cfg.size, cfg.size)
    }
}

/// Horizontal coin offsets for a surface of the given width, as fractions
/// of the width. Narrow surfaces get one centered coin; wide ones a pair.
fn offsets_for_width(width: f32) -> &'static [f32] {
    if width < 112.0 { &[0.5] } else { &[0.35, 0.65] }
}

/// Distribute coins over the given surface rectangles. Positions derive
/// from the raw tile rectangle, not the decorated stamp, so coin layout is
/// stable across themes.
pub fn distribute_coins(surfaces: &[Aabb], cfg: &CoinConfig) -> Vec<Coin> {
    let mut coins = Vec::new();
    for rect in surfaces {
        let y = rect.top - cfg.size / 2.0 - cfg.clearance;
        for &frac in offsets_for_width(rect.width) {
            coins.push(Coin {
                pos: Vec2::new(rect.left + rect.width * frac, y),
                collected: false,
            });
        }
    }
    coins
}

/// Tally of collected versus placed coins, for HUD display and the goal
/// gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinTally {
    pub collected: u32,
    pub total: u32,
}

impl CoinTally {
    pub fn of(coins: &[Coin]) -> Self {
        let total = coins.len() as u32;
        let collected = coins.iter().filter(|c| c.collected).count() as u32;
        CoinTally { collected, total }
    }

    pub fn remaining(&self) -> u32 {
        self.total - self.collected
    }

    pub fn all_collected(&self) -> bool {
        self.collected == self.total
    }
}
