use serde::{Deserialize, Serialize};

use pixeljump_core::level_data::{LevelObject, ObjectKind};

use crate::physics::{Aabb, Vec2};

/// Minimum world extent: one viewport.
pub const MIN_WORLD_WIDTH: f32 = 800.0;
pub const MIN_WORLD_HEIGHT: f32 = 480.0;
/// Ground objects at most this tall are floating platforms; anything
/// deeper is stage terrain.
pub const FLOATING_MAX_HEIGHT: f32 = 20.0;
/// Hazards decompose into cells of this width on a fixed grid.
pub const HAZARD_TILE: f32 = 16.0;
/// Spawn point used when a level declares none.
pub const DEFAULT_SPAWN: Vec2 = Vec2 { x: 64.0, y: 400.0 };

/// Derived maximum world extent covering all objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

/// One 16-unit hazard cell with the ground top supporting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardTile {
    pub left: f32,
    pub ground_top: f32,
}

/// Object-layer data after categorization, in collider coordinates
/// (top-anchored boxes).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLevel {
    pub bounds: WorldBounds,
    /// Every ground box (stage and floating alike), for support queries.
    pub grounds: Vec<Aabb>,
    pub stage_segments: Vec<Aabb>,
    pub floating_platforms: Vec<Aabb>,
    pub hazard_tiles: Vec<HazardTile>,
    pub goal_anchors: Vec<Vec2>,
    pub spawn: Vec2,
    /// Lowest ground object: the stage base the hazard refinement pass
    /// snaps onto. None when the level has no ground at all.
    pub stage_rect: Option<Aabb>,
}

/// Parse the raw object list into categorized, collider-ready geometry.
pub fn parse_level(objects: &[LevelObject]) -> ParsedLevel {
    let bounds = world_bounds(objects);

    let mut grounds = Vec::new();
    let mut stage_segments = Vec::new();
    let mut floating_platforms = Vec::new();
    let mut goal_anchors = Vec::new();
    let mut spawn = None;
    let mut stage_rect: Option<(f32, Aabb)> = None;

    for obj in objects {
        match obj.kind {
            ObjectKind::Ground => {
                let rect = ground_rect(obj);
                grounds.push(rect);
                if is_floating(obj.height) {
                    floating_platforms.push(rect);
                } else {
                    stage_segments.push(rect);
                }
                // The stage base is the ground object anchored lowest.
                if stage_rect.is_none_or(|(y, _)| obj.y > y) {
                    stage_rect = Some((obj.y, rect));
                }
            },
            ObjectKind::Goal => goal_anchors.push(Vec2::new(obj.x, obj.y)),
            ObjectKind::Spawn => {
                if spawn.is_none() {
                    spawn = Some(Vec2::new(obj.x, obj.y));
                }
            },
            ObjectKind::Hazard => {},
        }
    }

    // Hazards need the ground set complete before support checks.
    let mut hazard_tiles = Vec::new();
    for obj in objects {
        if obj.kind != ObjectKind::Hazard {
            continue;
        }
        for left in hazard_tile_lefts(obj.x, obj.width) {
            let center_x = (left + HAZARD_TILE / 2.0).round();
            // No supporting ground below the cell center: drop the cell
            // silently, no floating death tiles.
            let Some(ground_top) = ground_top_at(&grounds, center_x) else {
                continue;
            };
            hazard_tiles.push(HazardTile {
                left,
                ground_top: ground_top.round(),
            });
        }
    }

    ParsedLevel {
        bounds,
        grounds,
        stage_segments,
        floating_platforms,
        hazard_tiles,
        goal_anchors,
        spawn: spawn.unwrap_or(DEFAULT_SPAWN),
        stage_rect: stage_rect.map(|(_, rect)| rect),
    }
}

/// Max over all objects of `(x+width, y+height)`, floored at the viewport.
pub fn world_bounds(objects: &[LevelObject]) -> WorldBounds {
    let mut width = MIN_WORLD_WIDTH;
    let mut height = MIN_WORLD_HEIGHT;
    for obj in objects {
        width = width.max(obj.x + obj.width);
        height = height.max(obj.y + obj.height);
    }
    WorldBounds { width, height }
}

/// Thin ground objects carry decorative stamps; deep ones are terrain.
pub fn is_floating(height: f32) -> bool {
    height > 0.0 && height <= FLOATING_MAX_HEIGHT
}

fn ground_rect(obj: &LevelObject) -> Aabb {
    Aabb::new(obj.x, obj.y - obj.height, obj.width, obj.height)
}

/// Left edges of the 16-unit hazard cells covering `[x, x+width)`:
/// whole cells from the left, one extra anchored to the right edge when
/// the remainder is at least half a cell, and at least one cell always.
pub fn hazard_tile_lefts(x: f32, width: f32) -> Vec<f32> {
    let whole = (width / HAZARD_TILE).floor() as u32;
    let remainder = width - whole as f32 * HAZARD_TILE;
    let mut lefts: Vec<f32> = (0..whole).map(|i| x + i as f32 * HAZARD_TILE).collect();
    if remainder >= HAZARD_TILE / 2.0 {
        let extra = x + width - HAZARD_TILE;
        if lefts.last().is_none_or(|&last| extra > last) {
            lefts.push(extra);
        }
    }
    if lefts.is_empty() {
        lefts.push(x);
    }
    lefts
}

/// Highest ground surface spanning `x` (minimum top-Y among matches).
pub fn ground_top_at(grounds: &[Aabb], x: f32) -> Option<f32> {
    grounds
        .iter()
        .filter(|g| g.contains_x(x))
        .map(|g| g.top)
        .fold(None, |best, top| match best {
            Some(b) if b <= top => Some(b),
            _ => Some(top),
        })
}

/// Highest support available under a body of `width` centered at `x`,
/// sampling the left edge, center, and right edge.
pub fn ground_support_top(grounds: &[Aabb], x: f32, width: f32) -> Option<f32> {
    let half = (width / 2.0).floor().max(1.0);
    [x - half, x, x + half]
        .into_iter()
        .filter_map(|sx| ground_top_at(grounds, sx))
        .fold(None, |best: Option<f32>, top| match best {
            Some(b) if b <= top => Some(b),
            _ => Some(top),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeljump_core::test_helpers::{goal, ground, hazard, spawn};

    #[test]
    fn empty_level_gets_viewport_bounds() {
        let bounds = world_bounds(&[]);
        assert_eq!(bounds.width, 800.0);
        assert_eq!(bounds.height, 480.0);
    }

    #[test]
    fn bounds_cover_all_objects() {
        let objects = [ground(0.0, 464.0, 2400.0, 64.0), goal(2300.0, 400.0)];
        let bounds = world_bounds(&objects);
        assert_eq!(bounds.width, 2400.0);
        assert_eq!(bounds.height, 528.0);
    }

    #[test]
    fn thin_ground_is_floating_deep_ground_is_stage() {
        let objects = [
            ground(0.0, 464.0, 800.0, 64.0),
            ground(200.0, 300.0, 100.0, 16.0),
            ground(400.0, 280.0, 100.0, 20.0),
            ground(600.0, 260.0, 100.0, 21.0),
        ];
        let parsed = parse_level(&objects);
        assert_eq!(parsed.floating_platforms.len(), 2);
        assert_eq!(parsed.stage_segments.len(), 2);
        // Stage rect is the lowest-anchored ground
        assert_eq!(parsed.stage_rect.unwrap().top, 400.0);
    }

    #[test]
    fn spawn_defaults_when_absent() {
        let parsed = parse_level(&[ground(0.0, 464.0, 800.0, 64.0)]);
        assert_eq!(parsed.spawn, DEFAULT_SPAWN);
        let with_spawn = parse_level(&[spawn(120.0, 300.0)]);
        assert_eq!(with_spawn.spawn, Vec2::new(120.0, 300.0));
    }

    #[test]
    fn hazard_tiling_whole_and_remainder() {
        // width 40: two whole cells plus a remainder of 8, anchored right.
        assert_eq!(hazard_tile_lefts(0.0, 40.0), vec![0.0, 16.0, 24.0]);
        // remainder below half a cell is not covered
        assert_eq!(hazard_tile_lefts(0.0, 39.0), vec![0.0, 16.0]);
        // zero width still yields exactly one cell
        assert_eq!(hazard_tile_lefts(5.0, 0.0), vec![5.0]);
        // width below one cell yields the right-anchored cell
        assert_eq!(hazard_tile_lefts(0.0, 12.0), vec![-4.0]);
    }

    #[test]
    fn unsupported_hazard_cells_are_dropped() {
        // Ground under x in [0,16) and [32,48); hazard spans [0,40).
        let objects = [
            ground(0.0, 464.0, 16.0, 64.0),
            ground(32.0, 464.0, 16.0, 64.0),
            hazard(0.0, 400.0, 40.0, 16.0),
        ];
        let parsed = parse_level(&objects);
        let lefts: Vec<f32> = parsed.hazard_tiles.iter().map(|t| t.left).collect();
        // Cell at 16 has its center over the gap at x=24 and is dropped;
        // the remainder cell at 24 is centered at 32, which is supported.
        assert_eq!(lefts, vec![0.0, 24.0]);
        for tile in &parsed.hazard_tiles {
            assert_eq!(tile.ground_top, 400.0, "cells sit on the ground top");
        }
    }

    #[test]
    fn ground_top_picks_highest_surface() {
        let grounds = [
            Aabb::new(0.0, 400.0, 800.0, 64.0),
            Aabb::new(100.0, 300.0, 100.0, 16.0),
        ];
        assert_eq!(ground_top_at(&grounds, 150.0), Some(300.0));
        assert_eq!(ground_top_at(&grounds, 50.0), Some(400.0));
        assert_eq!(ground_top_at(&grounds, 900.0), None);
        // span is inclusive on both edges
        assert_eq!(ground_top_at(&grounds, 200.0), Some(300.0));
    }

    #[test]
    fn support_top_samples_body_extent() {
        // Platform only under the body's right edge.
        let grounds = [Aabb::new(110.0, 300.0, 50.0, 16.0)];
        assert_eq!(ground_support_top(&grounds, 100.0, 28.0), Some(300.0));
        assert_eq!(ground_support_top(&grounds, 50.0, 28.0), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Every placed hazard cell has ground under its center.
            #[test]
            fn hazard_cells_always_supported(
                spans in proptest::collection::vec((0.0f32..700.0, 0.0f32..120.0), 1..6),
                grounds_in in proptest::collection::vec((0.0f32..700.0, 16.0f32..200.0), 0..5),
            ) {
                let mut objects: Vec<_> = grounds_in
                    .iter()
                    .map(|&(x, w)| ground(x, 464.0, w, 64.0))
                    .collect();
                objects.extend(spans.iter().map(|&(x, w)| hazard(x, 400.0, w, 16.0)));
                let parsed = parse_level(&objects);
                for tile in &parsed.hazard_tiles {
                    let center = (tile.left + HAZARD_TILE / 2.0).round();
                    prop_assert!(
                        ground_top_at(&parsed.grounds, center).is_some(),
                        "cell at {} has no support", tile.left
                    );
                }
            }
        }
    }
}
