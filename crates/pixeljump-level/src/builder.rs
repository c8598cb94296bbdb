use pixeljump_core::catalog::{TextureSet, ThemeAssets};

use crate::config::LevelConfig;
use crate::objects::{HAZARD_TILE, ParsedLevel, WorldBounds, ground_support_top};
use crate::physics::{Aabb, Vec2};

/// A floating platform: the raw tile rectangle, the decorative stamp's
/// on-screen box (absent when the texture is missing), and the index of
/// the collider kept aligned to the stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSurface {
    pub raw: Aabb,
    pub stamp: Option<Aabb>,
    pub collider: usize,
}

/// One hazard cell: hitbox plus the visual marker's foot position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub hitbox: Aabb,
    pub marker: Vec2,
}

/// Collidable level geometry, decoupled from visuals.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGeometry {
    pub bounds: WorldBounds,
    /// Static solid colliders: stage segments first, then one per
    /// floating platform.
    pub colliders: Vec<Aabb>,
    pub surfaces: Vec<PlatformSurface>,
    pub hazards: Vec<Hazard>,
    pub goals: Vec<Aabb>,
    /// Top of the stage base all hazards sit on.
    pub stage_top: f32,
    /// Spawn as a body-center position, settled onto supporting ground.
    pub spawn: Vec2,
}

/// Build collision geometry from parsed objects.
pub fn build_geometry(
    parsed: &ParsedLevel,
    level_id: u32,
    cfg: &LevelConfig,
    theme: &ThemeAssets,
    textures: &TextureSet,
) -> LevelGeometry {
    let mut colliders: Vec<Aabb> = parsed.stage_segments.clone();

    let stamp_texture = textures.has(&theme.platform);
    if !stamp_texture && !parsed.floating_platforms.is_empty() {
        tracing::warn!(
            "platform texture {:?} missing, keeping colliders without stamps",
            theme.platform
        );
    }
    let display = cfg.platform_visual.display_for_level(level_id);

    let mut surfaces = Vec::with_capacity(parsed.floating_platforms.len());
    for &raw in &parsed.floating_platforms {
        // First pass: collider at the raw tile rectangle.
        let idx = colliders.len();
        colliders.push(raw);

        // Second pass: stamp the visual, then snap the collider to the
        // stamp's on-screen box. Raw tile dimensions and asset dimensions
        // differ across themes, so the hitbox must follow the stamp.
        let stamp = stamp_texture.then(|| {
            Aabb::new(
                raw.left.round(),
                (raw.top + cfg.platform_visual.y_offset).round() - display.height,
                display.width,
                display.height,
            )
        });
        if let Some(stamp) = stamp {
            colliders[idx] = inset_symmetric(stamp, cfg.platform_visual.collider_inset);
        }

        surfaces.push(PlatformSurface {
            raw,
            stamp,
            collider: idx,
        });
    }

    let stage_top = parsed
        .stage_rect
        .map(|r| r.top.round())
        .unwrap_or(parsed.bounds.height - cfg.stage_fallback_band);

    let hazards = refine_hazards(parsed, stage_top);

    let goals = parsed
        .goal_anchors
        .iter()
        .map(|anchor| {
            Aabb::centered(
                Vec2::new(anchor.x + cfg.goal.offset_x, anchor.y + cfg.goal.offset_y),
                cfg.goal.width,
                cfg.goal.height,
            )
        })
        .collect();

    let spawn = settle_spawn(parsed, cfg);

    LevelGeometry {
        bounds: parsed.bounds,
        colliders,
        surfaces,
        hazards,
        goals,
        stage_top,
        spawn,
    }
}

/// Trim a box by `inset` on each horizontal side, keeping the center.
fn inset_symmetric(rect: Aabb, inset: f32) -> Aabb {
    let new_width = (rect.width - 2.0 * inset).max(4.0);
    Aabb::new(
        rect.left + (rect.width - new_width) / 2.0,
        rect.top,
        new_width,
        rect.height,
    )
}

/// Placement refinement: clamp every hazard into the stage's horizontal
/// extent, snap onto the 16-unit grid anchored at the stage's left edge,
/// drop duplicate grid cells (first in left-to-right order wins), and seat
/// each survivor flush on the stage top with the hitbox centered half a
/// cell above the surface.
fn refine_hazards(parsed: &ParsedLevel, stage_top: f32) -> Vec<Hazard> {
    let half = HAZARD_TILE / 2.0;
    let stage_left = 0.0;
    let stage_right = parsed.bounds.width;

    let mut tiles = parsed.hazard_tiles.clone();
    tiles.sort_by(|a, b| a.left.total_cmp(&b.left));

    let mut seen = Vec::new();
    let mut hazards = Vec::new();
    for tile in tiles {
        let center_x = (tile.left + half)
            .round()
            .clamp(stage_left + half, stage_right - half);
        let idx = ((center_x - (stage_left + half)) / HAZARD_TILE).round() as i64;
        if seen.contains(&idx) {
            continue;
        }
        seen.push(idx);
        let snapped_x = stage_left + half + idx as f32 * HAZARD_TILE;
        hazards.push(Hazard {
            hitbox: Aabb::centered(
                Vec2::new(snapped_x, stage_top - half),
                HAZARD_TILE,
                HAZARD_TILE,
            ),
            marker: Vec2::new(snapped_x, stage_top),
        });
    }
    hazards
}

/// Snap the spawn to a body-center position resting on the supporting
/// ground top, preferring the stage base.
fn settle_spawn(parsed: &ParsedLevel, cfg: &LevelConfig) -> Vec2 {
    let support = parsed
        .stage_rect
        .map(|r| r.top.round())
        .or_else(|| ground_support_top(&parsed.grounds, parsed.spawn.x, cfg.player_body.width));
    match support {
        Some(top) => Vec2::new(parsed.spawn.x, top - cfg.player_body.height / 2.0),
        None => parsed.spawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::parse_level;
    use pixeljump_core::catalog::resolve_theme;
    use pixeljump_core::test_helpers::{goal, ground, hazard};

    fn theme_and_textures() -> (ThemeAssets, TextureSet) {
        let textures = TextureSet::new(["platform", "stage", "level_bg", "spike", "flag", "coin"]);
        (resolve_theme(1, &textures), textures)
    }

    fn build(objects: &[pixeljump_core::level_data::LevelObject]) -> LevelGeometry {
        let parsed = parse_level(objects);
        let (theme, textures) = theme_and_textures();
        build_geometry(&parsed, 1, &LevelConfig::default(), &theme, &textures)
    }

    #[test]
    fn stage_segments_become_raw_colliders() {
        let geometry = build(&[ground(0.0, 464.0, 800.0, 64.0)]);
        assert_eq!(geometry.colliders.len(), 1);
        assert_eq!(geometry.colliders[0], Aabb::new(0.0, 400.0, 800.0, 64.0));
        assert!(geometry.surfaces.is_empty());
    }

    #[test]
    fn platform_collider_snaps_to_stamp_bounds() {
        let geometry = build(&[
            ground(0.0, 464.0, 800.0, 64.0),
            ground(200.0, 300.0, 100.0, 16.0),
        ]);
        let surface = &geometry.surfaces[0];
        let stamp = surface.stamp.expect("stamp present when texture loaded");
        // Stamp: default display 140x60, offset 40 below the raw top.
        assert_eq!(stamp.left, 200.0);
        assert_eq!(stamp.top, 284.0 + 40.0 - 60.0);
        assert_eq!(stamp.width, 140.0);
        // Collider equals the stamp regardless of the raw 100x16 rect.
        let collider = geometry.colliders[surface.collider];
        assert_eq!(collider.left, stamp.left);
        assert_eq!(collider.right(), stamp.right());
        assert_eq!(collider.top, stamp.top);
    }

    #[test]
    fn collider_inset_trims_symmetrically() {
        let parsed = parse_level(&[
            ground(0.0, 464.0, 800.0, 64.0),
            ground(200.0, 300.0, 100.0, 16.0),
        ]);
        let (theme, textures) = theme_and_textures();
        let mut cfg = LevelConfig::default();
        cfg.platform_visual.collider_inset = 6.0;
        let geometry = build_geometry(&parsed, 1, &cfg, &theme, &textures);
        let surface = &geometry.surfaces[0];
        let stamp = surface.stamp.unwrap();
        let collider = geometry.colliders[surface.collider];
        assert_eq!(collider.left, stamp.left + 6.0);
        assert_eq!(collider.right(), stamp.right() - 6.0);
        assert_eq!(collider.center().x, stamp.center().x);
    }

    #[test]
    fn missing_platform_texture_keeps_raw_collider() {
        let parsed = parse_level(&[
            ground(0.0, 464.0, 800.0, 64.0),
            ground(200.0, 300.0, 100.0, 16.0),
        ]);
        let textures = TextureSet::default();
        let theme = resolve_theme(1, &textures);
        let geometry = build_geometry(&parsed, 1, &LevelConfig::default(), &theme, &textures);
        let surface = &geometry.surfaces[0];
        assert!(surface.stamp.is_none());
        assert_eq!(geometry.colliders[surface.collider], surface.raw);
    }

    #[test]
    fn themed_display_size_drives_alignment() {
        let parsed = parse_level(&[
            ground(0.0, 464.0, 800.0, 64.0),
            ground(200.0, 300.0, 100.0, 16.0),
        ]);
        let textures = TextureSet::new(["platform_snow", "stage_snow", "level_bg_snow"]);
        let theme = resolve_theme(2, &textures);
        let geometry = build_geometry(&parsed, 2, &LevelConfig::default(), &theme, &textures);
        let stamp = geometry.surfaces[0].stamp.unwrap();
        assert_eq!(stamp.width, 112.0);
        assert_eq!(stamp.height, 48.0);
    }

    #[test]
    fn hazards_snap_to_grid_and_dedup() {
        // Two hazard objects producing overlapping cells.
        let geometry = build(&[
            ground(0.0, 464.0, 800.0, 64.0),
            hazard(100.0, 400.0, 32.0, 16.0),
            hazard(104.0, 400.0, 16.0, 16.0),
        ]);
        let centers: Vec<f32> = geometry.hazards.iter().map(|h| h.hitbox.center().x).collect();
        // Grid anchored at stage left + 8; duplicates removed, first wins.
        assert_eq!(centers, vec![104.0, 120.0]);
        for h in &geometry.hazards {
            assert_eq!(h.hitbox.center().y, geometry.stage_top - 8.0);
            assert_eq!(h.marker.y, geometry.stage_top);
            assert_eq!(h.hitbox.width, 16.0);
        }
    }

    #[test]
    fn hazards_clamp_into_stage_extent() {
        let geometry = build(&[
            ground(0.0, 464.0, 800.0, 64.0),
            hazard(-4.0, 400.0, 16.0, 16.0),
        ]);
        assert_eq!(geometry.hazards.len(), 1);
        assert_eq!(geometry.hazards[0].hitbox.center().x, 8.0);
    }

    #[test]
    fn goal_sensor_offset_from_anchor() {
        let geometry = build(&[ground(0.0, 464.0, 800.0, 64.0), goal(700.0, 390.0)]);
        assert_eq!(geometry.goals.len(), 1);
        let center = geometry.goals[0].center();
        assert_eq!(center.x, 708.0);
        assert_eq!(center.y, 380.0);
    }

    #[test]
    fn spawn_settles_onto_stage_top() {
        let geometry = build(&[ground(0.0, 464.0, 800.0, 64.0)]);
        // Default spawn x, body bottom flush with the stage top at 400.
        assert_eq!(geometry.spawn.x, 64.0);
        assert_eq!(geometry.spawn.y, 400.0 - 24.0);
    }

    #[test]
    fn stage_top_falls_back_without_ground() {
        let geometry = build(&[goal(700.0, 390.0)]);
        assert_eq!(geometry.stage_top, 480.0 - 64.0);
    }
}
