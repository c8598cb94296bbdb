use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::objects::WorldBounds;

/// 2D point/vector in world units. The world is y-down: gravity is
/// positive, jumps launch with negative vy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x <= self.right()
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }
}

/// Kinematic body: a center position, velocity, and half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_w: f32,
    pub half_h: f32,
    /// Set by the last collision resolution when resting on a surface.
    pub on_floor: bool,
}

impl Body {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            vel: Vec2::default(),
            half_w: width / 2.0,
            half_h: height / 2.0,
            on_floor: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            left: self.pos.x - self.half_w,
            top: self.pos.y - self.half_h,
            width: self.half_w * 2.0,
            height: self.half_h * 2.0,
        }
    }
}

/// Advance a body by `dt` seconds: apply acceleration, drag, gravity and
/// the velocity caps, integrate, then resolve collisions against the
/// static colliders and the world bounds.
pub fn step(
    body: &mut Body,
    accel_x: f32,
    cfg: &PhysicsConfig,
    colliders: &[Aabb],
    bounds: &WorldBounds,
    dt: f32,
) {
    body.vel.x += accel_x * dt;
    if accel_x == 0.0 {
        // Drag is a property of the integration, not the controller.
        let decel = cfg.drag_x * dt;
        if body.vel.x.abs() <= decel {
            body.vel.x = 0.0;
        } else {
            body.vel.x -= decel * body.vel.x.signum();
        }
    }
    body.vel.x = body.vel.x.clamp(-cfg.max_vel_x, cfg.max_vel_x);

    body.vel.y += cfg.gravity_y * dt;
    body.vel.y = body.vel.y.clamp(-cfg.max_vel_y, cfg.max_vel_y);

    body.pos.x += body.vel.x * dt;
    body.pos.y += body.vel.y * dt;

    body.on_floor = false;
    resolve_collisions(body, colliders);
    clamp_to_bounds(body, bounds);
}

/// Minimum-penetration AABB resolution against static colliders.
fn resolve_collisions(body: &mut Body, colliders: &[Aabb]) {
    for collider in colliders {
        let b = body.aabb();
        if !b.intersects(collider) {
            continue;
        }

        let overlap_right = b.right() - collider.left;
        let overlap_left = collider.right() - b.left;
        let overlap_down = b.bottom() - collider.top;
        let overlap_up = collider.bottom() - b.top;

        let min_overlap = overlap_right
            .min(overlap_left)
            .min(overlap_down)
            .min(overlap_up);

        if min_overlap == overlap_down {
            // Landed on the collider's top.
            body.pos.y = collider.top - body.half_h;
            if body.vel.y > 0.0 {
                body.vel.y = 0.0;
            }
            body.on_floor = true;
        } else if min_overlap == overlap_up {
            // Hit head on the collider's underside.
            body.pos.y = collider.bottom() + body.half_h;
            if body.vel.y < 0.0 {
                body.vel.y = 0.0;
            }
        } else if min_overlap == overlap_right {
            body.pos.x = collider.left - body.half_w;
            body.vel.x = 0.0;
        } else {
            body.pos.x = collider.right() + body.half_w;
            body.vel.x = 0.0;
        }
    }
}

/// Keep the body inside the world; resting on the bottom edge counts as
/// floor contact so a level without a stage still has a walkable base.
fn clamp_to_bounds(body: &mut Body, bounds: &WorldBounds) {
    if body.pos.x - body.half_w < 0.0 {
        body.pos.x = body.half_w;
        body.vel.x = 0.0;
    } else if body.pos.x + body.half_w > bounds.width {
        body.pos.x = bounds.width - body.half_w;
        body.vel.x = 0.0;
    }
    if body.pos.y - body.half_h < 0.0 {
        body.pos.y = body.half_h;
        if body.vel.y < 0.0 {
            body.vel.y = 0.0;
        }
    } else if body.pos.y + body.half_h > bounds.height {
        body.pos.y = bounds.height - body.half_h;
        if body.vel.y > 0.0 {
            body.vel.y = 0.0;
        }
        body.on_floor = true;
    }
}
