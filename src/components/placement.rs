//! Position of the pet inside its host container.
//!
//! Coordinates are relative to the content box of the container the pet is
//! attached to. Two paths mutate a [`Placement`]: the autonomous walk driven
//! by the frame loop, and pointer dragging. The `dragging` flag keeps them
//! apart; walking is a no-op while it is set.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Rect;

/// Gap kept between the sprite and the container edges so it never sits
/// exactly on a boundary.
pub const EDGE_BUFFER: f32 = 1.0;

/// Pixels per tick while walking.
pub const DEFAULT_VELOCITY: f32 = 1.0;

/// Horizontal start position of a fresh placement.
pub const DEFAULT_X: f32 = 50.0;

/// Vertical position: resting on the container floor, or at an explicit top
/// offset while being carried.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Vertical {
    #[default]
    Floor,
    At(f32),
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: Vertical,
    pub moving_right: bool,
    pub dragging: bool,
    pub velocity: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: DEFAULT_X,
            y: Vertical::Floor,
            moving_right: true,
            dragging: false,
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// Clamp `value` into `[EDGE_BUFFER, extent - sprite - EDGE_BUFFER]`. When the
/// container is too small for the sprite the lower bound wins.
fn clamp_axis(value: f32, extent: f32, sprite: f32) -> f32 {
    let max = extent - sprite - EDGE_BUFFER;
    if max < EDGE_BUFFER {
        return EDGE_BUFFER;
    }
    value.clamp(EDGE_BUFFER, max)
}

impl Placement {
    /// One step of autonomous walking. Returns true when the pet turned.
    ///
    /// Callers decide whether walking is allowed; this only refuses while a
    /// drag is in progress.
    pub fn walk(&mut self, container_width: f32, sprite_width: f32) -> bool {
        if self.dragging {
            return false;
        }
        let min = EDGE_BUFFER;
        let max = (container_width - sprite_width - EDGE_BUFFER).max(min);
        let step = if self.moving_right {
            self.velocity
        } else {
            -self.velocity
        };
        self.x = (self.x + step).clamp(min, max);

        if self.moving_right && self.x >= max {
            self.moving_right = false;
            true
        } else if !self.moving_right && self.x <= min {
            self.moving_right = true;
            true
        } else {
            false
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Centre the sprite on `pointer` (screen space) inside `container`.
    pub fn drag_to(&mut self, pointer: Vec2, container: &Rect, sprite: Vec2) {
        let local = pointer - container.origin - sprite * 0.5;
        self.x = clamp_axis(local.x, container.width(), sprite.x);
        self.y = Vertical::At(clamp_axis(local.y, container.height(), sprite.y));
    }

    /// Re-express the position relative to `to` so that the sprite keeps its
    /// screen position when it moves out of `from`.
    pub fn migrate(&mut self, from: &Rect, to: &Rect, sprite_height: f32) {
        let delta = from.origin - to.origin;
        self.x += delta.x;
        let top = match self.y {
            Vertical::Floor => from.height() - sprite_height,
            Vertical::At(y) => y,
        };
        self.y = Vertical::At(top + delta.y);
    }

    /// Drop the sprite: it always falls back to the floor.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.y = Vertical::Floor;
    }

    /// Screen-space top-left of the sprite when attached to `container`.
    pub fn screen_position(&self, container: &Rect, sprite_height: f32) -> Vec2 {
        let top = match self.y {
            Vertical::Floor => container.height() - sprite_height,
            Vertical::At(y) => y,
        };
        container.origin + Vec2::new(self.x, top)
    }
}
