use bevy_ecs::prelude::Component;

use crate::components::placement::{Placement, Vertical};
use crate::components::playback::Playback;
use crate::components::spritesheet::SpriteSheet;
use crate::geometry::Rect;

/// Vertical offset handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalOffset {
    /// Distance from the container's bottom edge.
    Bottom(f32),
    /// Distance from the container's top edge.
    Top(f32),
}

impl Default for VerticalOffset {
    fn default() -> Self {
        VerticalOffset::Bottom(0.0)
    }
}

/// Everything the host needs to draw the pet for one frame.
///
/// Offsets are snapped to the pixel scale so upscaled pixel art stays on the
/// integer grid. `flip_h` mirrors the sprite when it walks left. `source` is
/// the sheet cell to blit into a `width` x `height` box.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct SpriteFrame {
    pub left: f32,
    pub vertical: VerticalOffset,
    pub flip_h: bool,
    pub source: Rect,
    pub width: f32,
    pub height: f32,
}

fn snap(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

impl SpriteFrame {
    pub fn compose(placement: &Placement, playback: &Playback, sheet: &SpriteSheet) -> Self {
        let step = sheet.scale.max(1) as f32;
        let vertical = match placement.y {
            Vertical::Floor => VerticalOffset::Bottom(0.0),
            Vertical::At(y) => VerticalOffset::Top(snap(y, step)),
        };
        let (width, height) = sheet.display_size();
        Self {
            left: snap(placement.x, step),
            vertical,
            flip_h: !placement.moving_right,
            source: sheet.source_rect(playback.active_clip.unwrap_or(0), playback.frame_index),
            width,
            height,
        }
    }
}
