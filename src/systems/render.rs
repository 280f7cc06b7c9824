//! Render output system.
//!
//! Composes the pixel-snapped [`SpriteFrame`] from placement and playback.
//! The controller reads it after the schedule and hands it to the host; this
//! system never talks to the host itself.

use bevy_ecs::prelude::*;

use crate::components::placement::Placement;
use crate::components::playback::Playback;
use crate::components::sprite::SpriteFrame;
use crate::components::spritesheet::SpriteSheet;

pub fn render_frame(mut query: Query<(&Placement, &Playback, &SpriteSheet, &mut SpriteFrame)>) {
    for (placement, playback, sheet, mut frame) in query.iter_mut() {
        frame.set_if_neq(SpriteFrame::compose(placement, playback, sheet));
    }
}
