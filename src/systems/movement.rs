//! Autonomous walking.
//!
//! The pet walks only when all of these hold: global movement is enabled,
//! the active clip is flagged as moving, the pet is attached to a container,
//! and no drag is in progress.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::placement::Placement;
use crate::components::playback::Playback;
use crate::components::spritesheet::SpriteSheet;
use crate::resources::containergeometry::ContainerGeometry;
use crate::resources::movement::MovementSettings;

pub fn walk(
    mut query: Query<(&mut Placement, &Playback, &SpriteSheet)>,
    geometry: Res<ContainerGeometry>,
    movement: Res<MovementSettings>,
) {
    if !movement.enabled {
        return;
    }
    let Some(width) = geometry.width() else {
        return;
    };
    for (mut placement, playback, sheet) in query.iter_mut() {
        if placement.dragging {
            continue;
        }
        let moves = playback
            .active_clip
            .and_then(|i| sheet.clip(i))
            .is_some_and(|clip| clip.moves_while_active);
        if !moves {
            continue;
        }
        let (sprite_width, _) = sheet.display_size();
        if placement.walk(width, sprite_width) {
            debug!(
                "Pet turned at x={} (now moving {})",
                placement.x,
                if placement.moving_right { "right" } else { "left" }
            );
        }
    }
}
