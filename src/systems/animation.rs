//! Frame clock system.
//!
//! Advances the pet's [`Playback`] from the current [`WorldTime`] and the
//! rate in its [`SpriteSheet`]. When a clip plays to its end a new one is
//! drawn from [`ClipRng`] and a [`ClipStarted`] message is written.
//!
//! While the pet is being dragged the clock is frozen on the current frame;
//! the phase is held at "now" so dropping the pet does not fast-forward.
//!
//! # Related
//!
//! - [`crate::components::playback::Playback::tick`] – the timing rule itself
//! - [`crate::systems::movement::walk`] – runs right after this system

use bevy_ecs::prelude::*;

use crate::components::placement::Placement;
use crate::components::playback::Playback;
use crate::components::spritesheet::SpriteSheet;
use crate::events::clip::ClipStarted;
use crate::resources::cliprng::ClipRng;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback for every pet.
pub fn frame_clock(
    mut query: Query<(&mut Playback, &SpriteSheet, &Placement)>,
    time: Res<WorldTime>,
    mut rng: ResMut<ClipRng>,
    mut started: MessageWriter<ClipStarted>,
) {
    for (mut playback, sheet, placement) in query.iter_mut() {
        if placement.dragging {
            playback.hold(time.now_ms);
            continue;
        }
        let tick = playback.tick(time.now_ms, sheet.fps, &sheet.clips, &mut rng.0);
        for index in tick.started {
            let clip_id = sheet
                .clip(index)
                .map(|c| c.id.clone())
                .unwrap_or_default();
            started.write(ClipStarted { index, clip_id });
        }
    }
}
