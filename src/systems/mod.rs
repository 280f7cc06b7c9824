//! Per-frame systems.
//!
//! Submodules overview
//! - [`animation`] – advance the frame clock and pick new clips
//! - [`movement`] – autonomous walking along the container floor
//! - [`render`] – compose the sprite frame for the host
//! - [`time`] – update the world time from the host timestamp

pub mod animation;
pub mod movement;
pub mod render;
pub mod time;

use bevy_ecs::prelude::*;

/// The schedule run once per frame callback.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            animation::frame_clock,
            movement::walk,
            render::render_frame,
        )
            .chain(),
    );
    schedule
}
