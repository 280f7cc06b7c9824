//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per render-loop callback.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Record the host timestamp (milliseconds) for the frame about to run.
pub fn update_world_time(world: &mut World, now_ms: f64) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.now_ms = now_ms;
    wt.frame_count += 1;
}
