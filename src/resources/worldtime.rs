use bevy_ecs::prelude::Resource;

/// Timestamp of the render-loop callback being processed.
///
/// `now_ms` is the host's monotonic clock in milliseconds; it is written by
/// [`crate::systems::time::update_world_time`] before the frame schedule runs.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldTime {
    pub now_ms: f64,
    pub frame_count: u64,
}
