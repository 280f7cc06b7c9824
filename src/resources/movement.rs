use bevy_ecs::prelude::Resource;

/// Global walking switch mirrored from
/// [`PetSettings::global_movement`](crate::resources::settings::PetSettings).
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementSettings {
    pub enabled: bool,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
