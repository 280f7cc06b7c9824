//! Geometry of the container the pet is currently attached to.
//!
//! Refreshed by the controller on every frame from the host, so walking uses
//! the live width even when the host resizes or re-tiles its panels.

use bevy_ecs::prelude::Resource;

use crate::geometry::Rect;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerGeometry {
    /// `None` while unattached.
    pub rect: Option<Rect>,
}

impl ContainerGeometry {
    pub fn width(&self) -> Option<f32> {
        self.rect.map(|r| r.width())
    }
}
