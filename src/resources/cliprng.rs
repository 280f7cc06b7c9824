//! Random source for clip selection.
//!
//! Kept as a resource so tests and the demo binary can seed it.

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

#[derive(Resource, Debug, Clone)]
pub struct ClipRng(pub Rng);

impl ClipRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(Rng::with_seed(seed))
    }
}

impl Default for ClipRng {
    fn default() -> Self {
        Self(Rng::new())
    }
}
