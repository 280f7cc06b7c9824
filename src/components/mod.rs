//! ECS components of the pet entity.
//!
//! Submodules overview:
//! - [`placement`] – position inside the host container, walking and dragging
//! - [`playback`] – active clip, frame index and the frame clock
//! - [`sprite`] – the composed, pixel-snapped frame handed to the host
//! - [`spritesheet`] – clip table and cell geometry of the active sprite

pub mod placement;
pub mod playback;
pub mod sprite;
pub mod spritesheet;
