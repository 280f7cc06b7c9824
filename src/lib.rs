//! Panel pet library.
//!
//! An animated sprite that lives inside a host application's panels: it plays
//! randomly chosen clips from a sprite sheet, walks along the bottom edge of
//! its panel, and can be dragged between panels. The host supplies panels,
//! frame callbacks, pointer capture, image loading and settings storage
//! through the traits in [`host`]; [`controller::PetController`] does the
//! rest.

pub mod components;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod resources;
pub mod systems;
