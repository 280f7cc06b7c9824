//! ECS resources made available to systems.
//!
//! Overview
//! - `cliprng` – random source for clip selection
//! - `containergeometry` – rectangle of the container the pet is attached to
//! - `movement` – global walking switch
//! - `settings` – persisted pet settings and their INI format
//! - `spriteconfig` – sprite definitions and the built-in library
//! - `worldtime` – host timestamp of the frame being run
pub mod cliprng;
pub mod containergeometry;
pub mod movement;
pub mod settings;
pub mod spriteconfig;
pub mod worldtime;
