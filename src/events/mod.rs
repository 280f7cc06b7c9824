//! Messages and notices.
//!
//! Submodules:
//! - [`clip`] – written by the frame clock when a new clip starts
//! - [`notice`] – short user-facing messages handed to the host
pub mod clip;
pub mod notice;
