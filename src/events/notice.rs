//! User-facing notices.
//!
//! The controller emits these through [`crate::host::Notifier`]; the host
//! decides how (or whether) to show them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The pet was switched on. Carries the sprite name.
    Appeared(String),
    /// The pet was switched off, or its panel went away.
    Disappeared(String),
    /// A toggle was requested with no focused panel to put the pet in.
    SelectPanel,
    /// The sprite sheet image could not be loaded.
    AssetFailed { sprite: String, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Appeared(name) => write!(f, "{} appeared.", name),
            Notice::Disappeared(name) => write!(f, "{} disappeared.", name),
            Notice::SelectPanel => write!(f, "Select a pane to toggle."),
            Notice::AssetFailed { sprite, reason } => {
                write!(f, "{} could not be loaded: {}", sprite, reason)
            }
        }
    }
}
