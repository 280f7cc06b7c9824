//! Sprite configuration and the built-in sprite library.

use serde_json::json;

use crate::components::spritesheet::FrameAxis;

/// Name of the sprite used whenever a requested key is unknown.
pub const DEFAULT_SPRITE: &str = "Kitty";

/// Everything needed to play one sprite sheet.
///
/// Replaced wholesale on reconfiguration; never mutated while a session runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteConfig {
    pub name: String,
    /// Sheet image relative to the host's asset directory. `None` uses the
    /// embedded image registered under `name`.
    pub image_path: Option<String>,
    /// `"W,H"` or `"W"`, in sheet pixels.
    pub cell_size: String,
    pub fps: f32,
    pub scale: u32,
    pub frame_axis: FrameAxis,
    pub clip_table_json: String,
}

impl SpriteConfig {
    pub fn kitty() -> Self {
        let clips = json!({
            "rows": [
                { "id": "0", "name": "sitting", "frames": 4, "move": false },
                { "id": "1", "name": "looking", "frames": 4, "move": false },
                { "id": "2", "name": "licking", "frames": 4, "move": false },
                { "id": "3", "name": "cleaning_ears", "frames": 4, "move": false },
                { "id": "4", "name": "running", "frames": 8, "move": true },
                { "id": "5", "name": "zoomies", "frames": 8, "move": true },
                { "id": "6", "name": "sleep", "frames": 4, "move": false },
                { "id": "7", "name": "cautious", "frames": 6, "move": false },
                { "id": "8", "name": "pounce", "frames": 7, "move": false },
                { "id": "9", "name": "scaredy_cat", "frames": 8, "move": false }
            ]
        });
        Self {
            name: DEFAULT_SPRITE.to_string(),
            image_path: None,
            cell_size: "32".to_string(),
            fps: 6.0,
            scale: 2,
            frame_axis: FrameAxis::Rows,
            clip_table_json: clips.to_string(),
        }
    }

    pub fn maneki_neko() -> Self {
        let clips = json!({
            "rows": [ { "id": "lucky", "frames": 1, "move": false } ]
        });
        Self {
            name: "Maneki Neko".to_string(),
            image_path: None,
            cell_size: "16".to_string(),
            fps: 1.0,
            scale: 2,
            frame_axis: FrameAxis::Rows,
            clip_table_json: clips.to_string(),
        }
    }

    /// Sprites shipped with the crate.
    pub fn builtins() -> Vec<SpriteConfig> {
        vec![Self::kitty(), Self::maneki_neko()]
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self::kitty()
    }
}
