//! Sprite sheet index: the ordered clip list and the cell geometry of a sheet.
//!
//! A clip table is a loosely shaped JSON document. The list of clips may sit
//! under `rows`, `cols` or `columns`, or the document may be the list itself:
//!
//! ```json
//! { "rows": [ { "id": "0", "name": "sitting", "frames": 4, "move": false } ] }
//! ```
//!
//! Parsing never fails. Anything unusable collapses to a single one-frame,
//! non-moving clip so playback always has something to show.

use bevy_ecs::prelude::Component;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::geometry::Rect;
use crate::resources::spriteconfig::SpriteConfig;

/// Keys that may hold the clip list, in lookup order.
const CLIP_LIST_KEYS: [&str; 3] = ["rows", "cols", "columns"];

/// Cell edge used when the cell-size string is missing or invalid.
pub const DEFAULT_CELL_EDGE: u32 = 32;

/// Whether successive frames of a clip run along the sheet's x or y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameAxis {
    /// One clip per row, frames advance to the right.
    #[default]
    Rows,
    /// One clip per column, frames advance downwards.
    Columns,
}

impl FrameAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameAxis::Rows => "rows",
            FrameAxis::Columns => "columns",
        }
    }

    /// Lenient parse; unknown values fall back to [`FrameAxis::Rows`].
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "columns" | "cols" | "column" => FrameAxis::Columns,
            _ => FrameAxis::Rows,
        }
    }
}

/// A named animation sequence in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    pub id: String,
    pub display_name: Option<String>,
    /// Always at least 1.
    pub frame_count: u32,
    /// Clip permits autonomous walking while it plays.
    pub moves_while_active: bool,
}

impl AnimationClip {
    /// The clip used when a table cannot be understood.
    pub fn fallback() -> Self {
        Self {
            id: "0".to_string(),
            display_name: None,
            frame_count: 1,
            moves_while_active: false,
        }
    }
}

/// Clip ids are usually strings, but hand-written tables often use numbers.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum ClipId {
    Text(String),
    Number(i64),
}

/// One record of the clip table as written by users.
#[derive(Deserialize, Debug, Clone)]
struct ClipRecord {
    id: ClipId,
    #[serde(default)]
    name: Option<String>,
    frames: u32,
    #[serde(default, rename = "move")]
    moves: Option<bool>,
}

impl ClipRecord {
    fn into_clip(self) -> Option<AnimationClip> {
        if self.frames == 0 {
            return None;
        }
        let id = match self.id {
            ClipId::Text(s) => s,
            ClipId::Number(n) => n.to_string(),
        };
        Some(AnimationClip {
            id,
            display_name: self.name,
            frame_count: self.frames,
            moves_while_active: self.moves.unwrap_or(false),
        })
    }
}

/// Parse a clip table. Always returns at least one clip.
pub fn parse_clip_table(json: &str) -> Vec<AnimationClip> {
    let document: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            warn!("Clip table is not valid JSON ({}), using a single still frame", e);
            return vec![AnimationClip::fallback()];
        }
    };

    let candidate = CLIP_LIST_KEYS
        .iter()
        .find_map(|key| document.get(*key).filter(|v| v.is_array()))
        .unwrap_or(&document);

    let Some(records) = candidate.as_array() else {
        warn!("Clip table holds no clip list, using a single still frame");
        return vec![AnimationClip::fallback()];
    };

    let clips: Vec<AnimationClip> = records
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            match serde_json::from_value::<ClipRecord>(raw.clone()) {
                Ok(record) => {
                    let clip = record.into_clip();
                    if clip.is_none() {
                        warn!("Clip #{} has zero frames, skipped", i);
                    }
                    clip
                }
                Err(e) => {
                    warn!("Clip #{} is malformed ({}), skipped", i, e);
                    None
                }
            }
        })
        .collect();

    if clips.is_empty() {
        warn!("Clip table has no usable clips, using a single still frame");
        return vec![AnimationClip::fallback()];
    }
    clips
}

/// Parse `"W,H"` or `"W"` into a cell size in sheet pixels.
///
/// Each component is read like a lenient integer parse (leading digits only).
/// A missing or zero width becomes 32; the height falls back to the width.
pub fn parse_cell_size(text: &str) -> (u32, u32) {
    let mut parts = text.split(',').map(leading_uint);
    let width = parts.next().flatten();
    let height = parts.next().flatten();
    let w = width.unwrap_or(DEFAULT_CELL_EDGE);
    let h = height.or(width).unwrap_or(DEFAULT_CELL_EDGE);
    (w, h)
}

fn leading_uint(part: &str) -> Option<u32> {
    let digits: String = part
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|v| *v > 0)
}

/// The parsed, read-only view of a [`SpriteConfig`] used during playback.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub clips: Vec<AnimationClip>,
    pub cell_width: u32,
    pub cell_height: u32,
    pub fps: f32,
    pub scale: u32,
    pub axis: FrameAxis,
}

impl SpriteSheet {
    pub fn from_config(config: &SpriteConfig) -> Self {
        let (cell_width, cell_height) = parse_cell_size(&config.cell_size);
        Self {
            clips: parse_clip_table(&config.clip_table_json),
            cell_width,
            cell_height,
            fps: config.fps,
            scale: config.scale.max(1),
            axis: config.frame_axis,
        }
    }

    pub fn clip(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }

    /// On-screen sprite size: one cell times the pixel scale.
    pub fn display_size(&self) -> (f32, f32) {
        (
            (self.cell_width * self.scale) as f32,
            (self.cell_height * self.scale) as f32,
        )
    }

    /// Sheet region holding `frame` of the clip at `clip_index`.
    pub fn source_rect(&self, clip_index: usize, frame: usize) -> Rect {
        let (w, h) = (self.cell_width as f32, self.cell_height as f32);
        let (col, row) = match self.axis {
            FrameAxis::Rows => (frame, clip_index),
            FrameAxis::Columns => (clip_index, frame),
        };
        Rect::new(col as f32 * w, row as f32 * h, w, h)
    }
}
