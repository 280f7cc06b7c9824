//! Persisted pet settings.
//!
//! Holds the handful of fields the engine reads and writes across restarts,
//! plus the sprite library. Settings are stored in an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [pet]
//! enabled = true
//! persist_on_relaunch = true
//! global_movement = true
//! active_sprite = Kitty
//! active_leaf_id = 5f2c
//!
//! [sprite Kitty]
//! cell_size = 32
//! fps = 6
//! scale = 2
//! frame_axis = rows
//! clips = {"rows":[{"id":"0","frames":4}]}
//! ```
//!
//! Missing values keep their defaults. Built-in sprites are always present in
//! the library; a file section with the same name overrides them.

use configparser::ini::Ini;
use log::{info, warn};
use rustc_hash::FxHashMap;
use std::path::Path;

use crate::components::spritesheet::FrameAxis;
use crate::error::SettingsError;
use crate::resources::spriteconfig::{DEFAULT_SPRITE, SpriteConfig};

const PET_SECTION: &str = "pet";
const SPRITE_SECTION_PREFIX: &str = "sprite ";

/// Settings read and written by the lifecycle controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PetSettings {
    pub enabled: bool,
    /// Keep `enabled` and `active_leaf_id` across host restarts.
    pub persist_on_relaunch: bool,
    /// Master switch for autonomous walking.
    pub global_movement: bool,
    pub active_sprite: String,
    /// Identity of the panel the pet was last bound to.
    pub active_leaf_id: Option<String>,
    pub library: FxHashMap<String, SpriteConfig>,
}

impl Default for PetSettings {
    fn default() -> Self {
        let library = SpriteConfig::builtins()
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Self {
            enabled: false,
            persist_on_relaunch: false,
            global_movement: true,
            active_sprite: DEFAULT_SPRITE.to_string(),
            active_leaf_id: None,
            library,
        }
    }
}

impl PetSettings {
    /// Configuration for `key`, or the default sprite when it is unknown.
    pub fn sprite_config(&self, key: &str) -> SpriteConfig {
        match self.library.get(key) {
            Some(config) => config.clone(),
            None => {
                warn!("Sprite '{}' not in library, using {}", key, DEFAULT_SPRITE);
                self.library
                    .get(DEFAULT_SPRITE)
                    .cloned()
                    .unwrap_or_else(SpriteConfig::kitty)
            }
        }
    }

    pub fn active_config(&self) -> SpriteConfig {
        self.sprite_config(&self.active_sprite)
    }

    /// Applied once at host startup: without persistence the pet starts
    /// disabled and unbound.
    pub fn apply_launch_policy(&mut self) {
        if !self.persist_on_relaunch {
            self.enabled = false;
            self.active_leaf_id = None;
        }
    }

    /// Clear the enabled flag and the bound panel together.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.active_leaf_id = None;
    }

    /// Load settings from an INI file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let mut ini = Ini::new_cs();
        ini.load(path).map_err(SettingsError::Read)?;
        let settings = Self::from_ini(&ini);
        info!(
            "Loaded settings from {:?}: sprite={}, enabled={}, {} sprites",
            path,
            settings.active_sprite,
            settings.enabled,
            settings.library.len()
        );
        Ok(settings)
    }

    /// Save settings to an INI file, creating it if needed.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        self.to_ini().write(path)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn from_ini_str(text: &str) -> Result<Self, SettingsError> {
        let mut ini = Ini::new_cs();
        ini.read(text.to_string()).map_err(SettingsError::Read)?;
        Ok(Self::from_ini(&ini))
    }

    pub fn to_ini_string(&self) -> String {
        self.to_ini().writes()
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut settings = Self::default();

        if let Some(v) = ini.getbool(PET_SECTION, "enabled").ok().flatten() {
            settings.enabled = v;
        }
        if let Some(v) = ini.getbool(PET_SECTION, "persist_on_relaunch").ok().flatten() {
            settings.persist_on_relaunch = v;
        }
        if let Some(v) = ini.getbool(PET_SECTION, "global_movement").ok().flatten() {
            settings.global_movement = v;
        }
        if let Some(v) = non_empty(ini.get(PET_SECTION, "active_sprite")) {
            settings.active_sprite = v;
        }
        settings.active_leaf_id = non_empty(ini.get(PET_SECTION, "active_leaf_id"));

        for section in ini.sections() {
            let Some(name) = section.strip_prefix(SPRITE_SECTION_PREFIX) else {
                continue;
            };
            let name = name.trim().to_string();
            let mut config = settings
                .library
                .get(&name)
                .cloned()
                .unwrap_or_else(|| SpriteConfig {
                    name: name.clone(),
                    ..SpriteConfig::kitty()
                });
            read_sprite_section(ini, &section, &mut config);
            settings.library.insert(name, config);
        }

        settings
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new_cs();
        ini.set(PET_SECTION, "enabled", Some(self.enabled.to_string()));
        ini.set(
            PET_SECTION,
            "persist_on_relaunch",
            Some(self.persist_on_relaunch.to_string()),
        );
        ini.set(
            PET_SECTION,
            "global_movement",
            Some(self.global_movement.to_string()),
        );
        ini.set(PET_SECTION, "active_sprite", Some(self.active_sprite.clone()));
        if let Some(id) = &self.active_leaf_id {
            ini.set(PET_SECTION, "active_leaf_id", Some(id.clone()));
        }

        let mut names: Vec<&String> = self.library.keys().collect();
        names.sort();
        for name in names {
            let config = &self.library[name];
            let section = format!("{}{}", SPRITE_SECTION_PREFIX, name);
            if let Some(path) = &config.image_path {
                ini.set(&section, "image_path", Some(path.clone()));
            }
            ini.set(&section, "cell_size", Some(config.cell_size.clone()));
            ini.set(&section, "fps", Some(config.fps.to_string()));
            ini.set(&section, "scale", Some(config.scale.to_string()));
            ini.set(&section, "frame_axis", Some(config.frame_axis.as_str().to_string()));
            ini.set(&section, "clips", Some(compact_json(&config.clip_table_json)));
        }
        ini
    }
}

fn read_sprite_section(ini: &Ini, section: &str, config: &mut SpriteConfig) {
    if let Some(path) = non_empty(ini.get(section, "image_path")) {
        config.image_path = Some(path);
    }
    if let Some(size) = non_empty(ini.get(section, "cell_size")) {
        config.cell_size = size;
    }
    match ini.getfloat(section, "fps") {
        Ok(Some(fps)) if fps > 0.0 => config.fps = fps as f32,
        Ok(Some(fps)) => warn!("[{}] fps must be positive, got {}", section, fps),
        Ok(None) => {}
        Err(e) => warn!("[{}] invalid fps: {}", section, e),
    }
    match ini.getuint(section, "scale") {
        Ok(Some(scale)) if scale >= 1 => config.scale = scale as u32,
        Ok(Some(_)) => warn!("[{}] scale must be at least 1", section),
        Ok(None) => {}
        Err(e) => warn!("[{}] invalid scale: {}", section, e),
    }
    if let Some(axis) = non_empty(ini.get(section, "frame_axis")) {
        config.frame_axis = FrameAxis::parse(&axis);
    }
    if let Some(clips) = non_empty(ini.get(section, "clips")) {
        config.clip_table_json = clips;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// INI values are single-line; re-serialize valid JSON compactly and leave
/// anything else as a single line so a broken table survives a round-trip.
fn compact_json(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(v) => v.to_string(),
        Err(_) => text.lines().map(str::trim).collect::<Vec<_>>().join(" "),
    }
}
