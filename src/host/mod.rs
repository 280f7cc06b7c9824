//! Contracts with the host application.
//!
//! The engine never touches the host's concrete objects. Everything it needs
//! (panel lookup and geometry, a place to put the sprite, a frame scheduler,
//! pointer capture, image loading, settings persistence, notices) comes
//! through the traits in this module. [`Host`] bundles them and is
//! implemented automatically for any type that implements all of them.
//!
//! Submodules:
//! - [`locator`] – hit-testing and host-container resolution over a [`Workspace`]
//! - [`session`] – the scoped frame request / pointer capture owned by a running pet
//! - [`loader`] – a threaded image loader for hosts that read sheets from disk
//! - [`memory`] – a complete in-memory host used by the demo binary and tests

pub mod loader;
pub mod locator;
pub mod memory;
pub mod session;

use std::fmt::Debug;
use std::path::PathBuf;

use crate::components::sprite::SpriteFrame;
use crate::events::notice::Notice;
use crate::geometry::Rect;
use crate::resources::settings::PetSettings;

/// Anything that can name a panel.
pub trait PanelIdentity {
    fn id(&self) -> &str;
}

/// Opaque id of a host region the sprite can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u64);

/// Opaque id of the element the sprite is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// A pending display-synchronised callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// A window-level pointer capture (move + up listeners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerCapture(pub u64);

/// Identifies one image load so late completions can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// A container and its current screen-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerHandle {
    pub id: ContainerId,
    pub rect: Rect,
}

/// What to load for a sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub sprite: String,
    /// User-supplied sheet path. When missing or unreadable, the host should
    /// use its embedded sheet for `sprite`, then the default sheet.
    pub path: Option<PathBuf>,
}

/// Where a loaded sheet came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    File { path: PathBuf, byte_len: usize },
    /// A sheet bundled with the host, by sprite name.
    Embedded(String),
}

/// A loaded sprite sheet, as far as the engine cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub sprite: String,
    pub origin: ImageOrigin,
}

/// Panel queries.
///
/// Panels may be retired at any time; every query on a stale panel returns
/// `None` rather than failing.
pub trait Workspace {
    type Panel: PanelIdentity + Clone + PartialEq + Debug;

    fn focused_panel(&self) -> Option<Self::Panel>;
    fn panel_by_id(&self, id: &str) -> Option<Self::Panel>;
    /// Live panels in paint order (last is topmost).
    fn panels(&self) -> Vec<Self::Panel>;
    /// Screen-space bounds of the whole panel.
    fn panel_bounds(&self, panel: &Self::Panel) -> Option<Rect>;
    /// The panel's own content region.
    fn panel_content(&self, panel: &Self::Panel) -> Option<ContainerHandle>;
    /// The content region of the tab group holding the panel, if any.
    fn tab_group_content(&self, panel: &Self::Panel) -> Option<ContainerHandle>;
}

/// Where the sprite is drawn.
pub trait Surface {
    /// Create a sprite element of the given size inside `parent`.
    fn create_element(&mut self, parent: ContainerId, width: f32, height: f32)
    -> Option<ElementId>;
    /// True while `element` is still a descendant of `parent`.
    fn is_attached(&self, element: ElementId, parent: ContainerId) -> bool;
    fn remove_element(&mut self, element: ElementId);
    fn present(&mut self, element: ElementId, frame: &SpriteFrame);
}

/// The display-synchronised callback scheduler.
///
/// The host later calls
/// [`PetController::on_frame`](crate::controller::PetController::on_frame)
/// with the returned request.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Window-level pointer listeners used while dragging.
pub trait PointerInput {
    fn capture_pointer(&mut self) -> PointerCapture;
    fn release_pointer(&mut self, capture: PointerCapture);
}

/// Asynchronous image loading.
///
/// Completion is reported through
/// [`PetController::image_loaded`](crate::controller::PetController::image_loaded).
pub trait AssetLoader {
    fn load_image(&mut self, request: LoadRequest);
}

pub trait SettingsStore {
    fn save_settings(&mut self, settings: &PetSettings);
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Everything the controller needs from its host.
pub trait Host:
    Workspace + Surface + FrameScheduler + PointerInput + AssetLoader + SettingsStore + Notifier
{
}

impl<T> Host for T where
    T: Workspace + Surface + FrameScheduler + PointerInput + AssetLoader + SettingsStore + Notifier
{
}
