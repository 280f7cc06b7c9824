//! In-memory host.
//!
//! A self-contained [`Host`](crate::host::Host) that models panels, tab
//! groups, sprite elements, frame requests and pointer captures as plain
//! data. The demo binary drives a pet with it, and the tests use it to check
//! what the controller asked the host to do.

use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::sprite::SpriteFrame;
use crate::events::notice::Notice;
use crate::geometry::Rect;
use crate::host::{
    AssetLoader, ContainerHandle, ContainerId, ElementId, FrameRequest, FrameScheduler,
    LoadRequest, Notifier, PanelIdentity, PointerCapture, PointerInput, SettingsStore, Surface,
    Workspace,
};
use crate::resources::settings::PetSettings;

/// Handle to a panel of a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelRef(String);

impl PanelRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl PanelIdentity for PanelRef {
    fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct MemoryPanel {
    id: String,
    bounds: Rect,
    content: ContainerId,
    group: Option<ContainerId>,
    live: bool,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    panels: Vec<MemoryPanel>,
    groups: FxHashMap<ContainerId, Rect>,
    focused: Option<String>,
    elements: FxHashMap<ElementId, ContainerId>,
    /// Elements that went away with their container and were not removed yet.
    dropped: FxHashSet<ElementId>,
    pending_frames: Vec<FrameRequest>,
    /// Requests handed out by [`MemoryHost::take_frame`].
    fired: FxHashSet<FrameRequest>,
    captures: Vec<PointerCapture>,
    load_requests: Vec<LoadRequest>,
    next_id: u64,
    stray_releases: usize,
    frames_requested: usize,
    /// Last frame handed to [`Surface::present`].
    pub presented: Option<SpriteFrame>,
    pub saved: Option<PetSettings>,
    pub save_count: usize,
    pub notices: Vec<Notice>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn live_panel(&self, id: &str) -> Option<&MemoryPanel> {
        self.panels.iter().find(|p| p.live && p.id == id)
    }

    fn container_rect(&self, container: ContainerId) -> Option<Rect> {
        if let Some(rect) = self.groups.get(&container) {
            return Some(*rect);
        }
        self.panels
            .iter()
            .find(|p| p.live && p.content == container)
            .map(|p| p.bounds)
    }

    /// Add a stand-alone panel whose content region equals its bounds.
    pub fn add_panel(&mut self, id: impl Into<String>, bounds: Rect) -> PanelRef {
        self.insert_panel(id.into(), bounds, None)
    }

    /// Add a tab group and return the id of its content region.
    pub fn add_tab_group(&mut self, content: Rect) -> ContainerId {
        let id = ContainerId(self.next());
        self.groups.insert(id, content);
        id
    }

    pub fn add_panel_in_group(
        &mut self,
        id: impl Into<String>,
        bounds: Rect,
        group: ContainerId,
    ) -> PanelRef {
        self.insert_panel(id.into(), bounds, Some(group))
    }

    fn insert_panel(&mut self, id: String, bounds: Rect, group: Option<ContainerId>) -> PanelRef {
        let content = ContainerId(self.next());
        debug!("Panel '{}' added at {:?}", id, bounds);
        self.panels.push(MemoryPanel {
            id: id.clone(),
            bounds,
            content,
            group,
            live: true,
        });
        PanelRef(id)
    }

    pub fn focus(&mut self, id: impl Into<String>) {
        self.focused = Some(id.into());
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Close a panel. Elements inside it are dropped with it.
    pub fn retire_panel(&mut self, id: &str) {
        let mut gone = Vec::new();
        for panel in self.panels.iter_mut().filter(|p| p.live && p.id == id) {
            panel.live = false;
            gone.push(panel.content);
        }
        self.drop_elements(|parent| gone.contains(&parent));
        info!("Panel '{}' retired", id);
    }

    /// Rebuild a panel's content region, as a host does after re-tiling.
    /// Elements in the old region are orphaned.
    pub fn retile_panel(&mut self, id: &str, bounds: Rect) {
        let fresh = ContainerId(self.next());
        if let Some(panel) = self.panels.iter_mut().find(|p| p.live && p.id == id) {
            let old = panel.content;
            panel.content = fresh;
            panel.bounds = bounds;
            self.drop_elements(|parent| parent == old);
        }
    }

    fn drop_elements(&mut self, doomed: impl Fn(ContainerId) -> bool) {
        let dropped = &mut self.dropped;
        self.elements.retain(|element, parent| {
            if doomed(*parent) {
                dropped.insert(*element);
                false
            } else {
                true
            }
        });
    }

    /// Oldest pending frame request, removed from the queue.
    pub fn take_frame(&mut self) -> Option<FrameRequest> {
        if self.pending_frames.is_empty() {
            return None;
        }
        let request = self.pending_frames.remove(0);
        self.fired.insert(request);
        Some(request)
    }

    pub fn pending_frames(&self) -> &[FrameRequest] {
        &self.pending_frames
    }

    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    pub fn take_load_requests(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.load_requests)
    }

    pub fn load_requests(&self) -> &[LoadRequest] {
        &self.load_requests
    }

    pub fn active_captures(&self) -> usize {
        self.captures.len()
    }

    /// Releases, cancellations and removals of things that were not held.
    ///
    /// Cancelling a request that already fired and removing an element that
    /// went away with its panel are allowed once each.
    pub fn stray_releases(&self) -> usize {
        self.stray_releases
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn element_parent(&self, element: ElementId) -> Option<ContainerId> {
        self.elements.get(&element).copied()
    }
}

impl Workspace for MemoryHost {
    type Panel = PanelRef;

    fn focused_panel(&self) -> Option<PanelRef> {
        let id = self.focused.as_deref()?;
        self.live_panel(id).map(|p| PanelRef(p.id.clone()))
    }

    fn panel_by_id(&self, id: &str) -> Option<PanelRef> {
        self.live_panel(id).map(|p| PanelRef(p.id.clone()))
    }

    fn panels(&self) -> Vec<PanelRef> {
        self.panels
            .iter()
            .filter(|p| p.live)
            .map(|p| PanelRef(p.id.clone()))
            .collect()
    }

    fn panel_bounds(&self, panel: &PanelRef) -> Option<Rect> {
        self.live_panel(panel.id()).map(|p| p.bounds)
    }

    fn panel_content(&self, panel: &PanelRef) -> Option<ContainerHandle> {
        self.live_panel(panel.id()).map(|p| ContainerHandle {
            id: p.content,
            rect: p.bounds,
        })
    }

    fn tab_group_content(&self, panel: &PanelRef) -> Option<ContainerHandle> {
        let group = self.live_panel(panel.id())?.group?;
        self.groups.get(&group).map(|rect| ContainerHandle {
            id: group,
            rect: *rect,
        })
    }
}

impl Surface for MemoryHost {
    fn create_element(
        &mut self,
        parent: ContainerId,
        width: f32,
        height: f32,
    ) -> Option<ElementId> {
        self.container_rect(parent)?;
        let element = ElementId(self.next());
        self.elements.insert(element, parent);
        debug!("Element {:?} ({}x{}) created in {:?}", element, width, height, parent);
        Some(element)
    }

    fn is_attached(&self, element: ElementId, parent: ContainerId) -> bool {
        self.elements.get(&element) == Some(&parent) && self.container_rect(parent).is_some()
    }

    fn remove_element(&mut self, element: ElementId) {
        if self.elements.remove(&element).is_none() && !self.dropped.remove(&element) {
            warn!("Removal of unknown element {:?}", element);
            self.stray_releases += 1;
        }
    }

    fn present(&mut self, element: ElementId, frame: &SpriteFrame) {
        if self.elements.contains_key(&element) {
            self.presented = Some(frame.clone());
        }
    }
}

impl FrameScheduler for MemoryHost {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next());
        if !self.pending_frames.is_empty() {
            warn!("Frame requested while {} still pending", self.pending_frames.len());
        }
        self.pending_frames.push(request);
        self.frames_requested += 1;
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let before = self.pending_frames.len();
        self.pending_frames.retain(|r| *r != request);
        if self.pending_frames.len() != before {
            return;
        }
        if self.fired.remove(&request) {
            debug!("Cancel of already fired {:?}", request);
        } else {
            warn!("Cancel of unknown {:?}", request);
            self.stray_releases += 1;
        }
    }
}

impl PointerInput for MemoryHost {
    fn capture_pointer(&mut self) -> PointerCapture {
        let capture = PointerCapture(self.next());
        self.captures.push(capture);
        capture
    }

    fn release_pointer(&mut self, capture: PointerCapture) {
        let before = self.captures.len();
        self.captures.retain(|c| *c != capture);
        if self.captures.len() == before {
            self.stray_releases += 1;
        }
    }
}

impl AssetLoader for MemoryHost {
    fn load_image(&mut self, request: LoadRequest) {
        debug!("Image requested for '{}' ({:?})", request.sprite, request.ticket);
        self.load_requests.push(request);
    }
}

impl SettingsStore for MemoryHost {
    fn save_settings(&mut self, settings: &PetSettings) {
        self.saved = Some(settings.clone());
        self.save_count += 1;
    }
}

impl Notifier for MemoryHost {
    fn notify(&mut self, notice: Notice) {
        info!("{}", notice);
        self.notices.push(notice);
    }
}
