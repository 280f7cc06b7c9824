//! Lifecycle controller.
//!
//! [`PetController`] is the one object a host talks to. It owns the ECS world
//! holding the pet entity, the per-frame schedule, the binding to a host
//! container, and the running [`Session`].
//!
//! # States
//!
//! - [`LifecycleState::Disabled`] – nothing attached, nothing scheduled.
//! - [`LifecycleState::EnabledUnbound`] – enabled, but no panel to live in,
//!   or torn down by [`PetController::deactivate`] with the enabled flag
//!   still set.
//! - [`LifecycleState::EnabledBound`] – bound to a panel. The sheet image is
//!   requested on entry; once it arrives the pet is attached and the frame
//!   loop starts.
//!
//! # Frame loop
//!
//! Each [`PetController::on_frame`] call:
//! 1. re-resolves the host container and re-attaches if the host moved or
//!    rebuilt it,
//! 2. updates [`WorldTime`] and [`ContainerGeometry`],
//! 3. runs [`frame_schedule`] (`frame_clock` → `walk` → `render_frame`),
//! 4. presents the resulting [`SpriteFrame`],
//! 5. requests the next frame.
//!
//! Pointer callbacks mutate placement directly and present immediately.

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info, warn};

use crate::components::placement::Placement;
use crate::components::playback::Playback;
use crate::components::sprite::SpriteFrame;
use crate::components::spritesheet::SpriteSheet;
use crate::error::AssetError;
use crate::events::clip::ClipStarted;
use crate::events::notice::Notice;
use crate::host::locator::{host_container_for, panel_at};
use crate::host::session::Session;
use crate::host::{
    ContainerHandle, ElementId, FrameRequest, Host, LoadRequest, LoadTicket, PanelIdentity,
    SpriteImage,
};
use crate::resources::cliprng::ClipRng;
use crate::resources::containergeometry::ContainerGeometry;
use crate::resources::movement::MovementSettings;
use crate::resources::settings::PetSettings;
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::frame_schedule;
use crate::systems::time::update_world_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disabled,
    EnabledUnbound,
    EnabledBound,
}

/// The sprite element currently placed in the host.
#[derive(Debug, Clone, Copy)]
struct HostBinding {
    container: ContainerHandle,
    element: ElementId,
}

pub struct PetController<H: Host> {
    host: H,
    settings: PetSettings,
    world: World,
    schedule: Schedule,
    pet: Entity,
    state: LifecycleState,
    target: Option<H::Panel>,
    binding: Option<HostBinding>,
    session: Option<Session>,
    pending_load: Option<LoadTicket>,
    next_ticket: u64,
}

impl<H: Host> PetController<H> {
    /// Create a controller. `settings` are as loaded from storage; the
    /// relaunch policy is applied here.
    pub fn new(host: H, settings: PetSettings) -> Self {
        Self::with_rng(host, settings, ClipRng::default())
    }

    pub fn with_rng(host: H, mut settings: PetSettings, rng: ClipRng) -> Self {
        settings.apply_launch_policy();

        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(rng);
        world.insert_resource(ContainerGeometry::default());
        world.insert_resource(MovementSettings {
            enabled: settings.global_movement,
        });
        world.init_resource::<Messages<ClipStarted>>();
        let pet = world
            .spawn((
                Placement::default(),
                Playback::default(),
                SpriteSheet::from_config(&SpriteConfig::default()),
                SpriteFrame::default(),
            ))
            .id();

        Self {
            host,
            settings,
            world,
            schedule: frame_schedule(),
            pet,
            state: LifecycleState::Disabled,
            target: None,
            binding: None,
            session: None,
            pending_load: None,
            next_ticket: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn settings(&self) -> &PetSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn target(&self) -> Option<&H::Panel> {
        self.target.as_ref()
    }

    /// True while the frame loop is live.
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// True while a frame callback is outstanding.
    pub fn has_scheduled_frame(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.has_pending_frame())
    }

    /// True between an image request and its completion.
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn attached_element(&self) -> Option<ElementId> {
        self.binding.map(|b| b.element)
    }

    pub fn container(&self) -> Option<ContainerHandle> {
        self.binding.map(|b| b.container)
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.world.get::<Placement>(self.pet)
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.world.get::<Playback>(self.pet)
    }

    pub fn sprite_sheet(&self) -> Option<&SpriteSheet> {
        self.world.get::<SpriteSheet>(self.pet)
    }

    pub fn sprite_frame(&self) -> Option<&SpriteFrame> {
        self.world.get::<SpriteFrame>(self.pet)
    }

    /// Frame callbacks run since the controller was built.
    pub fn frames_run(&self) -> u64 {
        self.world.resource::<WorldTime>().frame_count
    }

    pub fn is_dragging(&self) -> bool {
        self.placement().is_some_and(|p| p.dragging)
    }

    fn display_size(&self) -> (f32, f32) {
        self.sprite_sheet()
            .map(|s| s.display_size())
            .unwrap_or((0.0, 0.0))
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    /// Bring the pet back after a host restart, if it was left enabled.
    pub fn initialize_from_save(&mut self) {
        if !self.settings.enabled {
            debug!("Pet disabled, nothing to restore");
            return;
        }
        self.activate(None);
    }

    /// (Re)start the pet.
    ///
    /// The panel is taken from, in order: `panel`, the current target if it
    /// is still live, the saved panel id, the focused panel. Without any,
    /// the pet stays enabled but unbound.
    pub fn activate(&mut self, panel: Option<H::Panel>) {
        self.deactivate();
        if !self.settings.enabled {
            return;
        }

        let target = panel
            .or_else(|| {
                self.target
                    .take()
                    .filter(|t| self.host.panel_by_id(t.id()).is_some())
            })
            .or_else(|| {
                self.settings
                    .active_leaf_id
                    .as_deref()
                    .and_then(|id| self.host.panel_by_id(id))
            })
            .or_else(|| self.host.focused_panel());
        self.target = target;

        let config = self.settings.active_config();
        let sheet = SpriteSheet::from_config(&config);
        info!(
            "Activating '{}' ({} clips, {}x{} cells, {} fps)",
            config.name,
            sheet.clips.len(),
            sheet.cell_width,
            sheet.cell_height,
            sheet.fps
        );
        self.world
            .entity_mut(self.pet)
            .insert((sheet, Playback::default(), SpriteFrame::default()));
        self.world.resource_mut::<MovementSettings>().enabled = self.settings.global_movement;

        let Some(panel) = &self.target else {
            info!("No panel available, pet stays unbound");
            self.state = LifecycleState::EnabledUnbound;
            return;
        };
        debug!("Pet bound to panel '{}'", panel.id());
        self.state = LifecycleState::EnabledBound;

        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.pending_load = Some(ticket);
        self.host.load_image(LoadRequest {
            ticket,
            sprite: config.name,
            path: config.image_path.map(PathBuf::from),
        });
    }

    /// Completion of an image request.
    ///
    /// Completions for a ticket other than the pending one (superseded or
    /// torn down since) are ignored.
    pub fn image_loaded(&mut self, ticket: LoadTicket, result: Result<SpriteImage, AssetError>) {
        if self.pending_load != Some(ticket) {
            debug!("Ignoring stale image completion {:?}", ticket);
            return;
        }
        self.pending_load = None;

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                warn!("Sprite sheet failed to load, pet stays hidden: {}", e);
                self.host.notify(Notice::AssetFailed {
                    sprite: self.settings.active_sprite.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        };
        debug!("Sheet ready for '{}' ({:?})", image.sprite, image.origin);

        self.pick_first_clip();
        self.reattach();
        self.render_now();
        self.session = Some(Session::start(&mut self.host));
    }

    /// Stop the loop and take the pet out of the host. Safe to repeat.
    pub fn deactivate(&mut self) {
        let mut released = false;
        if let Some(mut session) = self.session.take() {
            session.release(&mut self.host);
            released = true;
        }
        if let Some(binding) = self.binding.take() {
            self.host.remove_element(binding.element);
            released = true;
        }
        self.pending_load = None;
        if let Some(mut placement) = self.world.get_mut::<Placement>(self.pet) {
            if placement.dragging {
                placement.end_drag();
            }
        }
        self.world.resource_mut::<ContainerGeometry>().rect = None;
        self.state = if self.settings.enabled {
            LifecycleState::EnabledUnbound
        } else {
            LifecycleState::Disabled
        };
        if released {
            info!("Pet deactivated");
        }
    }

    fn pick_first_clip(&mut self) {
        let clip_count = self.sprite_sheet().map_or(0, |s| s.clips.len());
        let pet = self.pet;
        self.world.resource_scope(|world, mut rng: Mut<ClipRng>| {
            if let Some(mut playback) = world.get_mut::<Playback>(pet) {
                playback.pick_clip(clip_count, &mut rng.0);
            }
        });
    }

    /// Make sure the sprite element lives in the target panel's container,
    /// recreating it when the container changed or lost it. Returns false
    /// when the container cannot be resolved right now.
    fn reattach(&mut self) -> bool {
        let Some(panel) = &self.target else {
            return false;
        };
        let Some(container) = host_container_for(&self.host, panel) else {
            debug!("No container for panel '{}' yet", panel.id());
            return false;
        };

        if let Some(binding) = &mut self.binding {
            if binding.container.id == container.id
                && self.host.is_attached(binding.element, container.id)
            {
                binding.container = container;
                self.world.resource_mut::<ContainerGeometry>().rect = Some(container.rect);
                return true;
            }
        }

        if let Some(old) = self.binding.take() {
            debug!("Container changed, recreating element");
            self.host.remove_element(old.element);
        }
        let (width, height) = self.display_size();
        let Some(element) = self.host.create_element(container.id, width, height) else {
            debug!("Host refused an element in {:?}", container.id);
            return false;
        };
        info!("Pet attached in {:?}", container.id);
        self.binding = Some(HostBinding { container, element });
        self.world.resource_mut::<ContainerGeometry>().rect = Some(container.rect);
        true
    }

    // ------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------

    /// Display-synchronised callback. Only the pending request is honoured.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) {
        let Some(session) = self.session.as_mut() else {
            debug!("Frame {:?} after teardown, ignored", request);
            return;
        };
        if !session.frame_fired(request) {
            debug!("Frame {:?} is not the pending one, ignored", request);
            return;
        }

        self.reattach();
        update_world_time(&mut self.world, timestamp_ms);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();

        for started in self.world.resource_mut::<Messages<ClipStarted>>().drain() {
            debug!("Clip '{}' started (#{})", started.clip_id, started.index);
        }

        self.present();
        if let Some(session) = self.session.as_mut() {
            session.schedule_next(&mut self.host);
        }
    }

    fn present(&mut self) {
        let Some(binding) = self.binding else {
            return;
        };
        if let Some(frame) = self.world.get::<SpriteFrame>(self.pet) {
            self.host.present(binding.element, frame);
        }
    }

    /// Compose and present outside the schedule, for pointer feedback.
    fn render_now(&mut self) {
        let frame = match (self.placement(), self.playback(), self.sprite_sheet()) {
            (Some(placement), Some(playback), Some(sheet)) => {
                SpriteFrame::compose(placement, playback, sheet)
            }
            _ => return,
        };
        self.world.entity_mut(self.pet).insert(frame);
        self.present();
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Pointer pressed on the sprite element.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if self.binding.is_none() {
            return;
        }
        session.capture_pointer(&mut self.host);
        if let Some(mut placement) = self.world.get_mut::<Placement>(self.pet) {
            placement.begin_drag();
        }
        debug!("Drag started at ({}, {})", x, y);
        self.drag_to(Vec2::new(x, y));
    }

    /// Pointer moved while captured.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.is_dragging() {
            return;
        }
        let point = Vec2::new(x, y);
        if let Some(panel) = panel_at(&self.host, point) {
            if self.target.as_ref() != Some(&panel) {
                self.switch_panel(panel);
            }
        }
        self.drag_to(point);
    }

    /// Pointer released: drop the pet and remember its panel.
    pub fn pointer_up(&mut self) {
        if !self.is_dragging() {
            return;
        }
        if let Some(mut placement) = self.world.get_mut::<Placement>(self.pet) {
            placement.end_drag();
        }
        if let Some(session) = self.session.as_mut() {
            session.release_pointer(&mut self.host);
        }
        self.render_now();
        self.persist_target();
        debug!("Drag ended");
    }

    fn switch_panel(&mut self, panel: H::Panel) {
        let Some(to) = host_container_for(&self.host, &panel) else {
            return;
        };
        info!("Pet carried into panel '{}'", panel.id());
        let from = self.binding.map(|b| b.container.rect);
        self.target = Some(panel);
        if let Some(from) = from {
            let (_, height) = self.display_size();
            if let Some(mut placement) = self.world.get_mut::<Placement>(self.pet) {
                placement.migrate(&from, &to.rect, height);
            }
        }
        self.reattach();
    }

    fn drag_to(&mut self, point: Vec2) {
        let Some(binding) = self.binding else {
            return;
        };
        let (width, height) = self.display_size();
        if let Some(mut placement) = self.world.get_mut::<Placement>(self.pet) {
            placement.drag_to(point, &binding.container.rect, Vec2::new(width, height));
        }
        self.render_now();
    }

    fn persist_target(&mut self) {
        let Some(panel) = &self.target else {
            return;
        };
        let id = panel.id();
        if id.is_empty() {
            return;
        }
        self.settings.active_leaf_id = Some(id.to_string());
        self.host.save_settings(&self.settings);
    }

    // ------------------------------------------------------------------
    // Host notifications and commands
    // ------------------------------------------------------------------

    /// The host closed a panel. If it was ours the pet is switched off for
    /// good; a destroyed panel is never looked up again.
    pub fn panel_destroyed(&mut self, panel_id: &str) {
        let saved = self.settings.active_leaf_id.as_deref() == Some(panel_id);
        let bound = self.target.as_ref().is_some_and(|t| t.id() == panel_id);
        if !saved && !bound {
            return;
        }
        if self.settings.enabled {
            info!("Bound panel '{}' destroyed", panel_id);
            self.disappear();
        } else {
            self.target = None;
        }
    }

    /// The host rearranged its panels. A saved panel that no longer resolves
    /// is treated like a destroyed one.
    pub fn layout_changed(&mut self) {
        if !self.settings.enabled {
            return;
        }
        let Some(id) = self.settings.active_leaf_id.as_deref() else {
            return;
        };
        if self.host.panel_by_id(id).is_none() {
            info!("Saved panel '{}' vanished from the layout", id);
            self.disappear();
        }
    }

    fn disappear(&mut self) {
        self.settings.disable();
        self.deactivate();
        self.target = None;
        self.host.save_settings(&self.settings);
        self.host
            .notify(Notice::Disappeared(self.settings.active_sprite.clone()));
    }

    /// Switch the pet on in the focused panel, or off.
    pub fn toggle(&mut self) {
        let Some(panel) = self.host.focused_panel() else {
            self.host.notify(Notice::SelectPanel);
            return;
        };
        self.settings.enabled = !self.settings.enabled;
        self.settings.active_leaf_id = if self.settings.enabled {
            Some(panel.id().to_string()).filter(|id| !id.is_empty())
        } else {
            None
        };
        self.host.save_settings(&self.settings);
        self.activate(Some(panel));

        let label = self.settings.active_sprite.clone();
        self.host.notify(if self.settings.enabled {
            Notice::Appeared(label)
        } else {
            Notice::Disappeared(label)
        });
    }

    /// Change the active sprite and restart on the current panel.
    pub fn select_sprite(&mut self, key: &str) {
        self.settings.active_sprite = key.to_string();
        self.host.save_settings(&self.settings);
        let target = self.target.clone();
        self.activate(target);
    }

    pub fn set_global_movement(&mut self, enabled: bool) {
        self.settings.global_movement = enabled;
        self.world.resource_mut::<MovementSettings>().enabled = enabled;
        self.host.save_settings(&self.settings);
    }
}
