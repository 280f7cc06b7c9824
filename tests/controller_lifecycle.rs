//! Lifecycle scenarios: activation, teardown, dragging across panels and
//! recovery when the host rearranges or closes panels.

use panelpet::components::placement::Vertical;
use panelpet::components::playback::frame_interval_ms;
use panelpet::controller::{LifecycleState, PetController};
use panelpet::error::AssetError;
use panelpet::events::notice::Notice;
use panelpet::geometry::Rect;
use panelpet::host::memory::MemoryHost;
use panelpet::host::{FrameRequest, ImageOrigin, PanelIdentity, SpriteImage, Workspace};
use panelpet::resources::cliprng::ClipRng;
use panelpet::resources::settings::PetSettings;
use panelpet::resources::spriteconfig::SpriteConfig;

type Pet = PetController<MemoryHost>;

const LEFT: Rect = Rect {
    origin: glam::Vec2::new(0.0, 40.0),
    size: glam::Vec2::new(500.0, 400.0),
};
const RIGHT: Rect = Rect {
    origin: glam::Vec2::new(510.0, 40.0),
    size: glam::Vec2::new(400.0, 400.0),
};

fn two_panel_host() -> MemoryHost {
    let mut host = MemoryHost::new();
    host.add_panel("left", LEFT);
    host.add_panel("right", RIGHT);
    host.focus("left");
    host
}

fn persisted(leaf: Option<&str>) -> PetSettings {
    PetSettings {
        enabled: true,
        persist_on_relaunch: true,
        active_leaf_id: leaf.map(str::to_string),
        ..PetSettings::default()
    }
}

/// Settings whose only clip walks, so movement is deterministic.
fn walker_settings() -> PetSettings {
    let mut settings = persisted(Some("left"));
    let walker = SpriteConfig {
        name: "Walker".into(),
        clip_table_json: r#"[{"id": "walk", "frames": 4, "move": true}]"#.into(),
        ..SpriteConfig::kitty()
    };
    settings.library.insert(walker.name.clone(), walker);
    settings.active_sprite = "Walker".into();
    settings
}

fn new_pet(host: MemoryHost, settings: PetSettings) -> Pet {
    PetController::with_rng(host, settings, ClipRng::with_seed(9))
}

/// Complete every outstanding image request successfully.
fn complete_loads(pet: &mut Pet) {
    for request in pet.host_mut().take_load_requests() {
        pet.image_loaded(
            request.ticket,
            Ok(SpriteImage {
                sprite: request.sprite.clone(),
                origin: ImageOrigin::Embedded(request.sprite),
            }),
        );
    }
}

/// A pet restored from `settings` with its image loaded.
fn running(settings: PetSettings) -> Pet {
    let mut pet = new_pet(two_panel_host(), settings);
    pet.initialize_from_save();
    complete_loads(&mut pet);
    assert!(pet.is_running());
    pet
}

/// Fire the pending frame, if any.
fn fire(pet: &mut Pet, now_ms: f64) -> bool {
    match pet.host_mut().take_frame() {
        Some(request) => {
            pet.on_frame(request, now_ms);
            true
        }
        None => false,
    }
}

fn content_of(pet: &Pet, id: &str) -> panelpet::host::ContainerId {
    let panel = pet.host().panel_by_id(id).unwrap();
    pet.host().panel_content(&panel).unwrap().id
}

// =============================================================================
// Activation
// =============================================================================

#[test]
fn test_restore_binds_saved_panel() {
    let mut pet = running(persisted(Some("right")));

    assert_eq!(pet.state(), LifecycleState::EnabledBound);
    assert_eq!(pet.target().unwrap().id(), "right");
    let element = pet.attached_element().unwrap();
    assert_eq!(pet.host().element_parent(element), Some(content_of(&pet, "right")));
    assert!(pet.host().presented.is_some());
    assert!(fire(&mut pet, 16.0));
}

#[test]
fn test_restore_falls_back_to_focused_panel() {
    let pet = running(persisted(Some("closed-long-ago")));
    assert_eq!(pet.target().unwrap().id(), "left");
}

#[test]
fn test_no_panel_leaves_pet_unbound() {
    let mut host = MemoryHost::new();
    host.add_panel("left", LEFT);
    let mut pet = new_pet(host, persisted(None));

    pet.initialize_from_save();

    assert_eq!(pet.state(), LifecycleState::EnabledUnbound);
    assert!(pet.host().load_requests().is_empty());
    assert_eq!(pet.host().element_count(), 0);
    assert_eq!(pet.host().frames_requested(), 0);
    assert!(!pet.has_scheduled_frame());
}

#[test]
fn test_disabled_restore_does_nothing() {
    let mut pet = new_pet(
        two_panel_host(),
        PetSettings {
            persist_on_relaunch: true,
            ..PetSettings::default()
        },
    );
    pet.initialize_from_save();
    assert_eq!(pet.state(), LifecycleState::Disabled);
    assert!(pet.host().load_requests().is_empty());
    assert_eq!(pet.host().stray_releases(), 0);
}

#[test]
fn test_relaunch_without_persistence_starts_disabled() {
    let mut pet = new_pet(
        two_panel_host(),
        PetSettings {
            enabled: true,
            persist_on_relaunch: false,
            active_leaf_id: Some("left".into()),
            ..PetSettings::default()
        },
    );
    assert!(!pet.settings().enabled);
    assert!(pet.settings().active_leaf_id.is_none());
    pet.initialize_from_save();
    assert_eq!(pet.state(), LifecycleState::Disabled);
}

#[test]
fn test_nothing_attached_before_image_arrives() {
    let mut pet = new_pet(two_panel_host(), persisted(Some("left")));
    pet.initialize_from_save();

    assert_eq!(pet.state(), LifecycleState::EnabledBound);
    assert!(pet.is_loading());
    assert_eq!(pet.host().element_count(), 0);
    assert_eq!(pet.host().frames_requested(), 0);

    pet.pointer_down(10.0, 400.0);
    assert!(!pet.is_dragging());
}

#[test]
fn test_asset_failure_keeps_pet_inert() {
    let mut pet = new_pet(two_panel_host(), persisted(Some("left")));
    pet.initialize_from_save();
    let request = pet.host_mut().take_load_requests().pop().unwrap();

    pet.image_loaded(request.ticket, Err(AssetError::NotFound("Kitty".into())));

    assert!(!pet.is_running());
    assert!(!pet.is_loading());
    assert_eq!(pet.host().element_count(), 0);
    assert_eq!(pet.host().frames_requested(), 0);
    assert!(matches!(
        pet.host().notices.last(),
        Some(Notice::AssetFailed { sprite, .. }) if sprite == "Kitty"
    ));
}

#[test]
fn test_stale_image_completion_is_ignored() {
    let mut pet = new_pet(two_panel_host(), persisted(Some("left")));
    pet.initialize_from_save();
    let first = pet.host_mut().take_load_requests().pop().unwrap();

    pet.activate(None);
    let second = pet.host_mut().take_load_requests().pop().unwrap();
    assert_ne!(first.ticket, second.ticket);

    let image = SpriteImage {
        sprite: "Kitty".into(),
        origin: ImageOrigin::Embedded("Kitty".into()),
    };
    pet.image_loaded(first.ticket, Ok(image.clone()));
    assert!(!pet.is_running());
    assert_eq!(pet.host().element_count(), 0);

    pet.image_loaded(second.ticket, Ok(image));
    assert!(pet.is_running());
    assert_eq!(pet.host().element_count(), 1);
}

#[test]
fn test_reactivation_keeps_single_element_and_frame() {
    let mut pet = running(persisted(Some("left")));
    fire(&mut pet, 16.0);

    pet.activate(None);
    complete_loads(&mut pet);
    pet.activate(None);
    complete_loads(&mut pet);

    assert_eq!(pet.host().element_count(), 1);
    assert_eq!(pet.host().pending_frames().len(), 1);
    assert_eq!(pet.host().active_captures(), 0);
}

// =============================================================================
// Frame loop
// =============================================================================

#[test]
fn test_exactly_one_frame_pending_while_running() {
    let mut pet = running(persisted(Some("left")));
    let mut now = 0.0;
    for _ in 0..300 {
        assert_eq!(pet.host().pending_frames().len(), 1);
        now += 16.7;
        assert!(fire(&mut pet, now));
    }
    assert_eq!(pet.host().pending_frames().len(), 1);
}

#[test]
fn test_frame_rate_independent_of_tick_rate() {
    let mut pet = running(persisted(Some("left")));
    let fps = pet.sprite_sheet().unwrap().fps;

    let start = 1_000.0;
    let mut now = start;
    fire(&mut pet, now);
    for _ in 0..30 {
        now += 1_000.0;
        fire(&mut pet, now);
    }

    let advanced = pet.playback().unwrap().frames_advanced as f64;
    let expected = (now - start) / frame_interval_ms(fps);
    assert!((advanced - expected).abs() <= 1.0, "{} vs {}", advanced, expected);
}

#[test]
fn test_foreign_and_late_frames_are_ignored() {
    let mut pet = running(persisted(Some("left")));
    let request = pet.host_mut().take_frame().unwrap();

    pet.on_frame(FrameRequest(u64::MAX), 16.0);
    assert_eq!(pet.host().frames_requested(), 1);
    assert!(pet.has_scheduled_frame());

    pet.on_frame(request, 16.0);
    assert_eq!(pet.host().frames_requested(), 2);

    let late = pet.host_mut().take_frame().unwrap();
    pet.deactivate();
    pet.on_frame(late, 32.0);
    assert_eq!(pet.host().frames_requested(), 2);
    assert!(pet.host().pending_frames().is_empty());
    assert_eq!(pet.host().stray_releases(), 0);
}

#[test]
fn test_global_movement_switch() {
    let mut pet = running(walker_settings());
    let mut now = 0.0;
    for _ in 0..10 {
        now += 16.0;
        fire(&mut pet, now);
    }
    assert_eq!(pet.placement().unwrap().x, 60.0);

    pet.set_global_movement(false);
    assert!(!pet.host().saved.as_ref().unwrap().global_movement);
    for _ in 0..100 {
        now += 16.0;
        fire(&mut pet, now);
    }
    assert_eq!(pet.placement().unwrap().x, 60.0);
}

#[test]
fn test_placement_survives_reactivation() {
    let mut pet = running(walker_settings());
    let mut now = 0.0;
    for _ in 0..5 {
        now += 16.0;
        fire(&mut pet, now);
    }
    pet.select_sprite("Walker");
    complete_loads(&mut pet);
    assert_eq!(pet.placement().unwrap().x, 55.0);
}

#[test]
fn test_self_heal_after_retile() {
    let mut pet = running(persisted(Some("left")));
    let mut now = 0.0;
    for _ in 0..60 {
        now += 16.7;
        fire(&mut pet, now);
    }
    let advanced = pet.playback().unwrap().frames_advanced;
    let old = pet.attached_element().unwrap();

    let narrower = Rect::new(0.0, 40.0, 300.0, 400.0);
    pet.host_mut().retile_panel("left", narrower);
    assert_eq!(pet.host().element_count(), 0);

    now += 16.7;
    fire(&mut pet, now);

    let element = pet.attached_element().unwrap();
    assert_ne!(element, old);
    assert_eq!(pet.host().element_parent(element), Some(content_of(&pet, "left")));
    assert_eq!(pet.container().unwrap().rect, narrower);
    assert!(pet.playback().unwrap().frames_advanced >= advanced);
    assert!(pet.is_running());
    assert_eq!(pet.host().stray_releases(), 0);
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_deactivate_releases_everything_once() {
    let mut pet = running(persisted(Some("left")));
    pet.pointer_down(82.0, 408.0);
    assert_eq!(pet.host().active_captures(), 1);

    pet.deactivate();
    assert!(pet.host().pending_frames().is_empty());
    assert_eq!(pet.host().active_captures(), 0);
    assert_eq!(pet.host().element_count(), 0);
    assert!(!pet.is_dragging());
    assert_eq!(pet.state(), LifecycleState::EnabledUnbound);

    let saves = pet.host().save_count;
    pet.deactivate();
    pet.deactivate();
    assert_eq!(pet.host().stray_releases(), 0);
    assert_eq!(pet.host().save_count, saves);
}

#[test]
fn test_deactivate_keeps_pet_enabled() {
    let mut pet = running(persisted(Some("left")));

    pet.deactivate();
    assert!(pet.settings().enabled);
    assert_eq!(pet.state(), LifecycleState::EnabledUnbound);
    assert!(!pet.is_running());

    pet.activate(None);
    assert_eq!(pet.state(), LifecycleState::EnabledBound);
    complete_loads(&mut pet);
    assert!(pet.is_running());
    assert_eq!(pet.target().map(|p| p.id().to_string()).as_deref(), Some("left"));
    assert_eq!(pet.host().element_count(), 1);
    assert_eq!(pet.host().stray_releases(), 0);
}

#[test]
fn test_destroyed_panel_disables_for_good() {
    let mut pet = running(persisted(Some("left")));

    pet.host_mut().retire_panel("left");
    pet.panel_destroyed("left");

    assert_eq!(pet.state(), LifecycleState::Disabled);
    assert!(!pet.settings().enabled);
    assert!(pet.settings().active_leaf_id.is_none());
    let saved = pet.host().saved.clone().unwrap();
    assert!(!saved.enabled);
    assert!(saved.active_leaf_id.is_none());
    assert_eq!(
        pet.host().notices.last(),
        Some(&Notice::Disappeared("Kitty".into()))
    );

    pet.initialize_from_save();
    assert_eq!(pet.state(), LifecycleState::Disabled);
    assert!(pet.host().load_requests().is_empty());
}

#[test]
fn test_unrelated_panel_destroyed_is_ignored() {
    let mut pet = running(persisted(Some("left")));
    pet.host_mut().retire_panel("right");
    pet.panel_destroyed("right");
    assert!(pet.settings().enabled);
    assert!(pet.is_running());
}

#[test]
fn test_layout_change_detects_vanished_panel() {
    let mut pet = running(persisted(Some("left")));
    pet.layout_changed();
    assert!(pet.is_running());

    pet.host_mut().retire_panel("left");
    pet.layout_changed();
    assert!(!pet.settings().enabled);
    assert_eq!(pet.state(), LifecycleState::Disabled);
}

// =============================================================================
// Dragging
// =============================================================================

#[test]
fn test_drag_into_other_panel() {
    let mut pet = running(persisted(Some("left")));

    // Sprite centre at the floor of the left panel.
    pet.pointer_down(82.0, 408.0);
    assert!(pet.is_dragging());
    assert_eq!(pet.placement().unwrap().y, Vertical::At(335.0));

    pet.pointer_move(700.0, 200.0);
    assert_eq!(pet.target().unwrap().id(), "right");
    let element = pet.attached_element().unwrap();
    assert_eq!(pet.host().element_parent(element), Some(content_of(&pet, "right")));
    assert_eq!(pet.host().element_count(), 1);

    let placement = pet.placement().unwrap();
    assert_eq!(placement.x, 158.0);
    assert_eq!(placement.y, Vertical::At(128.0));
    let centre = placement.screen_position(&RIGHT, 64.0) + glam::Vec2::splat(32.0);
    assert!((centre - glam::Vec2::new(700.0, 200.0)).length() < 1e-3);

    pet.pointer_up();
    assert!(!pet.is_dragging());
    assert_eq!(pet.placement().unwrap().y, Vertical::Floor);
    assert_eq!(pet.host().active_captures(), 0);
    assert_eq!(pet.settings().active_leaf_id.as_deref(), Some("right"));
    assert_eq!(
        pet.host().saved.as_ref().unwrap().active_leaf_id.as_deref(),
        Some("right")
    );
}

#[test]
fn test_drag_clamps_to_container() {
    let mut pet = running(persisted(Some("left")));
    pet.pointer_down(82.0, 408.0);
    pet.pointer_move(-200.0, -200.0);

    // Outside every panel: stays in the left one, pinned to the buffer.
    assert_eq!(pet.target().unwrap().id(), "left");
    let placement = pet.placement().unwrap();
    assert_eq!(placement.x, 1.0);
    assert_eq!(placement.y, Vertical::At(1.0));
}

#[test]
fn test_drag_freezes_animation() {
    let mut pet = running(walker_settings());
    let mut now = 0.0;
    fire(&mut pet, now);
    pet.pointer_down(82.0, 408.0);
    let x = pet.placement().unwrap().x;
    let frame = pet.playback().unwrap().frame_index;

    for _ in 0..120 {
        now += 16.7;
        fire(&mut pet, now);
    }
    assert_eq!(pet.placement().unwrap().x, x);
    assert_eq!(pet.playback().unwrap().frame_index, frame);

    pet.pointer_up();
    now += 16.7;
    fire(&mut pet, now);
    assert_eq!(pet.playback().unwrap().frame_index, frame);
    assert_eq!(pet.placement().unwrap().x, x + 1.0);
}

#[test]
fn test_pointer_up_without_drag_does_not_save() {
    let mut pet = running(persisted(Some("left")));
    let saves = pet.host().save_count;
    pet.pointer_up();
    pet.pointer_move(700.0, 200.0);
    assert_eq!(pet.host().save_count, saves);
    assert_eq!(pet.target().unwrap().id(), "left");
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_toggle_needs_focused_panel() {
    let mut host = two_panel_host();
    host.clear_focus();
    let mut pet = new_pet(host, PetSettings::default());

    pet.toggle();

    assert_eq!(pet.host().notices, vec![Notice::SelectPanel]);
    assert!(!pet.settings().enabled);
    assert_eq!(pet.host().save_count, 0);
    assert_eq!(pet.state(), LifecycleState::Disabled);
}

#[test]
fn test_toggle_on_and_off() {
    let mut pet = new_pet(two_panel_host(), PetSettings::default());

    pet.toggle();
    assert!(pet.settings().enabled);
    assert_eq!(pet.settings().active_leaf_id.as_deref(), Some("left"));
    assert_eq!(pet.host().notices.last(), Some(&Notice::Appeared("Kitty".into())));
    complete_loads(&mut pet);
    assert!(pet.is_running());

    pet.toggle();
    assert!(!pet.settings().enabled);
    assert!(pet.settings().active_leaf_id.is_none());
    assert_eq!(
        pet.host().notices.last(),
        Some(&Notice::Disappeared("Kitty".into()))
    );
    assert_eq!(pet.state(), LifecycleState::Disabled);
    assert_eq!(pet.host().element_count(), 0);
    assert!(pet.host().pending_frames().is_empty());
}

#[test]
fn test_select_sprite_restarts_with_new_sheet() {
    let mut pet = running(persisted(Some("left")));

    pet.select_sprite("Maneki Neko");
    let request = pet.host().load_requests().last().unwrap().clone();
    assert_eq!(request.sprite, "Maneki Neko");
    assert!(!pet.is_running());
    complete_loads(&mut pet);

    let sheet = pet.sprite_sheet().unwrap();
    assert_eq!(sheet.clips.len(), 1);
    assert_eq!(sheet.clips[0].id, "lucky");
    assert_eq!(pet.host().saved.as_ref().unwrap().active_sprite, "Maneki Neko");
    assert_eq!(pet.target().unwrap().id(), "left");
    assert!(pet.is_running());
}

#[test]
fn test_unknown_sprite_falls_back_to_default() {
    let mut pet = running(persisted(Some("left")));
    pet.select_sprite("Dragon");
    let request = pet.host().load_requests().last().unwrap().clone();
    assert_eq!(request.sprite, "Kitty");
}
