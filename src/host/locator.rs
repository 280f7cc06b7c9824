//! Panel lookup.
//!
//! - [`panel_at`] finds the panel under a screen point.
//! - [`host_container_for`] finds where a sprite bound to a panel should live:
//!   the content region of the panel's tab group when it has one, otherwise
//!   the panel's own content region.
//!
//! Both tolerate stale panels and answer `None` instead of failing, which the
//! controller reads as "the panel is gone".

use glam::Vec2;

use crate::host::{ContainerHandle, Workspace};

/// The topmost live panel whose bounds contain `point`.
pub fn panel_at<W: Workspace>(workspace: &W, point: Vec2) -> Option<W::Panel> {
    workspace
        .panels()
        .into_iter()
        .rev()
        .find(|panel| {
            workspace
                .panel_bounds(panel)
                .is_some_and(|bounds| bounds.contains(point))
        })
}

/// The container a sprite bound to `panel` should be attached to.
pub fn host_container_for<W: Workspace>(workspace: &W, panel: &W::Panel) -> Option<ContainerHandle> {
    let own = workspace.panel_content(panel)?;
    Some(workspace.tab_group_content(panel).unwrap_or(own))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::host::memory::MemoryHost;
    use crate::host::PanelIdentity;

    #[test]
    fn test_panel_at_hits_and_misses() {
        let mut host = MemoryHost::new();
        host.add_panel("left", Rect::new(0.0, 0.0, 400.0, 600.0));
        host.add_panel("right", Rect::new(400.0, 0.0, 400.0, 600.0));

        let hit = panel_at(&host, Vec2::new(450.0, 10.0)).unwrap();
        assert_eq!(hit.id(), "right");
        let hit = panel_at(&host, Vec2::new(399.0, 599.0)).unwrap();
        assert_eq!(hit.id(), "left");
        assert!(panel_at(&host, Vec2::new(900.0, 10.0)).is_none());
    }

    #[test]
    fn test_panel_at_prefers_topmost() {
        let mut host = MemoryHost::new();
        host.add_panel("base", Rect::new(0.0, 0.0, 800.0, 600.0));
        host.add_panel("popover", Rect::new(100.0, 100.0, 200.0, 200.0));
        assert_eq!(panel_at(&host, Vec2::new(150.0, 150.0)).unwrap().id(), "popover");
        assert_eq!(panel_at(&host, Vec2::new(50.0, 50.0)).unwrap().id(), "base");
    }

    #[test]
    fn test_panel_at_skips_retired_panels() {
        let mut host = MemoryHost::new();
        host.add_panel("gone", Rect::new(0.0, 0.0, 400.0, 600.0));
        host.retire_panel("gone");
        assert!(panel_at(&host, Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_container_prefers_tab_group() {
        let mut host = MemoryHost::new();
        let group = host.add_tab_group(Rect::new(0.0, 30.0, 500.0, 570.0));
        let tabbed = host.add_panel_in_group("tabbed", Rect::new(0.0, 0.0, 500.0, 600.0), group);
        let plain = host.add_panel("plain", Rect::new(500.0, 0.0, 300.0, 600.0));

        let c = host_container_for(&host, &tabbed).unwrap();
        assert_eq!(c.id, group);
        assert_eq!(c.rect, Rect::new(0.0, 30.0, 500.0, 570.0));

        let c = host_container_for(&host, &plain).unwrap();
        assert_eq!(c.rect, Rect::new(500.0, 0.0, 300.0, 600.0));
    }

    #[test]
    fn test_container_for_stale_panel_is_none() {
        let mut host = MemoryHost::new();
        let group = host.add_tab_group(Rect::new(0.0, 30.0, 500.0, 570.0));
        let panel = host.add_panel_in_group("p", Rect::new(0.0, 0.0, 500.0, 600.0), group);
        host.retire_panel("p");
        assert!(host_container_for(&host, &panel).is_none());
    }
}
