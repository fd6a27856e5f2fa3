//! Viewport-fit reconciliation bound to host resize events.

use crate::{
    model::{Viewport, DOCK_HEIGHT, MENU_BAR_HEIGHT},
    window_manager::WindowManager,
};

/// Records the new viewport and re-clamps windows that no longer fit between the menu bar and
/// the dock. Returns `true` only when at least one record was mutated.
pub fn apply_viewport(manager: &mut WindowManager, viewport: Viewport) -> bool {
    manager.set_viewport(viewport);
    let max_height = (viewport.height - MENU_BAR_HEIGHT - DOCK_HEIGHT).max(0);
    manager.reconcile_to_viewport(viewport.width.max(0), max_height)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Point, WindowId, WindowRect, WindowSize, MIN_WINDOW_WIDTH};

    #[test]
    fn shrinking_the_viewport_pulls_windows_back_inside() {
        let about = WindowId::from("about");
        let mut manager = WindowManager::default();
        manager.open(&about);
        manager.set_position(&about, Point::new(600, 300));

        assert!(apply_viewport(&mut manager, Viewport::new(1000, 600)));
        assert_eq!(manager.viewport(), Viewport::new(1000, 600));
        assert_eq!(
            manager.window_rect(&about),
            Some(WindowRect::new(400, 138, 600, 400))
        );
    }

    #[test]
    fn growing_the_viewport_changes_nothing() {
        let about = WindowId::from("about");
        let mut manager = WindowManager::default();
        manager.open(&about);
        let before = manager.state().clone();

        assert!(!apply_viewport(&mut manager, Viewport::new(1920, 1080)));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn tiny_viewports_keep_the_minimum_window_size() {
        let about = WindowId::from("about");
        let mut manager = WindowManager::default();
        manager.open(&about);
        manager.set_size(&about, WindowSize::fixed(MIN_WINDOW_WIDTH, 250));

        apply_viewport(&mut manager, Viewport::new(200, 150));
        let rect = manager.window_rect(&about).unwrap();
        assert_eq!((rect.x, rect.y, rect.w), (0, MENU_BAR_HEIGHT, MIN_WINDOW_WIDTH));
    }
}
