//! Read-only projection of the registry consumed by the render layer.

use crate::{
    model::{WindowId, WindowRect},
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered window with fill sizes already resolved to pixels.
pub struct WindowView {
    pub id: WindowId,
    pub title: String,
    pub rect: WindowRect,
    pub z_index: u32,
    /// Drives the focus-ring styling.
    pub active: bool,
    pub maximized: bool,
}

/// Open, non-minimized windows in paint order: ascending z-index, ties broken by id.
pub fn visible_windows(manager: &WindowManager) -> Vec<WindowView> {
    let bounds = manager.available_bounds();
    let active = manager.active_window_id();
    let mut views: Vec<WindowView> = manager
        .state()
        .windows
        .values()
        .filter(|record| record.is_visible())
        .map(|record| WindowView {
            id: record.id.clone(),
            title: manager.catalog().title_for(&record.id).to_string(),
            rect: record.rect(bounds),
            z_index: record.z_index,
            active: active == Some(&record.id),
            maximized: record.maximized,
        })
        .collect();
    views.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
    views
}

/// Projection of a single window, or `None` when it is closed, minimized, or unknown.
pub fn window_view(manager: &WindowManager, window_id: &WindowId) -> Option<WindowView> {
    visible_windows(manager)
        .into_iter()
        .find(|view| &view.id == window_id)
}
