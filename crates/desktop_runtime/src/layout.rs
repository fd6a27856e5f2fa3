//! Named layout anchors supplied by the render layer.
//!
//! Core code never inspects rendered elements; when it needs an on-screen rectangle it asks a
//! [`LayoutQuery`] for a named anchor and copes with `None`.

use std::collections::HashMap;

use crate::model::{Point, Viewport, WindowId, WindowRect};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutAnchor {
    /// The dock icon that launches a window.
    DockIcon(WindowId),
    /// A rendered window element.
    Window(WindowId),
}

/// Supplies rendered rectangles for named anchors on demand.
pub trait LayoutQuery {
    /// Returns the anchor's current on-screen rect, or `None` when it is not rendered.
    fn anchor_rect(&self, anchor: &LayoutAnchor) -> Option<WindowRect>;
}

#[derive(Debug, Clone, Default)]
/// Fixed anchor table for headless hosts and tests.
pub struct StaticLayout {
    anchors: HashMap<LayoutAnchor, WindowRect>,
}

impl StaticLayout {
    pub fn with_anchor(mut self, anchor: LayoutAnchor, rect: WindowRect) -> Self {
        self.anchors.insert(anchor, rect);
        self
    }
}

impl LayoutQuery for StaticLayout {
    fn anchor_rect(&self, anchor: &LayoutAnchor) -> Option<WindowRect> {
        self.anchors.get(anchor).copied()
    }
}

/// Starting point of the open animation for `window_id`.
///
/// Centred horizontally on the dock icon (offset by half the window width) at the icon's top
/// edge; bottom-centre of the viewport when the icon is not rendered.
pub fn open_animation_origin(
    query: &dyn LayoutQuery,
    window_id: &WindowId,
    viewport: Viewport,
    window_width: i32,
) -> Point {
    match query.anchor_rect(&LayoutAnchor::DockIcon(window_id.clone())) {
        Some(icon) => Point::new(icon.x + icon.w / 2 - window_width / 2, icon.y),
        None => Point::new(viewport.width / 2, viewport.height),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn origin_centres_on_the_dock_icon() {
        let about = WindowId::from("about");
        let layout = StaticLayout::default().with_anchor(
            LayoutAnchor::DockIcon(about.clone()),
            WindowRect::new(600, 748, 48, 48),
        );
        assert_eq!(
            open_animation_origin(&layout, &about, Viewport::new(1280, 800), 600),
            Point::new(324, 748)
        );
    }

    #[test]
    fn origin_falls_back_to_bottom_centre() {
        let layout = StaticLayout::default();
        assert_eq!(
            open_animation_origin(&layout, &WindowId::from("journey"), Viewport::new(1280, 800), 600),
            Point::new(640, 800)
        );
    }
}
