//! Pure geometry helpers shared by the registry, the interaction controllers, and the
//! viewport reconciler.

use crate::model::{
    Bounds, Point, ResizeEdge, Viewport, WindowRect, MENU_BAR_HEIGHT, MIN_WINDOW_HEIGHT,
    MIN_WINDOW_WIDTH,
};

/// Offset between successive cascaded windows.
pub const CASCADE_STEP: i32 = 30;
/// Cascade offsets wrap after this many windows.
pub const CASCADE_CYCLE: usize = 10;
/// Pixel slack when comparing a rect against the maximized rect.
pub const MAXIMIZE_TOLERANCE_PX: i32 = 2;
/// Geometry used when restoring a maximized window that has no stored snapshot.
pub const RESTORE_FALLBACK_RECT: WindowRect = WindowRect::new(100, 100, 800, 600);

/// Fits `rect` inside `bounds`: size shrinks first (never below the window minimum), then the
/// position slides so the edges land inside. When the minimum size is larger than `bounds` the
/// rect is pinned to the top-left corner.
pub fn clamp_rect(rect: WindowRect, bounds: Bounds) -> WindowRect {
    let w = rect.w.min(bounds.width()).max(MIN_WINDOW_WIDTH);
    let h = rect.h.min(bounds.height()).max(MIN_WINDOW_HEIGHT);
    WindowRect {
        x: rect.x.min(bounds.right - w).max(bounds.left),
        y: rect.y.min(bounds.bottom - h).max(bounds.top),
        w,
        h,
    }
}

/// Initial position for a newly created window: centred below the menu bar, shifted by
/// [`CASCADE_STEP`] per existing window (cycling every [`CASCADE_CYCLE`]), kept on screen.
pub fn cascade_placement(existing_count: usize, viewport: Viewport, default_size: (i32, i32)) -> Point {
    let (w, h) = default_size;
    let available_height = viewport.height - MENU_BAR_HEIGHT;
    let offset = CASCADE_STEP * (existing_count % CASCADE_CYCLE) as i32;

    let x = (viewport.width - w) / 2 + offset;
    let y = MENU_BAR_HEIGHT + (available_height - h) / 2 + offset;

    Point {
        x: x.min(viewport.width - w).max(0),
        y: y.min(viewport.height - h).max(MENU_BAR_HEIGHT),
    }
}

pub fn maximized_rect(viewport: Viewport, top_inset: i32, bottom_inset: i32) -> WindowRect {
    WindowRect {
        x: 0,
        y: top_inset,
        w: viewport.width,
        h: (viewport.height - top_inset - bottom_inset).max(0),
    }
}

/// Whether two rects match within `tolerance` pixels on every component.
pub fn rects_match(a: WindowRect, b: WindowRect, tolerance: i32) -> bool {
    let tolerance = tolerance.unsigned_abs();
    a.x.abs_diff(b.x) < tolerance
        && a.y.abs_diff(b.y) < tolerance
        && a.w.abs_diff(b.w) < tolerance
        && a.h.abs_diff(b.h) < tolerance
}

/// Applies a pointer delta to the edges touched by `edge`, anchoring the opposite edges.
///
/// Width and height never drop below the window minimum; when the floor kicks in on a west or
/// north edge the origin stops moving so the opposite edge stays put.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    let mut next = start;

    if edge.touches_east() {
        next.w = (start.w + dx).max(MIN_WINDOW_WIDTH);
    }
    if edge.touches_west() {
        let w = (start.w - dx).max(MIN_WINDOW_WIDTH);
        next.x = start.x + (start.w - w);
        next.w = w;
    }
    if edge.touches_south() {
        next.h = (start.h + dy).max(MIN_WINDOW_HEIGHT);
    }
    if edge.touches_north() {
        let h = (start.h - dy).max(MIN_WINDOW_HEIGHT);
        next.y = start.y + (start.h - h);
        next.h = h;
    }

    next
}

/// Drag-end clamp: x into `[0, viewport.width - w]`, y into `[MENU_BAR_HEIGHT, viewport.height - h]`.
/// The top-left limits win when the window is larger than the viewport.
pub fn clamp_drag_position(rect: WindowRect, viewport: Viewport) -> Point {
    Point {
        x: rect.x.min(viewport.width - rect.w).max(0),
        y: rect.y.min(viewport.height - rect.h).max(MENU_BAR_HEIGHT),
    }
}
