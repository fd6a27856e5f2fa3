//! Drag, resize, and maximize controllers.
//!
//! Controllers own only the transient [`GestureState`]; every geometry write goes through the
//! [`WindowManager`] setters. Mid-gesture updates write straight through so the window tracks the
//! pointer; the drag clamp runs once, at pointer-up.

use std::mem;

use crate::{
    geometry::{clamp_drag_position, maximized_rect, resize_rect, RESTORE_FALLBACK_RECT},
    model::{
        DragSession, GestureState, PointerPosition, ResizeEdge, ResizeSession, SizeSpec, WindowId,
        WindowRecord, WindowRect, WindowSize, DOCK_HEIGHT, MENU_BAR_HEIGHT,
    },
    window_manager::WindowManager,
};

/// Starts a title-bar drag on a visible window. The window is focused first; maximized windows
/// get focus but no drag.
///
/// Returns whether focusing changed persisted state.
pub fn begin_move(
    manager: &mut WindowManager,
    gesture: &mut GestureState,
    window_id: &WindowId,
    pointer: PointerPosition,
) -> bool {
    if !is_live(manager, window_id) {
        return false;
    }
    let Some(rect_start) = manager.window_rect(window_id) else {
        return false;
    };
    let changed = manager.focus(window_id);
    if manager.window(window_id).is_some_and(|w| w.maximized) {
        *gesture = GestureState::Idle;
        return changed;
    }
    *gesture = GestureState::Dragging(DragSession {
        window_id: window_id.clone(),
        pointer_start: pointer,
        rect_start,
    });
    changed
}

/// Live position update for an in-flight drag; ignored when no drag is active.
pub fn update_move(
    manager: &mut WindowManager,
    gesture: &GestureState,
    pointer: PointerPosition,
) -> bool {
    let GestureState::Dragging(session) = gesture else {
        return false;
    };
    if !is_live(manager, &session.window_id) {
        return false;
    }
    let next = session.rect_start.offset(
        pointer.x - session.pointer_start.x,
        pointer.y - session.pointer_start.y,
    );
    manager.set_position(&session.window_id, next.position())
}

/// Starts a resize from one of the eight handles. The window is focused first.
pub fn begin_resize(
    manager: &mut WindowManager,
    gesture: &mut GestureState,
    window_id: &WindowId,
    edge: ResizeEdge,
    pointer: PointerPosition,
) -> bool {
    if !is_live(manager, window_id) {
        return false;
    }
    let Some(rect_start) = manager.window_rect(window_id) else {
        return false;
    };
    let changed = manager.focus(window_id);
    *gesture = GestureState::Resizing(ResizeSession {
        window_id: window_id.clone(),
        edge,
        pointer_start: pointer,
        rect_start,
    });
    changed
}

/// Applies the pointer delta to the resize session's start rect.
///
/// The first update on a maximized window drops the maximized flag and its restore snapshot.
/// Only the axes touched by the handle become fixed; an untouched fill axis stays fill.
pub fn update_resize(
    manager: &mut WindowManager,
    gesture: &GestureState,
    pointer: PointerPosition,
) -> bool {
    let GestureState::Resizing(session) = gesture else {
        return false;
    };
    if !is_live(manager, &session.window_id) {
        return false;
    }
    let Some(current) = manager.window(&session.window_id).map(|w| w.size) else {
        return false;
    };

    let next = resize_rect(
        session.rect_start,
        session.edge,
        pointer.x - session.pointer_start.x,
        pointer.y - session.pointer_start.y,
    );
    let edge = session.edge;
    let size = WindowSize {
        width: if edge.touches_east() || edge.touches_west() {
            SizeSpec::Fixed(next.w)
        } else {
            current.width
        },
        height: if edge.touches_north() || edge.touches_south() {
            SizeSpec::Fixed(next.h)
        } else {
            current.height
        },
    };

    let mut changed = manager.discard_maximized(&session.window_id);
    changed |= manager.set_position(&session.window_id, next.position());
    changed |= manager.set_size(&session.window_id, size);
    changed
}

/// Pointer-up: commits and resets the gesture unconditionally.
///
/// A drag clamps the window's final rendered rect (or its stored rect when the host could not
/// measure it) into the viewport below the menu bar. A resize commits as-is.
///
/// Returns `true` when a gesture was in flight, so the caller knows the layout must be saved.
pub fn end_gesture(
    manager: &mut WindowManager,
    gesture: &mut GestureState,
    rendered: Option<WindowRect>,
) -> bool {
    match mem::take(gesture) {
        GestureState::Idle => false,
        GestureState::Dragging(session) => {
            if let Some(rect) = rendered.or_else(|| manager.window_rect(&session.window_id)) {
                let position = clamp_drag_position(rect, manager.viewport());
                manager.set_position(&session.window_id, position);
            }
            true
        }
        GestureState::Resizing(_) => true,
    }
}

/// Double-click on the title bar: maximize into the area between menu bar and dock, or put back
/// the pre-maximize geometry.
pub fn toggle_maximize(manager: &mut WindowManager, window_id: &WindowId) -> bool {
    match manager.window(window_id).map(|w| w.maximized) {
        None => false,
        Some(true) => manager.leave_maximized(window_id, RESTORE_FALLBACK_RECT),
        Some(false) => {
            let target = maximized_rect(manager.viewport(), MENU_BAR_HEIGHT, DOCK_HEIGHT);
            manager.enter_maximized(window_id, target)
        }
    }
}

fn is_live(manager: &WindowManager, window_id: &WindowId) -> bool {
    manager
        .window(window_id)
        .is_some_and(WindowRecord::is_visible)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Point, Viewport, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

    fn pointer(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    fn opened(ids: &[&str]) -> WindowManager {
        let mut manager = WindowManager::default();
        manager.set_viewport(Viewport::new(1280, 800));
        for id in ids {
            manager.open(&WindowId::from(*id));
        }
        manager
    }

    #[test]
    fn drag_writes_through_then_clamps_on_release() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        manager.set_position(&about, Point::new(100, 100));
        let mut gesture = GestureState::Idle;

        begin_move(&mut manager, &mut gesture, &about, pointer(150, 110));
        update_move(&mut manager, &gesture, pointer(50, 40));
        assert_eq!(manager.window(&about).unwrap().position, Point::new(0, 30));

        assert!(end_gesture(&mut manager, &mut gesture, None));
        assert_eq!(manager.window(&about).unwrap().position, Point::new(0, MENU_BAR_HEIGHT));
        assert!(gesture.is_idle());
    }

    #[test]
    fn drag_end_prefers_the_rendered_rect() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        let mut gesture = GestureState::Idle;

        begin_move(&mut manager, &mut gesture, &about, pointer(0, 0));
        end_gesture(
            &mut manager,
            &mut gesture,
            Some(WindowRect::new(1200, 790, 600, 400)),
        );
        assert_eq!(manager.window(&about).unwrap().position, Point::new(680, 400));
    }

    #[test]
    fn begin_move_focuses_the_window() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about", "projects"]);
        let mut gesture = GestureState::Idle;

        assert!(begin_move(&mut manager, &mut gesture, &about, pointer(0, 0)));
        assert_eq!(manager.active_window_id(), Some(&about));
        assert_eq!(gesture.window_id(), Some(&about));
    }

    #[test]
    fn maximized_windows_are_focused_but_not_dragged() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        toggle_maximize(&mut manager, &about);
        let before = manager.window(&about).unwrap().position;
        let mut gesture = GestureState::Idle;

        begin_move(&mut manager, &mut gesture, &about, pointer(10, 10));
        assert!(gesture.is_idle());
        update_move(&mut manager, &gesture, pointer(300, 300));
        assert!(!end_gesture(&mut manager, &mut gesture, None));
        assert_eq!(manager.window(&about).unwrap().position, before);
    }

    #[test]
    fn resize_floors_at_minimum_for_large_negative_deltas() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        let mut gesture = GestureState::Idle;

        begin_resize(&mut manager, &mut gesture, &about, ResizeEdge::SouthEast, pointer(500, 500));
        update_resize(&mut manager, &gesture, pointer(-10_000, -10_000));
        assert_eq!(
            manager.window(&about).unwrap().size,
            WindowSize::fixed(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
        );
        assert!(end_gesture(&mut manager, &mut gesture, None));
    }

    #[test]
    fn resize_is_computed_from_the_gesture_start() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        manager.set_position(&about, Point::new(200, 200));
        let mut gesture = GestureState::Idle;

        begin_resize(&mut manager, &mut gesture, &about, ResizeEdge::NorthWest, pointer(200, 200));
        update_resize(&mut manager, &gesture, pointer(150, 150));
        update_resize(&mut manager, &gesture, pointer(180, 170));
        let record = manager.window(&about).unwrap();
        assert_eq!(record.position, Point::new(180, 170));
        assert_eq!(record.size, WindowSize::fixed(620, 430));
    }

    #[test]
    fn resize_may_leave_the_window_partly_off_screen() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        manager.set_position(&about, Point::new(900, 100));
        let mut gesture = GestureState::Idle;

        begin_resize(&mut manager, &mut gesture, &about, ResizeEdge::East, pointer(0, 0));
        update_resize(&mut manager, &gesture, pointer(400, 0));
        end_gesture(&mut manager, &mut gesture, None);
        assert_eq!(
            manager.window_rect(&about),
            Some(WindowRect::new(900, 100, 1000, 400))
        );
    }

    #[test]
    fn first_resize_exits_maximized_state() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        toggle_maximize(&mut manager, &about);
        let mut gesture = GestureState::Idle;

        begin_resize(&mut manager, &mut gesture, &about, ResizeEdge::South, pointer(0, 700));
        update_resize(&mut manager, &gesture, pointer(0, 600));
        let record = manager.window(&about).unwrap();
        assert!(!record.maximized);
        assert_eq!(record.restore, None);

        toggle_maximize(&mut manager, &about);
        toggle_maximize(&mut manager, &about);
        assert_eq!(
            manager.window_rect(&about),
            Some(WindowRect::new(0, MENU_BAR_HEIGHT, 1280, 606))
        );
    }

    #[test]
    fn maximize_then_restore_round_trips_exactly() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        manager.set_position(&about, Point::new(100, 100));
        manager.set_size(&about, WindowSize::fixed(600, 400));

        toggle_maximize(&mut manager, &about);
        assert_eq!(
            manager.window_rect(&about),
            Some(WindowRect::new(0, MENU_BAR_HEIGHT, 1280, 800 - MENU_BAR_HEIGHT - DOCK_HEIGHT))
        );
        toggle_maximize(&mut manager, &about);
        assert_eq!(manager.window_rect(&about), Some(WindowRect::new(100, 100, 600, 400)));
    }

    #[test]
    fn gestures_on_closed_windows_are_dropped() {
        let about = WindowId::from("about");
        let mut manager = opened(&["about"]);
        let mut gesture = GestureState::Idle;
        begin_move(&mut manager, &mut gesture, &about, pointer(0, 0));
        manager.close(&about);

        assert!(!update_move(&mut manager, &gesture, pointer(90, 90)));
        assert!(!toggle_maximize(&mut manager, &WindowId::from("ghost")));
    }
}
