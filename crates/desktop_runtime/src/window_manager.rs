//! The window registry: the single writer of window records, focus, and stacking order.
//!
//! Every mutation is a synchronous method returning `true` when observable state changed.
//! Operations naming an unknown window id are no-ops that return `false`; a close can race a
//! pending gesture and dropping the late call is the correct outcome.

use crate::{
    apps::AppCatalog,
    geometry::{cascade_placement, clamp_rect, maximized_rect, rects_match, MAXIMIZE_TOLERANCE_PX},
    model::{
        Bounds, DesktopSnapshot, DesktopState, Point, Theme, Viewport, WindowGeometry, WindowId,
        WindowRecord, WindowRect, WindowSize, DOCK_HEIGHT, INITIAL_Z_INDEX, MENU_BAR_HEIGHT,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Registry service constructed once at startup and injected into the UI layer.
pub struct WindowManager {
    state: DesktopState,
    catalog: AppCatalog,
    viewport: Viewport,
}

impl WindowManager {
    pub fn new(catalog: AppCatalog, viewport: Viewport) -> Self {
        Self {
            state: DesktopState::default(),
            catalog,
            viewport,
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Records the host viewport. Use [`crate::reconcile::apply_viewport`] to also re-fit windows.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn available_bounds(&self) -> Bounds {
        self.viewport.available_bounds()
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowRecord> {
        self.state.windows.get(id)
    }

    /// Concrete rect of `id` with fill dimensions resolved against the current viewport.
    pub fn window_rect(&self, id: &WindowId) -> Option<WindowRect> {
        self.window(id)
            .map(|record| record.rect(self.available_bounds()))
    }

    pub fn active_window_id(&self) -> Option<&WindowId> {
        self.state.active_window_id.as_ref()
    }

    pub fn snapshot(&self) -> DesktopSnapshot {
        self.state.snapshot()
    }

    /// Opens `id`, creating its record on first use, and makes it the topmost active window.
    ///
    /// Re-opening keeps the last known geometry; the z-index bump and history move always happen.
    pub fn open(&mut self, id: &WindowId) -> bool {
        let z_index = self.next_z_index();
        if let Some(record) = self.state.windows.get_mut(id) {
            record.is_open = true;
            record.is_minimized = false;
            record.z_index = z_index;
        } else {
            let size = self.catalog.default_size_for(id);
            let position = cascade_placement(self.state.windows.len(), self.viewport, size);
            let record = WindowRecord::new(
                id.clone(),
                position,
                WindowSize::fixed(size.0, size.1),
                z_index,
            );
            self.state.windows.insert(id.clone(), record);
        }
        self.make_active(id);
        true
    }

    /// Closes `id`, keeping its record (and geometry) for the next open.
    pub fn close(&mut self, id: &WindowId) -> bool {
        let Some(record) = self.state.windows.get_mut(id) else {
            return false;
        };
        let mut changed = record.is_open;
        record.is_open = false;

        let history_len = self.state.focus_history.len();
        self.state.focus_history.retain(|entry| entry != id);
        changed |= self.state.focus_history.len() != history_len;

        changed | self.release_activity(id)
    }

    /// Hides `id` without closing it; it stays distinguishable from closed for dock restore.
    pub fn minimize(&mut self, id: &WindowId) -> bool {
        let Some(record) = self.state.windows.get_mut(id) else {
            return false;
        };
        let changed = !record.is_minimized;
        record.is_minimized = true;
        changed | self.release_activity(id)
    }

    /// Raises and activates `id`. No-op when it is already active or not visible.
    pub fn focus(&mut self, id: &WindowId) -> bool {
        if self.state.active_window_id.as_ref() == Some(id) {
            return false;
        }
        if !self.window(id).is_some_and(WindowRecord::is_visible) {
            return false;
        }
        let z_index = self.next_z_index();
        if let Some(record) = self.state.windows.get_mut(id) {
            record.z_index = z_index;
        }
        self.make_active(id);
        true
    }

    /// Unclamped position overwrite; callers clamp at gesture end.
    pub fn set_position(&mut self, id: &WindowId, position: Point) -> bool {
        match self.state.windows.get_mut(id) {
            Some(record) if record.position != position => {
                record.position = position;
                true
            }
            _ => false,
        }
    }

    /// Unclamped size overwrite; callers clamp at gesture end.
    pub fn set_size(&mut self, id: &WindowId, size: WindowSize) -> bool {
        match self.state.windows.get_mut(id) {
            Some(record) if record.size != size => {
                record.size = size;
                true
            }
            _ => false,
        }
    }

    /// Stores the current geometry as the restore snapshot and fills `target`.
    pub fn enter_maximized(&mut self, id: &WindowId, target: WindowRect) -> bool {
        let Some(record) = self.state.windows.get_mut(id) else {
            return false;
        };
        if !record.maximized {
            record.restore = Some(record.geometry());
        }
        record.maximized = true;
        record.position = target.position();
        record.size = WindowSize::fixed(target.w, target.h);
        true
    }

    /// Puts back the restore snapshot, or the fallback rect when the snapshot was lost.
    pub fn leave_maximized(&mut self, id: &WindowId, fallback: WindowRect) -> bool {
        let Some(record) = self.state.windows.get_mut(id) else {
            return false;
        };
        let restore = record.restore.take().unwrap_or(WindowGeometry {
            position: fallback.position(),
            size: WindowSize::fixed(fallback.w, fallback.h),
        });
        record.maximized = false;
        record.position = restore.position;
        record.size = restore.size;
        true
    }

    /// Drops the maximized flag and its snapshot without touching geometry.
    pub fn discard_maximized(&mut self, id: &WindowId) -> bool {
        match self.state.windows.get_mut(id) {
            Some(record) if record.maximized || record.restore.is_some() => {
                record.maximized = false;
                record.restore = None;
                true
            }
            _ => false,
        }
    }

    /// Re-clamps every record that no longer fits inside `max_width` x `max_height` below the
    /// menu bar. Records that already fit are left untouched.
    pub fn reconcile_to_viewport(&mut self, max_width: i32, max_height: i32) -> bool {
        let bounds = Bounds {
            top: MENU_BAR_HEIGHT,
            left: 0,
            right: max_width,
            bottom: MENU_BAR_HEIGHT + max_height,
        };

        let mut changed = false;
        for record in self.state.windows.values_mut() {
            let rect = record.rect(bounds);
            if bounds.contains(rect) {
                continue;
            }
            let clamped = clamp_rect(rect, bounds);
            if clamped == rect {
                continue;
            }
            let position = clamped.position();
            let size = record.size.with_fixed_dimensions(clamped.w, clamped.h);
            if record.position == position && record.size == size {
                continue;
            }
            record.position = position;
            record.size = size;
            changed = true;
        }
        changed
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        let changed = self.state.theme != theme;
        self.state.theme = theme;
        changed
    }

    pub fn toggle_command_palette(&mut self) -> bool {
        self.state.command_palette_open = !self.state.command_palette_open;
        true
    }

    pub fn set_command_palette_open(&mut self, open: bool) -> bool {
        let changed = self.state.command_palette_open != open;
        self.state.command_palette_open = open;
        changed
    }

    /// Replaces all persisted state with `snapshot`, repairing anything inconsistent.
    pub fn hydrate(&mut self, snapshot: DesktopSnapshot) {
        let mut state = DesktopState {
            windows: snapshot.windows,
            active_window_id: snapshot.active_window_id,
            focus_history: Vec::new(),
            max_z_index: snapshot.max_z_index.unwrap_or(INITIAL_Z_INDEX),
            theme: snapshot.theme,
            command_palette_open: false,
        };

        for (key, record) in &mut state.windows {
            record.id = key.clone();
        }

        for id in snapshot.window_history {
            if state.windows.contains_key(&id) {
                state.focus_history.retain(|entry| *entry != id);
                state.focus_history.push(id);
            }
        }

        let highest = state.windows.values().map(|w| w.z_index).max().unwrap_or(0);
        state.max_z_index = state.max_z_index.max(highest).max(INITIAL_Z_INDEX);

        let maximized = maximized_rect(self.viewport, MENU_BAR_HEIGHT, DOCK_HEIGHT);
        let available = self.viewport.available_bounds();
        for record in state.windows.values_mut() {
            if !record.maximized
                && rects_match(record.rect(available), maximized, MAXIMIZE_TOLERANCE_PX)
            {
                record.maximized = true;
            }
        }

        self.state = state;
        let active_valid = self
            .state
            .active_window_id
            .as_ref()
            .and_then(|id| self.window(id))
            .is_some_and(WindowRecord::is_visible);
        if !active_valid {
            self.state.active_window_id = self.most_recent_visible(None);
        }
    }

    fn next_z_index(&mut self) -> u32 {
        self.state.max_z_index = self.state.max_z_index.saturating_add(1);
        self.state.max_z_index
    }

    fn make_active(&mut self, id: &WindowId) {
        self.state.active_window_id = Some(id.clone());
        self.state.focus_history.retain(|entry| entry != id);
        self.state.focus_history.push(id.clone());
    }

    /// Hands activity to the most recent other visible window when `id` was active.
    fn release_activity(&mut self, id: &WindowId) -> bool {
        if self.state.active_window_id.as_ref() != Some(id) {
            return false;
        }
        self.state.active_window_id = self.most_recent_visible(Some(id));
        true
    }

    fn most_recent_visible(&self, excluding: Option<&WindowId>) -> Option<WindowId> {
        self.state
            .focus_history
            .iter()
            .rev()
            .filter(|entry| Some(*entry) != excluding)
            .find(|entry| self.window(entry).is_some_and(WindowRecord::is_visible))
            .cloned()
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(AppCatalog::builtin(), Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{apps::AppDescriptor, model::SizeSpec};

    fn manager() -> WindowManager {
        let catalog = AppCatalog::from_entries(vec![
            AppDescriptor::new("about", "About Me"),
            AppDescriptor::new("projects", "Projects").with_default_size(800, 600),
            AppDescriptor::new("settings", "Settings"),
        ])
        .expect("valid catalog");
        WindowManager::new(catalog, Viewport::new(1280, 800))
    }

    fn id(raw: &str) -> WindowId {
        WindowId::from(raw)
    }

    #[test]
    fn first_open_seeds_catalog_size_and_cascade_position() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.open(&id("projects"));

        let about = wm.window(&id("about")).unwrap();
        assert_eq!(about.size, WindowSize::fixed(600, 400));
        assert_eq!(about.position, cascade_placement(0, wm.viewport(), (600, 400)));
        assert_eq!(about.z_index, INITIAL_Z_INDEX + 1);

        let projects = wm.window(&id("projects")).unwrap();
        assert_eq!(projects.size, WindowSize::fixed(800, 600));
        assert_eq!(projects.position, cascade_placement(1, wm.viewport(), (800, 600)));
        assert_eq!(wm.active_window_id(), Some(&id("projects")));
        assert_eq!(wm.state().focus_history, vec![id("about"), id("projects")]);
    }

    #[test]
    fn reopening_never_duplicates_and_still_bumps_z_order() {
        let mut wm = manager();
        wm.open(&id("about"));
        let first_z = wm.window(&id("about")).unwrap().z_index;
        wm.open(&id("about"));

        assert_eq!(wm.state().windows.len(), 1);
        assert!(wm.window(&id("about")).unwrap().z_index > first_z);
        assert_eq!(wm.state().focus_history, vec![id("about")]);
    }

    #[test]
    fn close_hands_activity_back_through_history() {
        let mut wm = manager();
        for app in ["about", "projects", "settings"] {
            wm.open(&id(app));
        }

        assert!(wm.close(&id("settings")));
        assert_eq!(wm.active_window_id(), Some(&id("projects")));
        assert!(wm.close(&id("projects")));
        assert_eq!(wm.active_window_id(), Some(&id("about")));
        assert!(wm.close(&id("about")));
        assert_eq!(wm.active_window_id(), None);
        assert!(wm.state().focus_history.is_empty());
        assert_eq!(wm.state().windows.len(), 3);
    }

    #[test]
    fn closing_an_inactive_window_keeps_the_active_one() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.open(&id("projects"));
        wm.close(&id("about"));
        assert_eq!(wm.active_window_id(), Some(&id("projects")));
    }

    #[test]
    fn minimize_skips_minimized_windows_when_reassigning() {
        let mut wm = manager();
        for app in ["about", "projects", "settings"] {
            wm.open(&id(app));
        }
        wm.minimize(&id("projects"));
        assert_eq!(wm.active_window_id(), Some(&id("settings")));

        wm.minimize(&id("settings"));
        assert_eq!(wm.active_window_id(), Some(&id("about")));

        let settings = wm.window(&id("settings")).unwrap();
        assert!(settings.is_open && settings.is_minimized);
    }

    #[test]
    fn focus_is_a_noop_for_active_hidden_or_unknown_windows() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.open(&id("projects"));
        let before = wm.clone();

        assert!(!wm.focus(&id("projects")));
        assert!(!wm.focus(&id("missing")));
        wm.close(&id("about"));
        assert!(!wm.focus(&id("about")));
        assert_eq!(wm.state().max_z_index, before.state().max_z_index);

        wm.open(&id("about"));
        assert!(wm.focus(&id("projects")));
        assert_eq!(wm.active_window_id(), Some(&id("projects")));
        assert_eq!(wm.state().focus_history, vec![id("about"), id("projects")]);
    }

    #[test]
    fn setters_ignore_unknown_ids() {
        let mut wm = manager();
        assert!(!wm.set_position(&id("ghost"), Point::new(1, 2)));
        assert!(!wm.set_size(&id("ghost"), WindowSize::fixed(400, 300)));
        assert!(!wm.close(&id("ghost")));
        assert!(!wm.minimize(&id("ghost")));
        assert_eq!(wm.state(), &DesktopState::default());
    }

    #[test]
    fn reopen_restores_last_geometry() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.set_position(&id("about"), Point::new(250, 300));
        wm.close(&id("about"));
        wm.open(&id("projects"));
        wm.open(&id("about"));

        assert_eq!(wm.window(&id("about")).unwrap().position, Point::new(250, 300));
    }

    #[test]
    fn reconcile_only_touches_windows_outside_the_new_bounds() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.open(&id("projects"));
        wm.set_position(&id("about"), Point::new(40, 60));
        wm.set_position(&id("projects"), Point::new(300, 200));

        assert!(!wm.reconcile_to_viewport(1280, 768));

        assert!(wm.reconcile_to_viewport(900, 500));
        let projects = wm.window(&id("projects")).unwrap();
        assert_eq!(projects.size, WindowSize::fixed(800, 500));
        assert_eq!(projects.position, Point::new(100, MENU_BAR_HEIGHT));
        assert_eq!(wm.window(&id("about")).unwrap().position, Point::new(40, 60));
    }

    #[test]
    fn reconcile_keeps_fill_dimensions() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.set_size(
            &id("about"),
            WindowSize {
                width: SizeSpec::FillAvailable,
                height: SizeSpec::Fixed(900),
            },
        );
        assert!(wm.reconcile_to_viewport(1000, 600));
        let about = wm.window(&id("about")).unwrap();
        assert_eq!(about.size.width, SizeSpec::FillAvailable);
        assert_eq!(about.size.height, SizeSpec::Fixed(600));
        assert_eq!(about.position, Point::new(0, MENU_BAR_HEIGHT));
    }

    #[test]
    fn maximize_round_trip_uses_snapshot_then_fallback() {
        let mut wm = manager();
        wm.open(&id("about"));
        wm.set_position(&id("about"), Point::new(100, 100));
        let target = maximized_rect(wm.viewport(), MENU_BAR_HEIGHT, DOCK_HEIGHT);

        wm.enter_maximized(&id("about"), target);
        assert_eq!(wm.window_rect(&id("about")), Some(target));
        wm.leave_maximized(&id("about"), WindowRect::new(100, 100, 800, 600));
        let about = wm.window(&id("about")).unwrap();
        assert_eq!(about.position, Point::new(100, 100));
        assert_eq!(about.size, WindowSize::fixed(600, 400));

        wm.enter_maximized(&id("about"), target);
        wm.discard_maximized(&id("about"));
        assert!(!wm.window(&id("about")).unwrap().maximized);
        wm.leave_maximized(&id("about"), WindowRect::new(100, 100, 800, 600));
        assert_eq!(wm.window_rect(&id("about")), Some(WindowRect::new(100, 100, 800, 600)));
    }

    #[test]
    fn hydrate_repairs_history_active_id_and_counter() {
        let mut wm = manager();
        let mut about = WindowRecord::new(id("wrong-key"), Point::new(10, 40), WindowSize::default(), 42);
        about.is_open = true;
        let mut projects = WindowRecord::new(id("projects"), Point::new(20, 50), WindowSize::default(), 12);
        projects.is_minimized = true;

        let snapshot = DesktopSnapshot {
            windows: [(id("about"), about), (id("projects"), projects)].into_iter().collect(),
            active_window_id: Some(id("projects")),
            window_history: vec![id("about"), id("ghost"), id("projects"), id("about")],
            max_z_index: Some(3),
            ..DesktopSnapshot::default()
        };
        wm.hydrate(snapshot);

        assert_eq!(wm.window(&id("about")).unwrap().id, id("about"));
        assert_eq!(wm.state().focus_history, vec![id("projects"), id("about")]);
        assert_eq!(wm.active_window_id(), Some(&id("about")));
        assert_eq!(wm.state().max_z_index, 42);

        wm.open(&id("settings"));
        assert_eq!(wm.window(&id("settings")).unwrap().z_index, 43);
    }

    #[test]
    fn hydrate_flags_legacy_maximized_geometry() {
        let mut wm = manager();
        let target = maximized_rect(wm.viewport(), MENU_BAR_HEIGHT, DOCK_HEIGHT);
        let record = WindowRecord::new(
            id("about"),
            target.position(),
            WindowSize::fixed(target.w, target.h + 1),
            11,
        );
        wm.hydrate(DesktopSnapshot {
            windows: [(id("about"), record)].into_iter().collect(),
            ..DesktopSnapshot::default()
        });
        let about = wm.window(&id("about")).unwrap();
        assert!(about.maximized);
        assert_eq!(about.restore, None);
    }
}
