//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! Services are injected as trait objects so the provider can run against in-memory stores in
//! tests and against `localStorage` in the browser.

mod boot;
mod host_ui;

use std::rc::Rc;

use leptos::{logging, spawn_local, Callback, SignalWithUntracked};
use platform_host::{ExternalUrlService, PrefsStore};
use platform_host_web::{external_url_service, prefs_store};

pub use host_ui::{ColorSchemeWatch, DomLayout};

use crate::{
    model::{DesktopSnapshot, Viewport, WindowId},
    persistence::{self, PersistenceError},
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    external_urls: Rc<dyn ExternalUrlService>,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self::new(Rc::new(prefs_store()), Rc::new(external_url_service()))
    }
}

impl DesktopHostContext {
    pub fn new(prefs: Rc<dyn PrefsStore>, external_urls: Rc<dyn ExternalUrlService>) -> Self {
        Self {
            prefs,
            external_urls,
        }
    }

    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    pub fn external_url_service(&self) -> Rc<dyn ExternalUrlService> {
        self.external_urls.clone()
    }

    /// Loads the stored snapshot once and hydrates the runtime with it.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistSnapshot => self.spawn_persist_snapshot(runtime),
            RuntimeEffect::OpenExternalUrl(url) => self.spawn_open_external_url(url),
            RuntimeEffect::FocusWindowInput(window_id) => self.focus_window_input(&window_id),
        }
    }

    /// Moves keyboard focus into the window element so shortcuts land on it.
    pub fn focus_window_input(&self, window_id: &WindowId) {
        host_ui::focus_element_soon(window_id.dom_id());
    }

    /// Current browser viewport; a fixed default off-browser.
    pub fn viewport(&self) -> Viewport {
        host_ui::viewport()
    }

    /// Whether the host prefers a dark color scheme.
    pub fn prefers_dark(&self) -> bool {
        host_ui::prefers_dark()
    }

    /// Follows later changes of the OS color scheme; detaches when the guard drops.
    pub fn watch_color_scheme(&self, on_change: impl Fn(bool) + 'static) -> ColorSchemeWatch {
        host_ui::watch_color_scheme(on_change)
    }

    /// Anchor lookup backed by the rendered document.
    pub fn layout(&self) -> DomLayout {
        DomLayout
    }

    /// Writes `snapshot` to the preference store.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when encoding or the store write fails.
    pub async fn save_snapshot(&self, snapshot: &DesktopSnapshot) -> Result<(), PersistenceError> {
        persistence::persist_snapshot(self.prefs.as_ref(), snapshot).await
    }

    /// Opens `url` through the external URL service.
    ///
    /// # Errors
    ///
    /// Returns the service's error message when the host refuses to navigate.
    pub async fn open_external_url(&self, url: &str) -> Result<(), String> {
        self.external_urls.open_url(url).await
    }

    fn spawn_persist_snapshot(&self, runtime: DesktopRuntimeContext) {
        let snapshot = runtime.manager.with_untracked(|manager| manager.snapshot());
        let host = self.clone();
        spawn_local(async move {
            if let Err(err) = host.save_snapshot(&snapshot).await {
                logging::warn!("persist desktop snapshot failed: {err}");
            }
        });
    }

    fn spawn_open_external_url(&self, url: String) {
        let host = self.clone();
        spawn_local(async move {
            if let Err(err) = host.open_external_url(&url).await {
                logging::warn!("open external url failed for `{url}`: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryPrefsStore, RecordingExternalUrlService};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::GestureState,
        persistence::SNAPSHOT_STORAGE_KEY,
        reducer::reduce_desktop,
        window_manager::WindowManager,
    };

    fn recording_host() -> (DesktopHostContext, MemoryPrefsStore, RecordingExternalUrlService) {
        let prefs = MemoryPrefsStore::default();
        let urls = RecordingExternalUrlService::default();
        let host = DesktopHostContext::new(Rc::new(prefs.clone()), Rc::new(urls.clone()));
        (host, prefs, urls)
    }

    #[test]
    fn external_dock_entries_reach_the_url_service() {
        let (host, _, urls) = recording_host();
        let mut manager = WindowManager::default();
        let mut gesture = GestureState::Idle;

        let effects = reduce_desktop(
            &mut manager,
            &mut gesture,
            DesktopAction::ActivateApp {
                window_id: WindowId::from("github"),
            },
        );
        for effect in effects {
            if let RuntimeEffect::OpenExternalUrl(url) = effect {
                block_on(host.open_external_url(&url)).expect("recorded");
            }
        }

        assert_eq!(urls.opened(), vec!["https://github.com".to_string()]);
        assert!(manager.window(&WindowId::from("github")).is_none());
    }

    #[test]
    fn saved_snapshots_land_in_the_injected_store() {
        let (host, prefs, _) = recording_host();
        let mut manager = WindowManager::default();
        manager.open(&WindowId::from("about"));

        block_on(host.save_snapshot(&manager.snapshot())).expect("saved");

        assert_eq!(prefs.write_count(), 1);
        let loaded = block_on(persistence::load_snapshot(host.prefs_store().as_ref()));
        assert_eq!(loaded, Some(manager.snapshot()));
        assert!(prefs.raw(SNAPSHOT_STORAGE_KEY).is_some());
    }
}
