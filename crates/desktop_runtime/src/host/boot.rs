use leptos::{logging, spawn_local, Callable, Callback};

use crate::{host::DesktopHostContext, persistence, reducer::DesktopAction};

pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    spawn_local(async move {
        let prefs = host.prefs_store();
        match persistence::load_snapshot(prefs.as_ref()).await {
            Some(snapshot) => {
                logging::log!("restoring {} stored windows", snapshot.windows.len());
                dispatch.call(DesktopAction::HydrateSnapshot { snapshot });
            }
            None => logging::log!("no stored desktop snapshot; starting fresh"),
        }

        // Stored geometry may come from a larger screen.
        dispatch.call(DesktopAction::ViewportResized {
            viewport: host.viewport(),
        });
    });
}
