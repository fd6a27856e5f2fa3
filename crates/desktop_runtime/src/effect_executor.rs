//! Drains reducer-emitted runtime effects in dispatch order.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Installs the reactive effect that hands queued [`crate::RuntimeEffect`]s to the host.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        // Empty the queue first so effects dispatched while draining land in a fresh batch.
        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in queued {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
