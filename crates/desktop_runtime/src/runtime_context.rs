//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived window manager signal, the gesture state, the runtime effect
//! queue, and host bootstrap wiring. UI composition stays in [`crate::components`].

use leptos::*;

use crate::{
    apps::AppCatalog,
    effect_executor,
    host::DesktopHostContext,
    model::GestureState,
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    window_manager::WindowManager,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// The window registry. Mutated only through [`DesktopRuntimeContext::dispatch_action`].
    pub manager: RwSignal<WindowManager>,
    /// The in-flight pointer gesture, if any.
    pub gesture: RwSignal<GestureState>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let host = runtime.host.get_value();
    host.install_boot_hydration(runtime.dispatch);
    effect_executor::install(runtime);

    let resize_listener = window_event_listener(ev::resize, move |_| {
        let viewport = runtime.host.with_value(DesktopHostContext::viewport);
        runtime.dispatch_action(DesktopAction::ViewportResized { viewport });
    });
    on_cleanup(move || resize_listener.remove());
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Host services; defaults to the browser adapters.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    /// App catalog; defaults to the built-in catalog.
    #[prop(optional)]
    catalog: Option<AppCatalog>,
    children: Children,
) -> impl IntoView {
    let host = host.unwrap_or_default();
    let manager = WindowManager::new(catalog.unwrap_or_default(), host.viewport());

    let host = store_value(host);
    let manager = create_rw_signal(manager);
    let gesture = create_rw_signal(GestureState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut next_manager = manager.get_untracked();
        let mut next_gesture = gesture.get_untracked();

        let new_effects = reduce_desktop(&mut next_manager, &mut next_gesture, action);

        if manager.with_untracked(|current| *current != next_manager) {
            manager.set(next_manager);
        }
        if gesture.with_untracked(|current| *current != next_gesture) {
            gesture.set(next_gesture);
        }
        if !new_effects.is_empty() {
            effects.update(|queue| queue.extend(new_effects));
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        manager,
        gesture,
        effects,
        dispatch,
    };

    provide_context(runtime);

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
