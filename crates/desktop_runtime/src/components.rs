//! Desktop shell UI composition: menu bar, window layer, dock, and command palette.

mod palette;
mod window;

use leptos::*;

use self::{palette::CommandPalette, window::DesktopWindow};

use crate::{
    layout::{LayoutAnchor, LayoutQuery},
    model::{resolve_theme, GestureState, PointerPosition, Theme},
    window_manager::WindowManager,
    palette::palette_shortcut,
    reducer::DesktopAction,
    view::visible_windows,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the full desktop shell and routes global pointer and keyboard input to the reducer.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let manager = runtime.manager;
    let prefers_dark = create_rw_signal(runtime.host.with_value(|host| host.prefers_dark()));
    let scheme_watch = runtime
        .host
        .with_value(|host| host.watch_color_scheme(move |dark| prefers_dark.set(dark)));
    on_cleanup(move || drop(scheme_watch));

    let theme_id = theme_css_id(manager, prefers_dark.into());
    let window_ids = create_memo(move |_| {
        manager.with(|m| {
            visible_windows(m)
                .into_iter()
                .map(|view| view.id)
                .collect::<Vec<_>>()
        })
    });

    let palette_listener = window_event_listener(ev::keydown, move |ev| {
        let open = manager.with_untracked(|m| m.state().command_palette_open);
        if let Some(action) = palette_shortcut(&ev.key(), ev.meta_key(), ev.ctrl_key(), open) {
            ev.prevent_default();
            runtime.dispatch_action(action);
        }
    });
    on_cleanup(move || palette_listener.remove());

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let action = runtime.gesture.with_untracked(|gesture| match gesture {
            GestureState::Idle => None,
            GestureState::Dragging(_) => Some(DesktopAction::UpdateMove { pointer }),
            GestureState::Resizing(_) => Some(DesktopAction::UpdateResize { pointer }),
        });
        if let Some(action) = action {
            runtime.dispatch_action(action);
        }
    };
    let on_pointer_end = move |_| end_active_gesture(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            data-theme=move || theme_id.get()
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <MenuBar />
            <div class="window-layer">
                <For each=move || window_ids.get() key=|id| id.clone() let:window_id>
                    <DesktopWindow window_id=window_id />
                </For>
            </div>
            <Dock />
            <CommandPalette />
        </div>
    }
}

#[component]
fn MenuBar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let manager = runtime.manager;
    let active_title = move || {
        manager.with(|m| {
            m.active_window_id()
                .map(|id| m.catalog().title_for(id).to_string())
                .unwrap_or_else(|| "Desktop".to_string())
        })
    };

    view! {
        <header class="menu-bar" role="menubar">
            <span class="menu-bar-title">{active_title}</span>
            <nav class="menu-bar-themes" aria-label="Theme">
                {Theme::ALL
                    .into_iter()
                    .map(|theme| {
                        view! {
                            <button
                                class="menu-bar-item"
                                class:selected=move || manager.with(|m| m.state().theme == theme)
                                on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::SetTheme { theme })
                                }
                            >
                                {theme.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            <button
                class="menu-bar-item menu-bar-search"
                aria-label="Open command palette"
                on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleCommandPalette)
            >
                "⌘K"
            </button>
        </header>
    }
}

#[component]
fn Dock() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let manager = runtime.manager;
    let apps = manager.with_untracked(|m| m.catalog().entries().to_vec());

    view! {
        <nav class="dock" aria-label="Dock">
            {apps
                .into_iter()
                .map(|app| {
                    let window_id = store_value(app.window_id());
                    let is_open = move || {
                        manager.with(|m| {
                            window_id.with_value(|id| m.window(id).is_some_and(|w| w.is_open))
                        })
                    };
                    view! {
                        <button
                            id=app.window_id().dock_dom_id()
                            class="dock-item"
                            class:open=is_open
                            class:external=app.external
                            title=app.title.clone()
                            on:click=move |_| {
                                runtime.dispatch_action(DesktopAction::ActivateApp {
                                    window_id: window_id.get_value(),
                                })
                            }
                        >
                            <span class="dock-item-label">{app.title.clone()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}

/// `data-theme` value for the shell; `System` follows `prefers_dark` as it changes.
fn theme_css_id(manager: RwSignal<WindowManager>, prefers_dark: Signal<bool>) -> Memo<&'static str> {
    create_memo(move |_| {
        let theme = manager.with(|m| m.state().theme);
        resolve_theme(theme, prefers_dark.get()).css_id()
    })
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn end_active_gesture(runtime: DesktopRuntimeContext) {
    let Some(window_id) = runtime.gesture.with_untracked(|g| g.window_id().cloned()) else {
        return;
    };
    let rendered = runtime
        .host
        .with_value(|host| host.layout().anchor_rect(&LayoutAnchor::Window(window_id)));
    runtime.dispatch_action(DesktopAction::EndGesture { rendered });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn system_theme_tracks_color_scheme_changes() {
        let runtime = create_runtime();
        let manager = create_rw_signal(WindowManager::default());
        let prefers_dark = create_rw_signal(false);
        let theme_id = theme_css_id(manager, prefers_dark.into());

        assert_eq!(theme_id.get(), "light");
        prefers_dark.set(true);
        assert_eq!(theme_id.get(), "dark");

        manager.update(|m| {
            m.set_theme(Theme::Light);
        });
        assert_eq!(theme_id.get(), "light");
        prefers_dark.set(false);
        assert_eq!(theme_id.get(), "light");

        runtime.dispose();
    }
}
