use super::*;
use crate::{
    layout::open_animation_origin,
    model::{ResizeEdge, WindowId},
    view::window_view,
};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let manager = runtime.manager;

    // The open animation starts at the dock icon, measured once when the window mounts.
    let origin = manager.with_untracked(|m| {
        let width = m.window_rect(&window_id).map(|rect| rect.w).unwrap_or_default();
        let start = runtime.host.with_value(|host| {
            open_animation_origin(&host.layout(), &window_id, m.viewport(), width)
        });
        let at = m.window(&window_id).map(|w| w.position).unwrap_or_default();
        (start.x - at.x, start.y - at.y)
    });

    let dom_id = window_id.dom_id();
    let window_id = store_value(window_id);
    let window = create_memo(move |_| manager.with(|m| window_id.with_value(|id| window_view(m, id))));

    let focus = move |_: web_sys::PointerEvent| {
        let inactive = window.with(|w| w.as_ref().is_some_and(|w| !w.active));
        if inactive {
            runtime.dispatch_action(DesktopAction::FocusWindow {
                window_id: window_id.get_value(),
            });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id: window_id.get_value(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let toggle_maximize = move || {
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id: window_id.get_value(),
        })
    };
    let minimize = move || {
        runtime.dispatch_action(DesktopAction::MinimizeWindow {
            window_id: window_id.get_value(),
        })
    };
    let close = move || {
        runtime.dispatch_action(DesktopAction::CloseWindow {
            window_id: window_id.get_value(),
        })
    };

    let style = move || {
        window.with(|w| {
            w.as_ref()
                .map(|w| {
                    format!(
                        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};--open-from-x:{}px;--open-from-y:{}px;",
                        w.rect.x, w.rect.y, w.rect.w, w.rect.h, w.z_index, origin.0, origin.1
                    )
                })
                .unwrap_or_default()
        })
    };
    let title = move || window.with(|w| w.as_ref().map(|w| w.title.clone()).unwrap_or_default());
    let is_active = move || window.with(|w| w.as_ref().is_some_and(|w| w.active));
    let is_maximized = move || window.with(|w| w.as_ref().is_some_and(|w| w.maximized));

    view! {
        <section
            id=dom_id
            class="desktop-window"
            class:active=is_active
            class:maximized=is_maximized
            style=style
            tabindex="-1"
            role="dialog"
            aria-label=title
            on:pointerdown=focus
        >
            <header
                class="titlebar"
                on:pointerdown=begin_move
                on:dblclick=move |ev| {
                    stop_mouse_event(&ev);
                    toggle_maximize();
                }
            >
                <div class="titlebar-controls">
                    <button
                        class="titlebar-button close"
                        aria-label="Close window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            close();
                        }
                    />
                    <button
                        class="titlebar-button minimize"
                        aria-label="Minimize window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            minimize();
                        }
                    />
                    <button
                        class="titlebar-button maximize"
                        aria-label=move || {
                            if is_maximized() { "Restore window" } else { "Maximize window" }
                        }
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            toggle_maximize();
                        }
                    />
                </div>
                <span class="titlebar-title">{title}</span>
            </header>
            <div class="window-body">
                <WindowBody window_id=window_id.get_value() />
            </div>
            {ResizeEdge::ALL
                .into_iter()
                .map(|edge| view! { <WindowResizeHandle window_id=window_id.get_value() edge=edge /> })
                .collect_view()}
        </section>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle edge-{}", edge.compass());
    let window_id = store_value(window_id);

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id: window_id.get_value(),
            edge,
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! { <div class=class_name aria-hidden="true" on:pointerdown=on_pointerdown /> }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let title = runtime
        .manager
        .with_untracked(|m| m.catalog().title_for(&window_id).to_string());

    view! {
        <div class="window-body-content" data-app=window_id.to_string()>
            <h1>{title}</h1>
        </div>
    }
}
