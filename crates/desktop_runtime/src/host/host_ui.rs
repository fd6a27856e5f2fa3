#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use crate::{
    layout::{LayoutAnchor, LayoutQuery},
    model::{Viewport, WindowRect},
};

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Debug, Clone, Copy, Default)]
/// [`LayoutQuery`] that measures rendered elements by their DOM ids.
pub struct DomLayout;

impl LayoutQuery for DomLayout {
    fn anchor_rect(&self, anchor: &LayoutAnchor) -> Option<WindowRect> {
        let dom_id = match anchor {
            LayoutAnchor::DockIcon(window_id) => window_id.dock_dom_id(),
            LayoutAnchor::Window(window_id) => window_id.dom_id(),
        };
        element_rect(&dom_id)
    }
}

pub(super) fn viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value.round() as i32);
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value.round() as i32);
            if let (Some(width), Some(height)) = (width, height) {
                return Viewport::new(width, height);
            }
        }
    }

    Viewport::default()
}

pub(super) fn prefers_dark() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.match_media(DARK_SCHEME_QUERY).ok().flatten())
            .map(|query| query.matches())
            .unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = DARK_SCHEME_QUERY;
        false
    }
}

/// Keeps a `prefers-color-scheme` change listener attached until dropped.
pub struct ColorSchemeWatch {
    #[cfg(target_arch = "wasm32")]
    attached: Option<(
        web_sys::MediaQueryList,
        Closure<dyn FnMut(web_sys::MediaQueryListEvent)>,
    )>,
}

impl Drop for ColorSchemeWatch {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        if let Some((query, listener)) = self.attached.take() {
            let _ = query
                .remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
        }
    }
}

/// Calls `on_change` with the new dark-scheme preference whenever the OS setting flips.
pub(super) fn watch_color_scheme(on_change: impl Fn(bool) + 'static) -> ColorSchemeWatch {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(query) =
            web_sys::window().and_then(|window| window.match_media(DARK_SCHEME_QUERY).ok().flatten())
        else {
            return ColorSchemeWatch { attached: None };
        };
        let listener = Closure::<dyn FnMut(web_sys::MediaQueryListEvent)>::new(
            move |ev: web_sys::MediaQueryListEvent| on_change(ev.matches()),
        );
        if query
            .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
            .is_err()
        {
            leptos::logging::warn!("color scheme listener could not be attached");
            return ColorSchemeWatch { attached: None };
        }
        ColorSchemeWatch {
            attached: Some((query, listener)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = on_change;
        ColorSchemeWatch {}
    }
}

fn element_rect(dom_id: &str) -> Option<WindowRect> {
    #[cfg(target_arch = "wasm32")]
    {
        let element = web_sys::window()?.document()?.get_element_by_id(dom_id)?;
        let rect = element.get_bounding_client_rect();
        Some(WindowRect::new(
            rect.x().round() as i32,
            rect.y().round() as i32,
            rect.width().round() as i32,
            rect.height().round() as i32,
        ))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = dom_id;
        None
    }
}

/// Focuses `dom_id` on the next tick, after the element has been rendered.
pub(super) fn focus_element_soon(dom_id: String) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let element = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(&dom_id))
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
            if let Some(element) = element {
                let _ = element.focus();
            }
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = dom_id;
}
