//! Opens external links in a new browser tab.

use platform_host::{ExternalUrlFuture, ExternalUrlService};

#[derive(Debug, Clone, Copy, Default)]
/// External URL adapter backed by `window.open(url, "_blank")`.
pub struct WebExternalUrlService;

impl ExternalUrlService for WebExternalUrlService {
    fn open_url<'a>(&'a self, url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
                window
                    .open_with_url_and_target(url, "_blank")
                    .map(|_| ())
                    .map_err(|e| format!("window.open failed: {e:?}"))
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = url;
                Err("external urls require a browser host".to_string())
            }
        })
    }
}
