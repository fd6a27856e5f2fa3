//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Off `wasm32` every adapter degrades to a no-op so the desktop runtime can be built and tested
//! natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod external_url;
pub mod storage;

pub use external_url::WebExternalUrlService;
pub use storage::local_prefs::WebPrefsStore;

/// Preference store used by the browser host.
pub fn prefs_store() -> WebPrefsStore {
    WebPrefsStore
}

/// External URL service used by the browser host.
pub fn external_url_service() -> WebExternalUrlService {
    WebExternalUrlService
}
