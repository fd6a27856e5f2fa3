//! Window-manager runtime for a browser desktop shell.
//!
//! The headless core ([`window_manager`], [`interaction`], [`reconcile`], [`reducer`]) is plain
//! synchronous Rust and is tested without a browser. The Leptos provider and shell components
//! sit on top and only talk to the core through [`reducer::reduce_desktop`].

pub mod apps;
pub mod components;
mod effect_executor;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod palette;
pub mod persistence;
pub mod reconcile;
pub mod reducer;
mod runtime_context;
pub mod view;
pub mod window_manager;

pub use apps::{AppCatalog, AppDescriptor, CatalogError};
pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use host::DesktopHostContext;
pub use layout::{open_animation_origin, LayoutAnchor, LayoutQuery, StaticLayout};
pub use model::*;
pub use palette::{palette_entries, palette_shortcut, PaletteEntry};
pub use persistence::{load_snapshot, persist_snapshot, PersistenceError, SNAPSHOT_STORAGE_KEY};
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use view::{visible_windows, WindowView};
pub use window_manager::WindowManager;
