//! Snapshot persistence: a lenient JSON codec plus load/save over a [`PrefsStore`].

use std::collections::BTreeMap;

use platform_host::PrefsStore;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{
    DesktopSnapshot, WindowId, WindowRecord, WindowSize, DESKTOP_SNAPSHOT_SCHEMA_VERSION,
};

/// Storage key holding the desktop snapshot.
pub const SNAPSHOT_STORAGE_KEY: &str = "os-storage";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("prefs store failed: {0}")]
    Store(String),
    #[error("snapshot is not valid json: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("snapshot payload is not a json object")]
    NotAnObject,
}

/// Decodes a stored snapshot one field at a time.
///
/// Missing or malformed fields fall back to their defaults, down to the fields of each window
/// record; only window entries that are not objects are dropped. An unparseable or non-object
/// payload is the only error. A `{"state": ..,
/// "version": ..}` envelope written by older builds is unwrapped first.
///
/// # Errors
///
/// Returns [`PersistenceError::Malformed`] for invalid JSON and
/// [`PersistenceError::NotAnObject`] when the payload is not an object.
pub fn decode_snapshot(raw: &str) -> Result<DesktopSnapshot, PersistenceError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut root) = value else {
        return Err(PersistenceError::NotAnObject);
    };
    if root.contains_key("version") {
        if let Some(Value::Object(state)) = root.remove("state") {
            root = state;
        }
    }

    let windows = match root.remove("windows") {
        Some(Value::Object(entries)) => decode_windows(entries),
        _ => Default::default(),
    };

    Ok(DesktopSnapshot {
        schema_version: field(&mut root, "schemaVersion")
            .unwrap_or(DESKTOP_SNAPSHOT_SCHEMA_VERSION),
        windows,
        active_window_id: field(&mut root, "activeWindowId"),
        theme: field(&mut root, "theme").unwrap_or_default(),
        window_history: match root.remove("windowHistory") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<WindowId>(item).ok())
                .collect(),
            _ => Vec::new(),
        },
        max_z_index: field(&mut root, "maxZIndex"),
    })
}

/// # Errors
///
/// Returns [`PersistenceError::Malformed`] if serialization fails.
pub fn encode_snapshot(snapshot: &DesktopSnapshot) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Loads the stored snapshot. Store failures and undecodable payloads are logged and treated as
/// "nothing stored" so boot always proceeds.
pub async fn load_snapshot(store: &dyn PrefsStore) -> Option<DesktopSnapshot> {
    let raw = match store.load_pref(SNAPSHOT_STORAGE_KEY).await {
        Ok(raw) => raw?,
        Err(err) => {
            leptos::logging::warn!("desktop snapshot load failed: {err}");
            return None;
        }
    };
    match decode_snapshot(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            leptos::logging::warn!("discarding stored desktop snapshot: {err}");
            None
        }
    }
}

/// Writes `snapshot` under [`SNAPSHOT_STORAGE_KEY`].
///
/// # Errors
///
/// Returns [`PersistenceError::Store`] when the store rejects the write.
pub async fn persist_snapshot(
    store: &dyn PrefsStore,
    snapshot: &DesktopSnapshot,
) -> Result<(), PersistenceError> {
    let raw = encode_snapshot(snapshot)?;
    store
        .save_pref(SNAPSHOT_STORAGE_KEY, &raw)
        .await
        .map_err(PersistenceError::Store)
}

fn field<T: DeserializeOwned>(root: &mut Map<String, Value>, key: &str) -> Option<T> {
    root.remove(key)
        .and_then(|value| serde_json::from_value(value).ok())
}

fn decode_windows(entries: Map<String, Value>) -> BTreeMap<WindowId, WindowRecord> {
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let Value::Object(fields) = value else {
                leptos::logging::warn!("dropping stored window `{key}`: not an object");
                return None;
            };
            let id = WindowId::new(key);
            Some((id.clone(), decode_record(id, fields)))
        })
        .collect()
}

/// Decodes one window record field by field; anything malformed keeps its default.
fn decode_record(id: WindowId, mut fields: Map<String, Value>) -> WindowRecord {
    let defaults = WindowRecord::default();
    let size = match fields.remove("size") {
        Some(Value::Object(mut size)) => WindowSize {
            width: field(&mut size, "width").unwrap_or(defaults.size.width),
            height: field(&mut size, "height").unwrap_or(defaults.size.height),
        },
        _ => defaults.size,
    };

    WindowRecord {
        id,
        position: field(&mut fields, "position").unwrap_or(defaults.position),
        size,
        is_open: field(&mut fields, "isOpen").unwrap_or(defaults.is_open),
        is_minimized: field(&mut fields, "isMinimized").unwrap_or(defaults.is_minimized),
        z_index: field(&mut fields, "zIndex").unwrap_or(defaults.z_index),
        maximized: field(&mut fields, "maximized").unwrap_or(defaults.maximized),
        restore: field(&mut fields, "restore"),
    }
}
