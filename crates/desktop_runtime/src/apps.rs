//! Application catalog: id -> title/default-size metadata consumed when seeding new windows.

use std::{collections::HashSet, sync::OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{WindowId, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

const FALLBACK_TITLE: &str = "Window";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub default_width: Option<i32>,
    #[serde(default)]
    pub default_height: Option<i32>,
    /// External entries open `url` outside the shell instead of a window.
    #[serde(default)]
    pub external: bool,
    #[serde(default)]
    pub url: Option<String>,
    /// Extra command-palette search terms.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl AppDescriptor {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            default_width: None,
            default_height: None,
            external: false,
            url: None,
            keywords: Vec::new(),
        }
    }

    pub fn with_default_size(mut self, width: i32, height: i32) -> Self {
        self.default_width = Some(width);
        self.default_height = Some(height);
        self
    }

    pub fn external_link(mut self, url: &str) -> Self {
        self.external = true;
        self.url = Some(url.to_string());
        self
    }

    pub fn window_id(&self) -> WindowId {
        WindowId::new(self.id.clone())
    }

    pub fn default_size(&self) -> (i32, i32) {
        (
            self.default_width.unwrap_or(DEFAULT_WINDOW_WIDTH),
            self.default_height.unwrap_or(DEFAULT_WINDOW_HEIGHT),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A project listed in the command palette; selecting it opens `link` outside the shell.
pub struct ProjectLink {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub link: String,
}

impl ProjectLink {
    pub fn new(name: &str, description: &str, link: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            link: link.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate catalog id `{0}`")]
    DuplicateId(String),
    #[error("catalog entry has an empty id")]
    EmptyId,
    #[error("external catalog entry `{0}` has no url")]
    MissingUrl(String),
    #[error("catalog entry `{id}` has non-positive {dimension}")]
    NonPositiveSize { id: String, dimension: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered, validated list of [`AppDescriptor`] entries plus the palette's project links.
pub struct AppCatalog {
    entries: Vec<AppDescriptor>,
    projects: Vec<ProjectLink>,
}

impl AppCatalog {
    /// Builds a catalog from explicit entries, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for empty or duplicate ids, external entries without a url, and
    /// default sizes that are zero or negative.
    pub fn from_entries(entries: Vec<AppDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            if entry.external && entry.url.is_none() {
                return Err(CatalogError::MissingUrl(entry.id.clone()));
            }
            for (dimension, value) in [
                ("default_width", entry.default_width),
                ("default_height", entry.default_height),
            ] {
                if matches!(value, Some(px) if px <= 0) {
                    return Err(CatalogError::NonPositiveSize {
                        id: entry.id.clone(),
                        dimension,
                    });
                }
            }
        }
        Ok(Self {
            entries,
            projects: Vec::new(),
        })
    }

    /// Replaces the project links shown in the command palette.
    pub fn with_projects(mut self, projects: Vec<ProjectLink>) -> Self {
        self.projects = projects;
        self
    }

    /// The catalog compiled from `apps.catalog.toml`.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries().to_vec(),
            projects: builtin_projects().to_vec(),
        }
    }

    pub fn entries(&self) -> &[AppDescriptor] {
        &self.entries
    }

    pub fn projects(&self) -> &[ProjectLink] {
        &self.projects
    }

    pub fn get(&self, id: &WindowId) -> Option<&AppDescriptor> {
        self.entries.iter().find(|entry| entry.id == id.as_str())
    }

    pub fn title_for(&self, id: &WindowId) -> &str {
        self.get(id)
            .map(|entry| entry.title.as_str())
            .unwrap_or(FALLBACK_TITLE)
    }

    /// Default size used at first open; unknown ids get the global default.
    pub fn default_size_for(&self, id: &WindowId) -> (i32, i32) {
        self.get(id)
            .map(AppDescriptor::default_size)
            .unwrap_or((DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT))
    }

    /// The url an external entry opens, or `None` for windowed apps.
    pub fn external_url_for(&self, id: &WindowId) -> Option<&str> {
        self.get(id)
            .filter(|entry| entry.external)
            .and_then(|entry| entry.url.as_deref())
    }
}

impl Default for AppCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_entries() -> &'static [AppDescriptor] {
    static CATALOG: OnceLock<Vec<AppDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        serde_json::from_str(APP_CATALOG_JSON).expect("generated app catalog should parse")
    })
}

fn builtin_projects() -> &'static [ProjectLink] {
    static PROJECTS: OnceLock<Vec<ProjectLink>> = OnceLock::new();
    PROJECTS.get_or_init(|| {
        serde_json::from_str(PROJECT_LINKS_JSON).expect("generated project links should parse")
    })
}
