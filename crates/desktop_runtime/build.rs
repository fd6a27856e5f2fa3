use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    schema_version: u32,
    #[serde(rename = "app")]
    apps: Vec<CatalogApp>,
    #[serde(rename = "project", default)]
    projects: Vec<CatalogProject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogProject {
    name: String,
    #[serde(default)]
    description: String,
    link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogApp {
    id: String,
    title: String,
    default_width: Option<i32>,
    default_height: Option<i32>,
    #[serde(default)]
    external: bool,
    url: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("apps.catalog.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: CatalogFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if catalog.schema_version != 1 {
        panic!(
            "catalog schema mismatch in {}: expected 1 found {}",
            path.display(),
            catalog.schema_version
        );
    }

    let mut seen = HashSet::new();
    for app in &catalog.apps {
        if app.id.trim().is_empty() {
            panic!("catalog entry with title `{}` has an empty id", app.title);
        }
        if !seen.insert(app.id.clone()) {
            panic!("duplicate catalog id `{}`", app.id);
        }
        if app.external && app.url.is_none() {
            panic!("external catalog entry `{}` is missing a url", app.id);
        }
        for (label, value) in [("default_width", app.default_width), ("default_height", app.default_height)] {
            if matches!(value, Some(px) if px <= 0) {
                panic!("catalog entry `{}` has non-positive {label}", app.id);
            }
        }
    }

    for project in &catalog.projects {
        if project.name.trim().is_empty() {
            panic!("project entry with link `{}` has an empty name", project.link);
        }
        if !(project.link.starts_with("https://") || project.link.starts_with("http://")) {
            panic!("project `{}` link must be an http(s) url", project.name);
        }
    }

    let json = serde_json::to_string_pretty(&catalog.apps).expect("serialize app catalog");
    let projects_json =
        serde_json::to_string_pretty(&catalog.projects).expect("serialize project links");
    let generated = format!(
        "/// Build-time generated application catalog JSON.\n\
pub const APP_CATALOG_JSON: &str = r##\"{}\"##;\n\
/// Build-time generated project link JSON.\n\
pub const PROJECT_LINKS_JSON: &str = r##\"{}\"##;\n",
        json, projects_json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
