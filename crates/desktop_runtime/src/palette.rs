//! Command palette: keyboard shortcut mapping, entry list, and search filtering.

use crate::{
    apps::AppCatalog,
    model::Theme,
    reducer::DesktopAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteGroup {
    Apps,
    Projects,
    Theme,
}

impl PaletteGroup {
    /// Render order of the palette sections.
    pub const ALL: [Self; 3] = [Self::Apps, Self::Projects, Self::Theme];

    pub fn heading(self) -> &'static str {
        match self {
            Self::Apps => "Apps",
            Self::Projects => "Projects",
            Self::Theme => "Theme",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub group: PaletteGroup,
    pub label: String,
    /// Right-aligned hint shown on the selected row.
    pub hint: &'static str,
    pub keywords: Vec<String>,
    /// Dispatched wrapped in [`DesktopAction::RunPaletteCommand`].
    pub action: DesktopAction,
}

impl PaletteEntry {
    /// Case-insensitive substring match on the label and keywords. Blank queries match.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.label.to_lowercase().contains(&query)
            || self
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&query))
    }

    pub fn command(&self) -> DesktopAction {
        DesktopAction::RunPaletteCommand(Box::new(self.action.clone()))
    }
}

/// Maps a keydown to a palette action: Cmd/Ctrl+K toggles, Escape closes an open palette.
pub fn palette_shortcut(
    key: &str,
    meta: bool,
    ctrl: bool,
    palette_open: bool,
) -> Option<DesktopAction> {
    if key.eq_ignore_ascii_case("k") && (meta || ctrl) {
        return Some(DesktopAction::ToggleCommandPalette);
    }
    if key == "Escape" && palette_open {
        return Some(DesktopAction::SetCommandPaletteOpen { open: false });
    }
    None
}

/// Catalog apps in declaration order, then project links, then the theme commands.
pub fn palette_entries(catalog: &AppCatalog) -> Vec<PaletteEntry> {
    let apps = catalog.entries().iter().map(|app| PaletteEntry {
        group: PaletteGroup::Apps,
        label: app.title.clone(),
        hint: if app.external {
            "Open External"
        } else {
            "Open App"
        },
        keywords: app.keywords.clone(),
        action: DesktopAction::ActivateApp {
            window_id: app.window_id(),
        },
    });

    let projects = catalog.projects().iter().map(|project| PaletteEntry {
        group: PaletteGroup::Projects,
        label: project.name.clone(),
        hint: "Open Link",
        keywords: vec![project.description.clone()],
        action: DesktopAction::OpenExternalUrl {
            url: project.link.clone(),
        },
    });

    let themes = Theme::ALL.into_iter().map(|theme| PaletteEntry {
        group: PaletteGroup::Theme,
        label: format!("{} Theme", theme.label()),
        hint: "Apply",
        keywords: vec!["appearance".to_string(), "mode".to_string()],
        action: DesktopAction::SetTheme { theme },
    });

    apps.chain(projects).chain(themes).collect()
}

pub fn filter_entries<'a>(entries: &'a [PaletteEntry], query: &str) -> Vec<&'a PaletteEntry> {
    entries.iter().filter(|entry| entry.matches(query)).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{apps::ProjectLink, model::WindowId};

    #[test]
    fn shortcut_toggles_with_either_modifier_and_escape_only_closes() {
        assert_eq!(
            palette_shortcut("k", true, false, false),
            Some(DesktopAction::ToggleCommandPalette)
        );
        assert_eq!(
            palette_shortcut("K", false, true, true),
            Some(DesktopAction::ToggleCommandPalette)
        );
        assert_eq!(palette_shortcut("k", false, false, false), None);
        assert_eq!(
            palette_shortcut("Escape", false, false, true),
            Some(DesktopAction::SetCommandPaletteOpen { open: false })
        );
        assert_eq!(palette_shortcut("Escape", false, false, false), None);
    }

    #[test]
    fn entries_list_apps_then_projects_then_themes() {
        let entries = palette_entries(&AppCatalog::builtin());
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Settings",
                "About Me",
                "Projects",
                "Journey",
                "GitHub",
                "Budget",
                "Groceries",
                "Retify",
                "System Theme",
                "Light Theme",
                "Dark Theme"
            ]
        );
        assert_eq!(entries[4].hint, "Open External");
        assert_eq!(entries[5].group, PaletteGroup::Projects);
        assert_eq!(entries[8].group, PaletteGroup::Theme);
        assert_eq!(
            entries[1].command(),
            DesktopAction::RunPaletteCommand(Box::new(DesktopAction::ActivateApp {
                window_id: WindowId::from("about"),
            }))
        );
    }

    #[test]
    fn search_matches_labels_and_keywords() {
        let entries = palette_entries(&AppCatalog::builtin());
        let hits: Vec<&str> = filter_entries(&entries, "  PORTfolio ")
            .into_iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(hits, vec!["Projects"]);

        let dark: Vec<&str> = filter_entries(&entries, "dark")
            .into_iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(dark, vec!["Settings", "Dark Theme"]);

        assert_eq!(filter_entries(&entries, "").len(), entries.len());
    }

    #[test]
    fn project_entries_open_their_link() {
        let catalog = AppCatalog::from_entries(Vec::new())
            .expect("empty catalog")
            .with_projects(vec![ProjectLink::new(
                "Retify",
                "A year-round Spotify Wrapped experience",
                "https://retify.example.com",
            )]);
        let entries = palette_entries(&catalog);
        let hits = filter_entries(&entries, "spotify");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hint, "Open Link");
        assert_eq!(
            hits[0].command(),
            DesktopAction::RunPaletteCommand(Box::new(DesktopAction::OpenExternalUrl {
                url: "https://retify.example.com".to_string(),
            }))
        );
    }
}
