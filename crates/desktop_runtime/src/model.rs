//! Window-manager data model: identifiers, geometry primitives, window records, transient
//! gesture state, and the persisted desktop snapshot.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DESKTOP_SNAPSHOT_SCHEMA_VERSION: u32 = 1;
/// Fixed height of the menu bar; no open window may sit above it.
pub const MENU_BAR_HEIGHT: i32 = 32;
/// Fixed height reserved for the dock at the bottom of the viewport.
pub const DOCK_HEIGHT: i32 = 62;
pub const MIN_WINDOW_WIDTH: i32 = 300;
pub const MIN_WINDOW_HEIGHT: i32 = 200;
pub const DEFAULT_WINDOW_WIDTH: i32 = 600;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 400;
/// Largest pixel magnitude accepted from stored or parsed geometry.
pub const MAX_PX: i32 = 1_000_000;
/// Starting value of the z-index counter; the first opened window receives `INITIAL_Z_INDEX + 1`.
pub const INITIAL_Z_INDEX: u32 = 10;

const FILL_AVAILABLE_TOKEN: &str = "100%";

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Stable application/window key. One record exists per id for the lifetime of the process.
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DOM id of the rendered window element.
    pub fn dom_id(&self) -> String {
        format!("window-{}", self.0)
    }

    /// DOM id of the dock icon that launches this window.
    pub fn dock_dom_id(&self) -> String {
        format!("dock-app-{}", self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pixel values may arrive fractional (bounding boxes, older snapshots); they are rounded.
mod px {
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        Ok(super::px_from_f64(f64::deserialize(deserializer)?))
    }
}

/// Rounds a length and pins it to `±MAX_PX` so later geometry math cannot overflow.
fn px_from_f64(value: f64) -> i32 {
    value.round().clamp(-(MAX_PX as f64), MAX_PX as f64) as i32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(deserialize_with = "px::deserialize")]
    pub x: i32,
    #[serde(deserialize_with = "px::deserialize")]
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One window dimension: an absolute pixel count or "fill the available area".
pub enum SizeSpec {
    Fixed(i32),
    FillAvailable,
}

impl SizeSpec {
    /// Resolves the dimension against the extent of the available area.
    pub fn resolve(self, available: i32) -> i32 {
        match self {
            Self::Fixed(px) => px,
            Self::FillAvailable => available.max(0),
        }
    }

    /// Parses a CSS-ish length (`"800"`, `"800px"`); anything else means fill.
    pub fn parse_css(text: &str) -> Self {
        let text = text.trim();
        let number = text.strip_suffix("px").unwrap_or(text).trim();
        number
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| Self::Fixed(px_from_f64(value)))
            .unwrap_or(Self::FillAvailable)
    }

    fn keep_fill_or(self, px: i32) -> Self {
        match self {
            Self::FillAvailable => Self::FillAvailable,
            Self::Fixed(_) => Self::Fixed(px),
        }
    }
}

impl Serialize for SizeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(px) => serializer.serialize_i32(*px),
            Self::FillAvailable => serializer.serialize_str(FILL_AVAILABLE_TOKEN),
        }
    }
}

impl<'de> Deserialize<'de> for SizeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(px) => Self::Fixed(px_from_f64(px)),
            Raw::Text(text) => Self::parse_css(&text),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: SizeSpec,
    pub height: SizeSpec,
}

impl WindowSize {
    pub const fn fixed(width: i32, height: i32) -> Self {
        Self {
            width: SizeSpec::Fixed(width),
            height: SizeSpec::Fixed(height),
        }
    }

    /// Replaces fixed dimensions with `width`/`height` while leaving fill dimensions as they are.
    pub fn with_fixed_dimensions(self, width: i32, height: i32) -> Self {
        Self {
            width: self.width.keep_fill_or(width),
            height: self.height.keep_fill_or(height),
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::fixed(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Concrete window rectangle in viewport pixels.
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Absolute bounding box, already net of fixed chrome.
pub struct Bounds {
    pub top: i32,
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn width(self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn contains(self, rect: WindowRect) -> bool {
        rect.x >= self.left
            && rect.y >= self.top
            && rect.right() <= self.right
            && rect.bottom() <= self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Browser viewport size, supplied by the hosting UI layer.
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Area between the menu bar and the dock.
    pub fn available_bounds(self) -> Bounds {
        Bounds {
            top: MENU_BAR_HEIGHT,
            left: 0,
            right: self.width,
            bottom: self.height - DOCK_HEIGHT,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Position and size captured before a window is maximized.
pub struct WindowGeometry {
    pub position: Point,
    pub size: WindowSize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowRecord {
    pub id: WindowId,
    pub position: Point,
    pub size: WindowSize,
    pub is_open: bool,
    pub is_minimized: bool,
    pub z_index: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub maximized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore: Option<WindowGeometry>,
}

impl WindowRecord {
    pub fn new(id: WindowId, position: Point, size: WindowSize, z_index: u32) -> Self {
        Self {
            id,
            position,
            size,
            is_open: true,
            is_minimized: false,
            z_index,
            maximized: false,
            restore: None,
        }
    }

    /// Concrete rectangle with fill dimensions resolved against `available`.
    pub fn rect(&self, available: Bounds) -> WindowRect {
        WindowRect {
            x: self.position.x,
            y: self.position.y,
            w: self.size.width.resolve(available.width()),
            h: self.size.height.resolve(available.height()),
        }
    }

    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry {
            position: self.position,
            size: self.size,
        }
    }

    /// Open and not minimized: rendered and eligible for focus.
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Theme actually painted once `System` has been resolved against the host preference.
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn css_id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

pub fn resolve_theme(theme: Theme, prefers_dark: bool) -> EffectiveTheme {
    match theme {
        Theme::Light => EffectiveTheme::Light,
        Theme::Dark => EffectiveTheme::Dark,
        Theme::System if prefers_dark => EffectiveTheme::Dark,
        Theme::System => EffectiveTheme::Light,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Process-wide desktop state owned by [`crate::window_manager::WindowManager`].
pub struct DesktopState {
    pub windows: BTreeMap<WindowId, WindowRecord>,
    pub active_window_id: Option<WindowId>,
    /// Most recently focused last; each id appears at most once.
    pub focus_history: Vec<WindowId>,
    pub max_z_index: u32,
    pub theme: Theme,
    pub command_palette_open: bool,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: BTreeMap::new(),
            active_window_id: None,
            focus_history: Vec::new(),
            max_z_index: INITIAL_Z_INDEX,
            theme: Theme::default(),
            command_palette_open: false,
        }
    }
}

impl DesktopState {
    pub fn snapshot(&self) -> DesktopSnapshot {
        DesktopSnapshot {
            schema_version: DESKTOP_SNAPSHOT_SCHEMA_VERSION,
            windows: self.windows.clone(),
            active_window_id: self.active_window_id.clone(),
            theme: self.theme,
            window_history: self.focus_history.clone(),
            max_z_index: Some(self.max_z_index),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Persisted shape of [`DesktopState`]; every field is optional on load.
pub struct DesktopSnapshot {
    pub schema_version: u32,
    pub windows: BTreeMap<WindowId, WindowRecord>,
    pub active_window_id: Option<WindowId>,
    pub theme: Theme,
    pub window_history: Vec<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_z_index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Resize handle: four corners and four edges.
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::North,
        ResizeEdge::South,
        ResizeEdge::East,
        ResizeEdge::West,
        ResizeEdge::NorthEast,
        ResizeEdge::NorthWest,
        ResizeEdge::SouthEast,
        ResizeEdge::SouthWest,
    ];

    pub fn touches_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn touches_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn touches_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn touches_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Compass shorthand used for handle class names (`"nw"`, `"e"`, ...).
    pub fn compass(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The single in-flight pointer gesture. Never persisted; reset on every pointer-up.
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(&session.window_id),
            Self::Resizing(session) => Some(&session.window_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn size_spec_accepts_numbers_pixel_strings_and_fill_tokens() {
        let size: WindowSize =
            serde_json::from_value(json!({ "width": 640.4, "height": "480px" })).unwrap();
        assert_eq!(size, WindowSize::fixed(640, 480));

        let fill: WindowSize =
            serde_json::from_value(json!({ "width": "100%", "height": "auto" })).unwrap();
        assert_eq!(fill.width, SizeSpec::FillAvailable);
        assert_eq!(fill.height, SizeSpec::FillAvailable);
        assert_eq!(
            serde_json::to_value(fill).unwrap(),
            json!({ "width": "100%", "height": "100%" })
        );
    }

    #[test]
    fn record_uses_camel_case_and_defaults_missing_fields() {
        let record: WindowRecord = serde_json::from_value(json!({
            "id": "about",
            "position": { "x": 120.6, "y": 64 },
            "isOpen": true,
            "zIndex": 14
        }))
        .unwrap();

        assert_eq!(record.position, Point::new(121, 64));
        assert_eq!(record.size, WindowSize::default());
        assert!(!record.is_minimized);
        assert!(!record.maximized);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("isMinimized").is_some());
        assert!(value.get("maximized").is_none());
    }

    #[test]
    fn fill_dimensions_resolve_against_available_bounds() {
        let mut record = WindowRecord::new(
            WindowId::from("projects"),
            Point::new(0, MENU_BAR_HEIGHT),
            WindowSize {
                width: SizeSpec::FillAvailable,
                height: SizeSpec::Fixed(300),
            },
            11,
        );
        let bounds = Viewport::new(1000, 700).available_bounds();
        assert_eq!(record.rect(bounds), WindowRect::new(0, 32, 1000, 300));

        record.size = record.size.with_fixed_dimensions(500, 250);
        assert_eq!(record.size.width, SizeSpec::FillAvailable);
        assert_eq!(record.size.height, SizeSpec::Fixed(250));
    }

    #[test]
    fn system_theme_follows_host_preference() {
        assert_eq!(resolve_theme(Theme::System, true), EffectiveTheme::Dark);
        assert_eq!(resolve_theme(Theme::System, false), EffectiveTheme::Light);
        assert_eq!(resolve_theme(Theme::Light, true), EffectiveTheme::Light);
    }

    #[test]
    fn resize_edges_report_the_sides_they_move() {
        assert!(ResizeEdge::NorthWest.touches_north() && ResizeEdge::NorthWest.touches_west());
        assert!(!ResizeEdge::East.touches_south());
        assert_eq!(
            ResizeEdge::ALL.iter().map(|edge| edge.compass()).collect::<Vec<_>>(),
            vec!["n", "s", "e", "w", "ne", "nw", "se", "sw"]
        );
    }
}
