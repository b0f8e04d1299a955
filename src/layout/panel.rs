//! Panel model: kinds, rectangles, entries, and the layout map.
//!
//! A `Layout` always carries an entry for every panel kind. Persisted
//! layouts are merged over the built-in default on load, and unknown panel
//! ids in stored data are silently ignored, so schema drift never breaks
//! startup.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minimum panel width in workspace pixels.
pub const MIN_PANEL_W: f64 = 180.0;
/// Minimum panel height in workspace pixels.
pub const MIN_PANEL_H: f64 = 140.0;

/// Rect a panel restores to when un-maximizing without a stored `prev`.
pub const RESTORE_FALLBACK: PanelRect = PanelRect {
    x: 20.0,
    y: 20.0,
    w: 400.0,
    h: 300.0,
};

/// Workspace viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub w: f64,
    pub h: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// The dashboard's panels, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PanelKind {
    Position,
    Sky,
    Snr,
    Map,
    Altitude,
    Time,
    Speed,
    Cog,
}

impl PanelKind {
    /// Every panel kind, canonical order.
    pub const ALL: [Self; 8] = [
        Self::Position,
        Self::Sky,
        Self::Snr,
        Self::Map,
        Self::Altitude,
        Self::Time,
        Self::Speed,
        Self::Cog,
    ];

    /// Stable persisted identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Sky => "sky",
            Self::Snr => "snr",
            Self::Map => "map",
            Self::Altitude => "alt",
            Self::Time => "time",
            Self::Speed => "speed",
            Self::Cog => "cog",
        }
    }

    /// Parse a persisted identifier. Unknown ids yield `None`.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Human-readable title for CLI output.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::Sky => "Sky view",
            Self::Snr => "Signal levels",
            Self::Map => "Map",
            Self::Altitude => "Altimeter",
            Self::Time => "Clock",
            Self::Speed => "Speedometer",
            Self::Cog => "Course",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Axis-aligned panel rectangle in workspace pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Default for PanelRect {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: MIN_PANEL_W,
            h: MIN_PANEL_H,
        }
    }
}

impl PanelRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Full state of one panel.
///
/// `z` is the stacking order; 0 means "not yet assigned" and gets seeded
/// on apply. `prev` holds the pre-maximize rect for restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelEntry {
    #[serde(flatten)]
    pub rect: PanelRect,
    pub hidden: bool,
    pub maximized: bool,
    pub z: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PanelRect>,
}

impl Default for PanelEntry {
    fn default() -> Self {
        Self {
            rect: PanelRect::default(),
            hidden: false,
            maximized: false,
            z: 0,
            prev: None,
        }
    }
}

impl PanelEntry {
    #[must_use]
    pub const fn at(x: f64, y: f64, w: f64, h: f64, z: u64) -> Self {
        Self {
            rect: PanelRect::new(x, y, w, h),
            hidden: false,
            maximized: false,
            z,
            prev: None,
        }
    }
}

/// A complete panel layout: one entry per [`PanelKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    entries: BTreeMap<PanelKind, PanelEntry>,
}

impl Default for Layout {
    /// The factory layout, tuned for a 1920×1080 workspace.
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(PanelKind::Position, PanelEntry::at(0.0, 0.0, 380.0, 418.0, 717));
        entries.insert(PanelKind::Sky, PanelEntry::at(669.0, 0.0, 728.0, 416.0, 741));
        entries.insert(PanelKind::Snr, PanelEntry::at(0.0, 416.0, 499.0, 427.0, 752));
        entries.insert(PanelKind::Map, PanelEntry::at(1397.0, 0.0, 470.0, 839.0, 755));
        entries.insert(PanelKind::Altitude, PanelEntry::at(499.0, 415.0, 294.0, 428.0, 751));
        entries.insert(PanelKind::Time, PanelEntry::at(379.0, 0.0, 292.0, 417.0, 720));
        entries.insert(PanelKind::Speed, PanelEntry::at(792.0, 416.0, 305.0, 425.0, 759));
        entries.insert(PanelKind::Cog, PanelEntry::at(1098.0, 416.0, 301.0, 427.0, 744));
        Self { entries }
    }
}

impl Layout {
    /// Entry for a panel kind. Every kind is always present.
    #[must_use]
    pub fn get(&self, kind: PanelKind) -> &PanelEntry {
        &self.entries[&kind]
    }

    /// Mutable entry for a panel kind.
    pub fn get_mut(&mut self, kind: PanelKind) -> &mut PanelEntry {
        self.entries
            .entry(kind)
            .or_insert_with(PanelEntry::default)
    }

    /// Iterate entries in canonical panel order.
    pub fn iter(&self) -> impl Iterator<Item = (PanelKind, &PanelEntry)> {
        self.entries.iter().map(|(k, e)| (*k, e))
    }

    /// Iterate entries mutably, canonical order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PanelKind, &mut PanelEntry)> {
        self.entries.iter_mut().map(|(k, e)| (*k, e))
    }

    /// Whether any panel is visible.
    #[must_use]
    pub fn any_visible(&self) -> bool {
        self.entries.values().any(|e| !e.hidden)
    }

    /// Visible panel kinds, canonical order.
    #[must_use]
    pub fn visible_kinds(&self) -> Vec<PanelKind> {
        self.iter()
            .filter(|(_, e)| !e.hidden)
            .map(|(k, _)| k)
            .collect()
    }

    /// Highest assigned z index (0 when none assigned yet).
    #[must_use]
    pub fn max_z(&self) -> u64 {
        self.entries.values().map(|e| e.z).max().unwrap_or(0)
    }

    /// Assign `idx + 1` to any entry whose z is still unset.
    pub fn seed_missing_z(&mut self) {
        for (idx, entry) in self.entries.values_mut().enumerate() {
            if entry.z == 0 {
                entry.z = idx as u64 + 1;
            }
        }
    }
}

// Stored form is a JSON object keyed by panel id. Unknown keys are ignored
// and missing panels fall back to the factory entry.
impl Serialize for Layout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, entry) in &self.entries {
            map.serialize_entry(kind.id(), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LayoutVisitor;

        impl<'de> Visitor<'de> for LayoutVisitor {
            type Value = Layout;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of panel id to panel entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Layout, A::Error> {
                let mut layout = Layout::default();
                while let Some(key) = access.next_key::<String>()? {
                    match PanelKind::from_id(&key) {
                        Some(kind) => {
                            let entry = access.next_value::<PanelEntry>()?;
                            layout.entries.insert(kind, entry);
                        }
                        None => {
                            let _ = access.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(layout)
            }
        }

        deserializer.deserialize_map(LayoutVisitor)
    }
}

// ──────────────────────── tests ────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_covers_every_kind() {
        let layout = Layout::default();
        for kind in PanelKind::ALL {
            let entry = layout.get(kind);
            assert!(!entry.hidden);
            assert!(!entry.maximized);
            assert!(entry.z > 0, "{kind} should carry a factory z");
        }
    }

    #[test]
    fn default_layout_factory_rects() {
        let layout = Layout::default();
        let pos = layout.get(PanelKind::Position);
        assert_eq!(pos.rect, PanelRect::new(0.0, 0.0, 380.0, 418.0));
        assert_eq!(pos.z, 717);
        let speed = layout.get(PanelKind::Speed);
        assert_eq!(speed.z, 759);
        assert_eq!(layout.max_z(), 759);
    }

    #[test]
    fn kind_id_roundtrip() {
        for kind in PanelKind::ALL {
            assert_eq!(PanelKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PanelKind::from_id("bogus"), None);
    }

    #[test]
    fn serde_roundtrip() {
        let mut layout = Layout::default();
        layout.get_mut(PanelKind::Sky).hidden = true;
        layout.get_mut(PanelKind::Map).prev = Some(PanelRect::new(1.0, 2.0, 300.0, 200.0));
        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(layout, back);
    }

    #[test]
    fn deserialize_merges_over_defaults() {
        let json = r#"{"sky": {"x": 5, "y": 6, "w": 400, "h": 300, "hidden": true}}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert!(layout.get(PanelKind::Sky).hidden);
        assert_eq!(layout.get(PanelKind::Sky).rect.x, 5.0);
        // Untouched panels keep the factory entry.
        assert_eq!(
            layout.get(PanelKind::Position).rect,
            Layout::default().get(PanelKind::Position).rect
        );
    }

    #[test]
    fn deserialize_ignores_unknown_panel_ids() {
        let json = r#"{"weather": {"x": 1, "y": 2, "w": 100, "h": 100}, "time": {"x": 9, "y": 9, "w": 200, "h": 150}}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.get(PanelKind::Time).rect.x, 9.0);
    }

    #[test]
    fn entry_flattens_rect_fields() {
        let entry = PanelEntry::at(10.0, 20.0, 300.0, 200.0, 4);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["x"], 10.0);
        assert_eq!(json["w"], 300.0);
        assert_eq!(json["z"], 4);
        assert!(json.get("prev").is_none());
    }

    #[test]
    fn seed_missing_z_uses_canonical_position() {
        let mut layout = Layout::default();
        for (_, entry) in layout.iter_mut() {
            entry.z = 0;
        }
        layout.get_mut(PanelKind::Map).z = 99;
        layout.seed_missing_z();
        // Position is first in canonical order.
        assert_eq!(layout.get(PanelKind::Position).z, 1);
        assert_eq!(layout.get(PanelKind::Map).z, 99);
        assert_eq!(layout.get(PanelKind::Cog).z, 8);
    }

    #[test]
    fn visible_kinds_skips_hidden() {
        let mut layout = Layout::default();
        layout.get_mut(PanelKind::Snr).hidden = true;
        let visible = layout.visible_kinds();
        assert_eq!(visible.len(), 7);
        assert!(!visible.contains(&PanelKind::Snr));
    }
}
