//! Layout persistence: the live layout plus four named save slots.
//!
//! The live layout (`layout-current.json`) is rewritten after every edit so a
//! restarted session comes back where it left off. The named slots hold
//! operator-curated arrangements that startup can restore.
//!
//! # Fallback Chain
//!
//! ```text
//! requested slot → grid template → factory layout
//! ```
//!
//! A missing or corrupt slot never blocks startup; resolution walks down the
//! chain until something usable appears. Corrupt files are reported, not
//! fatal.
//!
//! # Persistence Strategy
//!
//! Atomic write: serialize → temp file → fsync → rename over target, so a
//! crash mid-save leaves the previous file intact.

use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::core::paths::{LAYOUT_CURRENT_FILE, LAYOUT_CUSTOM_PREFIX, LAYOUT_SAVED_FILE};
use crate::layout::builders::{build_grid_layout, grid_min_size, looks_like_auto_cascade};
use crate::layout::engine::{normalize, normalize_with_min};
use crate::layout::panel::{Layout, Viewport};

// ──────────────────────── save slots ────────────────────────

/// Named layout save slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveSlot {
    /// The default "saved" slot.
    Saved,
    Custom1,
    Custom2,
    Custom3,
}

impl SaveSlot {
    /// All slots in display order.
    pub const ALL: [Self; 4] = [Self::Saved, Self::Custom1, Self::Custom2, Self::Custom3];

    /// File name for this slot inside the state directory.
    #[must_use]
    pub fn file_name(self) -> String {
        match self {
            Self::Saved => LAYOUT_SAVED_FILE.to_string(),
            Self::Custom1 => format!("{LAYOUT_CUSTOM_PREFIX}1.json"),
            Self::Custom2 => format!("{LAYOUT_CUSTOM_PREFIX}2.json"),
            Self::Custom3 => format!("{LAYOUT_CUSTOM_PREFIX}3.json"),
        }
    }

    /// Parse a slot name as used in preferences and on the CLI.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "saved" => Some(Self::Saved),
            "custom1" => Some(Self::Custom1),
            "custom2" => Some(Self::Custom2),
            "custom3" => Some(Self::Custom3),
            _ => None,
        }
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved => write!(f, "saved"),
            Self::Custom1 => write!(f, "custom1"),
            Self::Custom2 => write!(f, "custom2"),
            Self::Custom3 => write!(f, "custom3"),
        }
    }
}

// ──────────────────────── load outcome ────────────────────────

/// Outcome of loading the live layout.
#[derive(Debug)]
pub enum LayoutLoad {
    /// Parsed successfully (unknown panel ids were dropped, absent panels
    /// filled from the factory layout).
    Loaded(Layout),
    /// File not found. Normal for a first launch.
    Missing,
    /// File exists but is unparseable.
    Corrupt { details: String },
    /// I/O error reading the file.
    IoError { details: String },
}

impl LayoutLoad {
    /// The effective layout regardless of load status.
    #[must_use]
    pub fn into_layout(self) -> Layout {
        match self {
            Self::Loaded(layout) => layout,
            Self::Missing | Self::Corrupt { .. } | Self::IoError { .. } => Layout::default(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Missing)
    }
}

// ──────────────────────── store ────────────────────────

/// File-backed layout store rooted at a state directory.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(LAYOUT_CURRENT_FILE)
    }

    fn slot_path(&self, slot: SaveSlot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    /// Load the live layout. Corruption falls back to the factory layout via
    /// [`LayoutLoad::into_layout`]; the caller decides whether to log.
    #[must_use]
    pub fn load_current(&self) -> LayoutLoad {
        read_layout(&self.current_path())
    }

    /// Persist the live layout atomically.
    pub fn save_current(&self, layout: &Layout) -> io::Result<PathBuf> {
        write_layout(layout, &self.current_path())
    }

    /// Load a named slot. Missing, corrupt, and unreadable slots all resolve
    /// to `None` so startup can walk the fallback chain.
    #[must_use]
    pub fn load_slot(&self, slot: SaveSlot) -> Option<Layout> {
        match read_layout(&self.slot_path(slot)) {
            LayoutLoad::Loaded(layout) => Some(layout),
            LayoutLoad::Missing | LayoutLoad::Corrupt { .. } | LayoutLoad::IoError { .. } => None,
        }
    }

    /// Persist a layout into a named slot atomically.
    pub fn save_slot(&self, slot: SaveSlot, layout: &Layout) -> io::Result<PathBuf> {
        write_layout(layout, &self.slot_path(slot))
    }
}

// ──────────────────────── startup resolution ────────────────────────

/// Resolve the layout a fresh session should start with.
///
/// `startup_slot` of `None` requests the grid template. A requested slot that
/// fails to load falls back to the grid, as does a slot holding an untouched
/// auto-cascade ([`looks_like_auto_cascade`]) since that was never a curated
/// arrangement. A resolved layout with zero visible panels falls back to the
/// factory layout (an all-hidden dashboard is never a useful start state).
/// Missing z indexes are seeded in canonical order.
#[must_use]
pub fn resolve_startup_layout(
    store: &LayoutStore,
    startup_slot: Option<SaveSlot>,
    vp: Viewport,
) -> Layout {
    let saved = startup_slot
        .and_then(|slot| store.load_slot(slot))
        .filter(|layout| !looks_like_auto_cascade(layout));
    let mut layout = match saved {
        Some(mut layout) => {
            normalize(&mut layout, vp);
            layout
        }
        None => {
            let mut grid = build_grid_layout(vp);
            let (min_w, min_h) = grid_min_size(vp);
            normalize_with_min(&mut grid, vp, min_w, min_h);
            grid
        }
    };
    if !layout.any_visible() {
        layout = Layout::default();
        normalize(&mut layout, vp);
    }
    layout.seed_missing_z();
    layout
}

// ──────────────────────── file helpers ────────────────────────

fn read_layout(path: &Path) -> LayoutLoad {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return LayoutLoad::Missing,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return LayoutLoad::Corrupt {
                details: format!("{e}"),
            };
        }
        Err(e) => {
            return LayoutLoad::IoError {
                details: format!("{e}"),
            };
        }
    };

    match serde_json::from_str::<Layout>(&content) {
        Ok(layout) => LayoutLoad::Loaded(layout),
        Err(e) => LayoutLoad::Corrupt {
            details: format!("{e}"),
        },
    }
}

fn write_layout(layout: &Layout, path: &Path) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(layout)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    // Temp file in the same directory so the rename stays on one filesystem.
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;

    Ok(path.to_path_buf())
}

// ──────────────────────── tests ────────────────────────
