//! Dashboard preferences with safe atomic persistence.
//!
//! Preferences hold the cross-session knobs that are not layout geometry:
//! which layout the dashboard opens with, plus the display settings the
//! rendering collaborators consume (theme, units, widget modes). Persistence
//! failures never block startup.
//!
//! # Merge Order
//!
//! ```text
//! compiled defaults → persisted preferences → CLI/session overrides
//! ```
//!
//! Overrides win; lower layers provide fallback when higher layers are absent
//! or invalid.
//!
//! # Persistence Strategy
//!
//! Atomic write: serialize → temp file → fsync → rename over target. Debounce
//! coalesces rapid changes into a single write.

use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::paths::{resolve_state_dir, PREFERENCES_FILE};
use crate::layout::store::SaveSlot;

// ──────────────────── schema version ────────────────────

/// Current schema version. Bump when adding fields that older versions
/// wouldn't understand. `#[serde(default)]` covers additive changes without
/// a bump.
const SCHEMA_VERSION: u32 = 1;

/// Minimum debounce interval between persisted writes.
const WRITE_DEBOUNCE: Duration = Duration::from_secs(2);

// ──────────────────── core preferences ────────────────────

/// Persisted dashboard preferences.
///
/// Every field has a compiled default so the dashboard works without a
/// preferences file. Display preferences are stored for the rendering
/// collaborators; the core never interprets them beyond validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPrefs {
    /// Schema version for migration detection.
    pub schema_version: u32,

    /// Which layout to restore on startup.
    #[serde(default)]
    pub startup_layout: StartupLayout,

    /// Day/night color scheme.
    #[serde(default)]
    pub theme: Theme,

    /// SNR panel chart style.
    #[serde(default)]
    pub snr_chart: SnrChartMode,

    #[serde(default)]
    pub map: MapPrefs,

    #[serde(default)]
    pub altimeter: AltimeterPrefs,

    #[serde(default)]
    pub time: TimePrefs,

    #[serde(default)]
    pub speed: SpeedPrefs,

    /// Course panel widget style.
    #[serde(default)]
    pub cog_mode: WidgetMode,
}

impl Default for DashboardPrefs {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            startup_layout: StartupLayout::default(),
            theme: Theme::default(),
            snr_chart: SnrChartMode::default(),
            map: MapPrefs::default(),
            altimeter: AltimeterPrefs::default(),
            time: TimePrefs::default(),
            speed: SpeedPrefs::default(),
            cog_mode: WidgetMode::default(),
        }
    }
}

// ──────────────────── preference enums ────────────────────

/// Startup layout choice: the synthesized grid or one of the save slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupLayout {
    #[default]
    Grid,
    Saved,
    Custom1,
    Custom2,
    Custom3,
}

impl StartupLayout {
    /// The save slot to restore, or `None` for the grid template.
    #[must_use]
    pub fn slot(self) -> Option<SaveSlot> {
        match self {
            Self::Grid => None,
            Self::Saved => Some(SaveSlot::Saved),
            Self::Custom1 => Some(SaveSlot::Custom1),
            Self::Custom2 => Some(SaveSlot::Custom2),
            Self::Custom3 => Some(SaveSlot::Custom3),
        }
    }

    /// Parse a name as used on the CLI.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "grid" => Some(Self::Grid),
            other => SaveSlot::from_name(other).map(Self::from_slot),
        }
    }

    #[must_use]
    pub fn from_slot(slot: SaveSlot) -> Self {
        match slot {
            SaveSlot::Saved => Self::Saved,
            SaveSlot::Custom1 => Self::Custom1,
            SaveSlot::Custom2 => Self::Custom2,
            SaveSlot::Custom3 => Self::Custom3,
        }
    }
}

impl fmt::Display for StartupLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::Saved => write!(f, "saved"),
            Self::Custom1 => write!(f, "custom1"),
            Self::Custom2 => write!(f, "custom2"),
            Self::Custom3 => write!(f, "custom3"),
        }
    }
}

// ──────────────────── display preferences ────────────────────

/// Color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Night,
    Day,
}

/// SNR panel chart style: per-satellite bars or the windowed history lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnrChartMode {
    #[default]
    Bars,
    History,
}

/// Widget rendering style shared by the dial-style panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetMode {
    #[default]
    Dial,
    Digital,
}

/// Map orientation: north-up or rotated to the course over ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapRotation {
    #[default]
    North,
    Cog,
}

/// Time zone shown by the clock panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneChoice {
    #[default]
    Utc,
    Local,
}

/// Altitude display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeUnits {
    #[default]
    Meters,
    Feet,
}

/// Speed display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnits {
    Knots,
    #[default]
    Kmh,
    Mph,
}

/// Map panel preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPrefs {
    /// Keep the map centered on the current position.
    pub follow: bool,
    pub rotation: MapRotation,
    /// Draw the projected heading vector.
    pub vector: bool,
}

impl Default for MapPrefs {
    fn default() -> Self {
        Self {
            follow: true,
            rotation: MapRotation::default(),
            vector: true,
        }
    }
}

/// Altimeter panel preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltimeterPrefs {
    pub units: AltitudeUnits,
    pub mode: WidgetMode,
    /// Full-scale altitude of the dial, in the configured units.
    pub scale: u32,
}

/// Dial scale bounds for the altimeter.
pub const ALTIMETER_SCALE_RANGE: (u32, u32) = (10, 10_000);

impl Default for AltimeterPrefs {
    fn default() -> Self {
        Self {
            units: AltitudeUnits::default(),
            mode: WidgetMode::default(),
            scale: 100,
        }
    }
}

/// Clock panel preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePrefs {
    pub zone: TimeZoneChoice,
    pub mode: WidgetMode,
}

/// Speed panel preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedPrefs {
    pub units: SpeedUnits,
    pub mode: WidgetMode,
    /// Full-scale speed of the dial, in the configured units.
    pub max: u32,
}

/// Dial scale bounds for the speed panel.
pub const SPEED_MAX_RANGE: (u32, u32) = (5, 500);

impl Default for SpeedPrefs {
    fn default() -> Self {
        Self {
            units: SpeedUnits::default(),
            mode: WidgetMode::default(),
            max: 120,
        }
    }
}

// ──────────────────── validation ────────────────────

/// Validation result for loaded preferences.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validate loaded preferences, clamping out-of-range dial scales. Returns
/// the (possibly adjusted) preferences and a report of any issues found.
pub fn validate(mut prefs: DashboardPrefs) -> (DashboardPrefs, ValidationReport) {
    let mut report = ValidationReport::new();

    if prefs.schema_version > SCHEMA_VERSION {
        report.warnings.push(format!(
            "preferences schema version {} is newer than supported {}; \
             unknown fields will be ignored",
            prefs.schema_version, SCHEMA_VERSION,
        ));
    }

    let (lo, hi) = ALTIMETER_SCALE_RANGE;
    if !(lo..=hi).contains(&prefs.altimeter.scale) {
        report.warnings.push(format!(
            "altimeter scale {} outside {lo}..={hi}; clamping",
            prefs.altimeter.scale,
        ));
        prefs.altimeter.scale = prefs.altimeter.scale.clamp(lo, hi);
    }

    let (lo, hi) = SPEED_MAX_RANGE;
    if !(lo..=hi).contains(&prefs.speed.max) {
        report.warnings.push(format!(
            "speed dial max {} outside {lo}..={hi}; clamping",
            prefs.speed.max,
        ));
        prefs.speed.max = prefs.speed.max.clamp(lo, hi);
    }

    (prefs, report)
}

// ──────────────────── persistence ────────────────────

/// Load outcome from the persistence layer.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Successfully loaded and validated.
    Loaded {
        prefs: DashboardPrefs,
        report: ValidationReport,
    },
    /// File not found. Normal for a first launch.
    Missing,
    /// File exists but is corrupt or unparseable — using defaults.
    Corrupt { details: String },
    /// I/O error reading the file — using defaults.
    IoError { details: String },
}

impl LoadOutcome {
    /// Extract the effective preferences regardless of load status.
    #[must_use]
    pub fn into_prefs(self) -> DashboardPrefs {
        match self {
            Self::Loaded { prefs, .. } => prefs,
            Self::Missing | Self::Corrupt { .. } | Self::IoError { .. } => {
                DashboardPrefs::default()
            }
        }
    }

    /// Whether the load was successful (loaded or first-launch missing).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Missing)
    }
}

/// Resolve the default preferences file path.
///
/// `NAVSCOPE_PREFERENCES_FILE` overrides; otherwise the file lives in the
/// state directory.
pub fn default_preferences_path(state_dir: Option<&PathBuf>) -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NAVSCOPE_PREFERENCES_FILE") {
        return Some(PathBuf::from(path));
    }

    resolve_state_dir(state_dir).map(|dir| dir.join(PREFERENCES_FILE))
}

/// Load preferences from a file path.
///
/// Returns a [`LoadOutcome`] — never panics, never blocks on error.
pub fn load(path: &Path) -> LoadOutcome {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Missing,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return LoadOutcome::Corrupt {
                details: format!("{e}"),
            };
        }
        Err(e) => {
            return LoadOutcome::IoError {
                details: format!("{e}"),
            };
        }
    };

    let prefs: DashboardPrefs = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            return LoadOutcome::Corrupt {
                details: format!("{e}"),
            };
        }
    };

    let (prefs, report) = validate(prefs);
    LoadOutcome::Loaded { prefs, report }
}

/// Atomic save: serialize → temp file → fsync → rename.
///
/// Creates parent directories as needed. Returns the path written on success.
pub fn save(prefs: &DashboardPrefs, path: &Path) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(prefs)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    // Temp file in the same directory (same filesystem for rename).
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;

    Ok(path.to_path_buf())
}

// ──────────────────── debounced writer ────────────────────

/// Debounced writer that limits persistence frequency.
///
/// Call `request_save()` whenever preferences change; the write is delayed
/// until the debounce interval elapses, coalescing rapid changes into one
/// I/O.
pub struct DebouncedWriter {
    path: PathBuf,
    debounce: Duration,
    last_write: Option<Instant>,
    pending: bool,
}

impl DebouncedWriter {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            debounce: WRITE_DEBOUNCE,
            last_write: None,
            pending: false,
        }
    }

    /// Override the debounce interval (useful for testing).
    #[must_use]
    pub fn with_debounce(mut self, d: Duration) -> Self {
        self.debounce = d;
        self
    }

    /// Mark that preferences have changed and should be persisted.
    pub fn request_save(&mut self) {
        self.pending = true;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Attempt to flush if the debounce interval has elapsed. Returns
    /// `Some(Ok(path))` if a write happened, `Some(Err(e))` if it failed,
    /// or `None` if no write was needed yet.
    pub fn try_flush(&mut self, prefs: &DashboardPrefs) -> Option<io::Result<PathBuf>> {
        if !self.pending {
            return None;
        }

        let now = Instant::now();
        if let Some(last) = self.last_write
            && now.duration_since(last) < self.debounce
        {
            return None; // Too soon.
        }

        self.pending = false;
        self.last_write = Some(now);
        Some(save(prefs, &self.path))
    }

    /// Force an immediate write, bypassing debounce. Used on shutdown.
    pub fn force_flush(&mut self, prefs: &DashboardPrefs) -> Option<io::Result<PathBuf>> {
        if !self.pending {
            return None;
        }

        self.pending = false;
        self.last_write = Some(Instant::now());
        Some(save(prefs, &self.path))
    }
}

// ──────────────────── merge ────────────────────

/// Session overrides that take precedence over persisted preferences.
///
/// Populated from CLI flags. `None` means "use persisted value"; overrides
/// are never written back.
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub startup_layout: Option<StartupLayout>,
}

/// Merge compiled defaults → persisted → session overrides.
#[must_use]
pub fn merge(persisted: &DashboardPrefs, overrides: &SessionOverrides) -> DashboardPrefs {
    DashboardPrefs {
        startup_layout: overrides.startup_layout.unwrap_or(persisted.startup_layout),
        ..persisted.clone()
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_with_grid() {
        let prefs = DashboardPrefs::default();
        assert_eq!(prefs.schema_version, SCHEMA_VERSION);
        assert_eq!(prefs.startup_layout, StartupLayout::Grid);
    }

    #[test]
    fn roundtrip_json() {
        let prefs = DashboardPrefs {
            startup_layout: StartupLayout::Custom2,
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&prefs).unwrap();
        let back: DashboardPrefs = serde_json::from_str(&json).unwrap();
        assert_eq!(prefs, back);
    }

    #[test]
    fn deserialize_empty_object_gives_defaults() {
        let back: DashboardPrefs = serde_json::from_str("{}").unwrap();
        assert_eq!(back, DashboardPrefs::default());
    }

    #[test]
    fn unknown_fields_ignored() {
        let json = r#"{"startup_layout": "saved", "future_field": 42}"#;
        let back: DashboardPrefs = serde_json::from_str(json).unwrap();
        assert_eq!(back.startup_layout, StartupLayout::Saved);
    }

    #[test]
    fn startup_layout_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&StartupLayout::Custom1).unwrap(),
            "\"custom1\"",
        );
        let back: StartupLayout = serde_json::from_str("\"custom1\"").unwrap();
        assert_eq!(back, StartupLayout::Custom1);
    }

    #[test]
    fn startup_layout_slot_mapping() {
        assert_eq!(StartupLayout::Grid.slot(), None);
        assert_eq!(StartupLayout::Saved.slot(), Some(SaveSlot::Saved));
        assert_eq!(StartupLayout::Custom3.slot(), Some(SaveSlot::Custom3));
    }

    #[test]
    fn startup_layout_name_roundtrip() {
        for choice in [
            StartupLayout::Grid,
            StartupLayout::Saved,
            StartupLayout::Custom1,
            StartupLayout::Custom2,
            StartupLayout::Custom3,
        ] {
            assert_eq!(StartupLayout::from_name(&choice.to_string()), Some(choice));
        }
        assert_eq!(StartupLayout::from_name("tile"), None);
    }

    #[test]
    fn validation_warns_on_future_schema() {
        let prefs = DashboardPrefs {
            schema_version: 999,
            ..Default::default()
        };
        let (_, report) = validate(prefs);
        assert!(report.warnings.iter().any(|w| w.contains("newer")));
    }

    #[test]
    fn validation_passes_for_defaults() {
        let (_, report) = validate(DashboardPrefs::default());
        assert!(report.is_clean());
    }

    #[test]
    fn validation_clamps_dial_scales() {
        let mut prefs = DashboardPrefs::default();
        prefs.altimeter.scale = 0;
        prefs.speed.max = 9_999;

        let (prefs, report) = validate(prefs);
        assert_eq!(prefs.altimeter.scale, ALTIMETER_SCALE_RANGE.0);
        assert_eq!(prefs.speed.max, SPEED_MAX_RANGE.1);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn display_prefs_roundtrip_json() {
        let prefs = DashboardPrefs {
            theme: Theme::Day,
            snr_chart: SnrChartMode::History,
            map: MapPrefs {
                follow: false,
                rotation: MapRotation::Cog,
                vector: false,
            },
            altimeter: AltimeterPrefs {
                units: AltitudeUnits::Feet,
                mode: WidgetMode::Digital,
                scale: 500,
            },
            time: TimePrefs {
                zone: TimeZoneChoice::Local,
                mode: WidgetMode::Digital,
            },
            speed: SpeedPrefs {
                units: SpeedUnits::Kmh,
                mode: WidgetMode::Digital,
                max: 80,
            },
            cog_mode: WidgetMode::Digital,
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&prefs).unwrap();
        let back: DashboardPrefs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }

    #[test]
    fn merge_keeps_display_prefs() {
        let persisted = DashboardPrefs {
            theme: Theme::Day,
            ..Default::default()
        };
        let merged = merge(
            &persisted,
            &SessionOverrides {
                startup_layout: Some(StartupLayout::Saved),
            },
        );
        assert_eq!(merged.theme, Theme::Day);
        assert_eq!(merged.startup_layout, StartupLayout::Saved);
    }

    // ── Merge ──

    #[test]
    fn merge_uses_persisted_when_no_overrides() {
        let persisted = DashboardPrefs {
            startup_layout: StartupLayout::Saved,
            ..Default::default()
        };
        let merged = merge(&persisted, &SessionOverrides::default());
        assert_eq!(merged.startup_layout, StartupLayout::Saved);
    }

    #[test]
    fn merge_override_wins() {
        let persisted = DashboardPrefs::default();
        let overrides = SessionOverrides {
            startup_layout: Some(StartupLayout::Custom1),
        };
        let merged = merge(&persisted, &overrides);
        assert_eq!(merged.startup_layout, StartupLayout::Custom1);
    }

    // ── Persistence ──

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = DashboardPrefs {
            startup_layout: StartupLayout::Custom3,
            ..Default::default()
        };

        save(&prefs, &path).unwrap();
        match load(&path) {
            LoadOutcome::Loaded {
                prefs: loaded,
                report,
            } => {
                assert_eq!(loaded, prefs);
                assert!(report.is_clean());
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_returns_missing() {
        let path = PathBuf::from("/nonexistent/navscope/preferences.json");
        assert!(matches!(load(&path), LoadOutcome::Missing));
    }

    #[test]
    fn load_corrupt_file_returns_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not valid json {{{").unwrap();
        assert!(matches!(load(&path), LoadOutcome::Corrupt { .. }));
    }

    #[test]
    fn load_outcome_into_prefs_returns_defaults_on_failure() {
        let outcome = LoadOutcome::Corrupt {
            details: "bad".into(),
        };
        assert_eq!(outcome.into_prefs(), DashboardPrefs::default());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("preferences.json");
        save(&DashboardPrefs::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_atomicity_no_tmp_leftover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        save(&DashboardPrefs::default(), &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    // ── Debounced writer ──

    #[test]
    fn debounced_writer_no_pending_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DebouncedWriter::new(dir.path().join("preferences.json"));
        assert!(writer.try_flush(&DashboardPrefs::default()).is_none());
    }

    #[test]
    fn debounced_writer_first_save_immediate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let mut writer = DebouncedWriter::new(path.clone()).with_debounce(Duration::ZERO);
        writer.request_save();
        let result = writer.try_flush(&DashboardPrefs::default());
        assert!(result.is_some());
        assert!(result.unwrap().is_ok());
        assert!(path.exists());
    }

    #[test]
    fn debounced_writer_respects_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DebouncedWriter::new(dir.path().join("preferences.json"))
            .with_debounce(Duration::from_secs(60));

        writer.request_save();
        assert!(writer.try_flush(&DashboardPrefs::default()).is_some());

        // Second write within debounce is suppressed.
        writer.request_save();
        assert!(writer.try_flush(&DashboardPrefs::default()).is_none());
        assert!(writer.is_pending());
    }

    #[test]
    fn debounced_writer_force_flush_bypasses_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DebouncedWriter::new(dir.path().join("preferences.json"))
            .with_debounce(Duration::from_secs(60));

        writer.request_save();
        assert!(writer.try_flush(&DashboardPrefs::default()).is_some());

        writer.request_save();
        assert!(writer.force_flush(&DashboardPrefs::default()).is_some());
        assert!(!writer.is_pending());
    }
}
