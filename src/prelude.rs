//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use navscope::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{NavError, Result};

// Geo
pub use crate::geo::projection::{GeoPoint, HeadingVector};

// History
pub use crate::history::store::{SatKey, SignalHistory};

// Layout
pub use crate::layout::engine::LayoutEngine;
pub use crate::layout::panel::{Layout, PanelKind, PanelRect, Viewport};
pub use crate::layout::store::{LayoutStore, SaveSlot};

// Prefs
pub use crate::prefs::{DashboardPrefs, StartupLayout};

// Telemetry
pub use crate::telemetry::health::LinkStatus;
pub use crate::telemetry::pipeline::{RenderFrame, UpdatePipeline};
pub use crate::telemetry::snapshot::{Constellation, Snapshot};
