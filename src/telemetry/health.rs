//! Feed liveness classification and the heading-vector gate.

use serde::Serialize;

use crate::telemetry::snapshot::Snapshot;

/// Data younger than this is considered live.
pub const LIVE_MAX_AGE_MS: f64 = 1_500.0;
/// Data younger than this (but not live) is stale; older is dead.
pub const STALE_MAX_AGE_MS: f64 = 5_000.0;
/// Minimum speed over ground before a course vector is drawn. Below this the
/// reported course is receiver noise.
pub const MIN_HEADING_SPEED_KNOTS: f64 = 0.5;

/// Feed link status derived from data age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkStatus {
    Live,
    Stale,
    #[default]
    Dead,
}

impl LinkStatus {
    /// Classify from the age of the newest data. Unknown age is dead.
    #[must_use]
    pub fn from_age_ms(age_ms: Option<f64>) -> Self {
        match age_ms {
            Some(age) if age < LIVE_MAX_AGE_MS => Self::Live,
            Some(age) if age < STALE_MAX_AGE_MS => Self::Stale,
            _ => Self::Dead,
        }
    }

    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Stale => "STALE",
            Self::Dead => "DEAD",
        }
    }
}

/// Derive the link status for a snapshot.
#[must_use]
pub fn link_status(snapshot: &Snapshot) -> LinkStatus {
    LinkStatus::from_age_ms(snapshot.health.as_ref().and_then(|h| h.age_ms))
}

/// Whether a heading vector may be projected from this snapshot.
///
/// Requires a live link, a position, a course, and enough speed over ground
/// to trust the course.
#[must_use]
pub fn heading_allowed(snapshot: &Snapshot) -> bool {
    if !link_status(snapshot).is_live() {
        return false;
    }
    let Some(fix) = snapshot.fix.as_ref() else {
        return false;
    };
    let (Some(_), Some(_), Some(_)) = (fix.lat, fix.lon, fix.cog_deg) else {
        return false;
    };
    fix.speed_knots
        .is_some_and(|speed| speed >= MIN_HEADING_SPEED_KNOTS)
}

// ──────────────────────── tests ────────────────────────
