//! Wire model for receiver snapshots.
//!
//! A snapshot is one NDJSON line from the feed. Every field is optional:
//! receivers in acquisition send partial frames, and the dashboard renders
//! whatever is present rather than rejecting the frame. Only JSON that fails
//! to parse at all is an error.

use serde::{Deserialize, Serialize};

use crate::core::errors::{NavError, Result};
use crate::history::store::SatKey;

// ──────────────────────── constellations ────────────────────────

/// GNSS constellation, derived from the free-form `gnssid` the feed sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
    Beidou,
    Sbas,
    Other,
}

impl Constellation {
    /// Classify a receiver-reported constellation name. Matching is loose:
    /// `"GPS"`, `"gps"`, and `"GPS L1"` all classify as GPS.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        if upper.contains("GPS") {
            Self::Gps
        } else if upper.contains("GLO") {
            Self::Glonass
        } else if upper.contains("GAL") {
            Self::Galileo
        } else if upper.contains("BEI") || upper.contains("BDS") {
            Self::Beidou
        } else if upper.contains("SBAS") {
            Self::Sbas
        } else {
            Self::Other
        }
    }

    /// Single-letter chart code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Gps => 'G',
            Self::Glonass => 'R',
            Self::Galileo => 'E',
            Self::Beidou => 'B',
            Self::Sbas => 'S',
            Self::Other => 'U',
        }
    }
}

// ──────────────────────── payload model ────────────────────────

/// Feed link health as reported by the upstream collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Health {
    pub age_ms: Option<f64>,
    pub avg_dt_ms: Option<f64>,
    pub status: Option<String>,
}

/// Position fix fields. Units follow the wire format: metres, knots, degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fix {
    pub status: Option<String>,
    pub mode: Option<String>,
    pub quality: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt_m: Option<f64>,
    pub speed_knots: Option<f64>,
    pub cog_deg: Option<f64>,
}

/// Dilution-of-precision triple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dop {
    pub pdop: Option<f64>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
}

/// Satellite usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counts {
    pub used: Option<u32>,
    pub in_view: Option<u32>,
}

/// One tracked satellite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sat {
    /// Receiver-assigned id, e.g. `"GPS-01"`.
    pub id: Option<String>,
    /// Constellation name, e.g. `"GPS"`.
    pub gnssid: Option<String>,
    pub prn: Option<u32>,
    /// Azimuth in degrees.
    pub az: Option<f64>,
    /// Elevation in degrees.
    pub el: Option<f64>,
    /// Carrier-to-noise density in dB-Hz.
    pub snr: Option<f64>,
    pub used: bool,
    /// Recent sky-track positions as `[az, el]` pairs, oldest first.
    pub trail: Vec<[f64; 2]>,
}

impl Sat {
    /// Constellation classified from `gnssid`. `None` ids classify as
    /// [`Constellation::Other`].
    #[must_use]
    pub fn constellation(&self) -> Constellation {
        self.gnssid
            .as_deref()
            .map_or(Constellation::Other, Constellation::from_name)
    }

    /// History key, when the satellite has a PRN to be keyed on.
    #[must_use]
    pub fn key(&self) -> Option<SatKey> {
        self.prn.map(|prn| SatKey::new(self.constellation(), prn))
    }
}

/// One complete receiver snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Receiver UTC time-of-day, opaque `HHMMSS` string.
    pub t_utc: Option<String>,
    pub health: Option<Health>,
    pub fix: Option<Fix>,
    pub dop: Option<Dop>,
    pub counts: Option<Counts>,
    pub sats: Vec<Sat>,
}

impl Snapshot {
    /// Parse one NDJSON line into a snapshot.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| NavError::BadPayload {
            details: e.to_string(),
        })
    }

    /// Satellites that carry a usable history key.
    pub fn keyed_sats(&self) -> impl Iterator<Item = (SatKey, &Sat)> {
        self.sats.iter().filter_map(|sat| sat.key().map(|k| (k, sat)))
    }

    /// Per-constellation tally of tracked satellites, in enum order.
    #[must_use]
    pub fn constellation_counts(&self) -> Vec<(Constellation, usize)> {
        let mut counts = std::collections::BTreeMap::new();
        for sat in &self.sats {
            *counts.entry(sat.constellation()).or_insert(0usize) += 1;
        }
        counts.into_iter().collect()
    }
}

// ──────────────────────── tests ────────────────────────
