//! Sliding-window per-satellite signal history.
//!
//! Each satellite (constellation + PRN) accumulates timestamped SNR samples.
//! The window is trimmed on every record, and `sweep` drops satellites that
//! have aged out entirely so the store never grows without bound. Timestamps
//! are injected by the caller, so windowing is monotonic and testable.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::telemetry::snapshot::Constellation;

/// Length of the retained signal window.
pub const HISTORY_WINDOW: Duration = Duration::from_secs(60);

/// Maximum number of satellite series surfaced to chart consumers.
pub const MAX_CHART_LINES: usize = 12;

/// Stable identity of one tracked satellite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatKey {
    pub constellation: Constellation,
    pub prn: u32,
}

impl SatKey {
    #[must_use]
    pub const fn new(constellation: Constellation, prn: u32) -> Self {
        Self { constellation, prn }
    }

    /// Short chart label, e.g. `G07` or `R66`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{:02}", self.constellation.code(), self.prn)
    }
}

/// One timestamped signal sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSample {
    pub at: Instant,
    /// Carrier-to-noise density in dB-Hz. Satellites reported without a
    /// value are recorded as 0 so their dropout is visible on the chart.
    pub snr: f64,
    /// Whether the satellite participated in the fix at sample time.
    pub used: bool,
}

/// One satellite's window of samples, in arrival order.
#[derive(Debug, Clone)]
pub struct SatSeries {
    pub key: SatKey,
    samples: Vec<SignalSample>,
}

impl SatSeries {
    /// Samples currently inside the window, oldest first.
    #[must_use]
    pub fn samples(&self) -> &[SignalSample] {
        &self.samples
    }

    /// The most recent sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&SignalSample> {
        self.samples.last()
    }
}

/// The windowed history store.
///
/// Series are kept in first-seen order; ranking ties in [`Self::top_lines`]
/// resolve in that order.
#[derive(Debug, Clone)]
pub struct SignalHistory {
    window: Duration,
    series: Vec<SatSeries>,
}

impl Default for SignalHistory {
    fn default() -> Self {
        Self::new(HISTORY_WINDOW)
    }
}

impl SignalHistory {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            series: Vec::new(),
        }
    }

    /// Append a sample for one satellite and trim its leading edge.
    pub fn record(&mut self, key: SatKey, snr: f64, used: bool, now: Instant) {
        let cutoff = now.checked_sub(self.window);
        let idx = self.series.iter().position(|s| s.key == key).unwrap_or_else(|| {
            self.series.push(SatSeries {
                key,
                samples: Vec::new(),
            });
            self.series.len() - 1
        });
        let series = &mut self.series[idx];
        series.samples.push(SignalSample { at: now, snr, used });
        if let Some(cutoff) = cutoff {
            // The window is half-open: a sample exactly one window old is out.
            let keep_from = series.samples.partition_point(|s| s.at <= cutoff);
            series.samples.drain(..keep_from);
        }
    }

    /// Drop satellites that have aged out of the window, and trim series
    /// that were not part of the latest snapshot (`seen`).
    pub fn sweep(&mut self, seen: &HashSet<SatKey>, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.window) else {
            return;
        };
        for series in &mut self.series {
            if !seen.contains(&series.key) {
                let keep_from = series.samples.partition_point(|s| s.at <= cutoff);
                series.samples.drain(..keep_from);
            }
        }
        self.series.retain(|s| {
            s.latest().is_some_and(|last| last.at > cutoff)
        });
    }

    /// The series for one satellite, if tracked.
    #[must_use]
    pub fn series(&self, key: SatKey) -> Option<&SatSeries> {
        self.series.iter().find(|s| s.key == key)
    }

    /// All tracked series, first-seen order.
    #[must_use]
    pub fn all(&self) -> &[SatSeries] {
        &self.series
    }

    /// The `n` strongest series, ranked by most recent SNR descending.
    /// Ties keep first-seen order (stable sort).
    #[must_use]
    pub fn top_lines(&self, n: usize) -> Vec<&SatSeries> {
        self.top_by(n, |s| s.latest().map_or(0.0, |sample| sample.snr))
    }

    /// The top `n` series under an arbitrary rank, descending. Ties keep
    /// first-seen order (stable sort).
    pub fn top_by<F>(&self, n: usize, rank: F) -> Vec<&SatSeries>
    where
        F: Fn(&SatSeries) -> f64,
    {
        let mut ranked: Vec<&SatSeries> =
            self.series.iter().filter(|s| !s.samples.is_empty()).collect();
        ranked.sort_by(|a, b| {
            rank(b).partial_cmp(&rank(a)).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    /// Number of tracked satellites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ──────────────────────── tests ────────────────────────
