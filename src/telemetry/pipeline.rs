//! Snapshot ingestion and render-frame assembly.
//!
//! The pipeline owns the latest snapshot and the signal history. Each
//! accepted snapshot supersedes the previous one; consumers always render
//! from the newest state and never queue behind a backlog. Malformed lines
//! are counted and dropped without touching the current state.

use std::collections::HashSet;
use std::time::Instant;

use crate::core::errors::Result;
use crate::geo::projection::{GeoPoint, HeadingVector};
use crate::history::store::{SatSeries, SignalHistory, MAX_CHART_LINES};
use crate::telemetry::health::{heading_allowed, link_status, LinkStatus};
use crate::telemetry::snapshot::Snapshot;

/// Ingestion counters, exposed for diagnostics output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Snapshots accepted.
    pub accepted: u64,
    /// Lines rejected as malformed.
    pub rejected: u64,
    /// Accepted snapshots that replaced an unrendered predecessor.
    pub superseded: u64,
}

/// Everything a renderer needs for one repaint.
#[derive(Debug)]
pub struct RenderFrame<'a> {
    pub snapshot: &'a Snapshot,
    pub link: LinkStatus,
    /// Course vector, present only when the heading gate passes.
    pub heading: Option<HeadingVector>,
    /// Strongest satellite series for the signal chart, capped at
    /// [`MAX_CHART_LINES`].
    pub chart: Vec<&'a SatSeries>,
}

/// Consumer seam for assembled frames.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &RenderFrame<'_>);
}

/// The update-distribution pipeline.
#[derive(Debug, Default)]
pub struct UpdatePipeline {
    history: SignalHistory,
    latest: Option<Snapshot>,
    rendered: bool,
    stats: PipelineStats,
}

impl UpdatePipeline {
    #[must_use]
    pub fn new(history: SignalHistory) -> Self {
        Self {
            history,
            latest: None,
            rendered: false,
            stats: PipelineStats::default(),
        }
    }

    /// Parse and ingest one feed line. Malformed lines leave the current
    /// snapshot and history untouched.
    pub fn ingest_line(&mut self, line: &str, now: Instant) -> Result<()> {
        match Snapshot::parse(line) {
            Ok(snapshot) => {
                self.ingest(snapshot, now);
                Ok(())
            }
            Err(e) => {
                self.stats.rejected += 1;
                Err(e)
            }
        }
    }

    /// Ingest a parsed snapshot: record satellite signals, drop aged-out
    /// satellites, and supersede the previous snapshot.
    pub fn ingest(&mut self, snapshot: Snapshot, now: Instant) {
        let mut seen = HashSet::new();
        for (key, sat) in snapshot.keyed_sats() {
            let snr = sat.snr.filter(|v| v.is_finite()).unwrap_or(0.0);
            self.history.record(key, snr, sat.used, now);
            seen.insert(key);
        }
        self.history.sweep(&seen, now);

        if self.latest.is_some() && !self.rendered {
            self.stats.superseded += 1;
        }
        self.latest = Some(snapshot);
        self.rendered = false;
        self.stats.accepted += 1;
    }

    /// Assemble a frame from the current state, or `None` before the first
    /// snapshot arrives. Marks the current snapshot as rendered.
    pub fn frame(&mut self) -> Option<RenderFrame<'_>> {
        self.rendered = true;
        let snapshot = self.latest.as_ref()?;
        let link = link_status(snapshot);
        let heading = heading_vector(snapshot);
        Some(RenderFrame {
            snapshot,
            link,
            heading,
            chart: self.history.top_lines(MAX_CHART_LINES),
        })
    }

    /// Push the current frame into a sink, if one is available.
    pub fn publish(&mut self, sink: &mut dyn FrameSink) -> bool {
        match self.frame() {
            Some(frame) => {
                sink.on_frame(&frame);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    #[must_use]
    pub const fn stats(&self) -> PipelineStats {
        self.stats
    }
}

/// Project the course vector when the snapshot passes the heading gate.
#[must_use]
pub fn heading_vector(snapshot: &Snapshot) -> Option<HeadingVector> {
    if !heading_allowed(snapshot) {
        return None;
    }
    let fix = snapshot.fix.as_ref()?;
    let (lat, lon, cog, speed) = (fix.lat?, fix.lon?, fix.cog_deg?, fix.speed_knots?);
    Some(HeadingVector::project(GeoPoint::new(lat, lon), cog, speed))
}

// ──────────────────────── tests ────────────────────────
