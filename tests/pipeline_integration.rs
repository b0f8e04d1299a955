//! Update-pipeline integration tests: supersede semantics, malformed-line
//! handling, signal-history windowing across injected clocks, the heading
//! gate, and the synthetic feed flowing end to end into a render frame.

use std::time::{Duration, Instant};

use navscope::history::store::{SatKey, SignalHistory, MAX_CHART_LINES};
use navscope::telemetry::feed::DummyFeed;
use navscope::telemetry::pipeline::{FrameSink, RenderFrame, UpdatePipeline};
use navscope::telemetry::snapshot::Constellation;
use navscope::telemetry::LinkStatus;

// ──────────────────────── fixtures ────────────────────────

fn pipeline() -> UpdatePipeline {
    UpdatePipeline::new(SignalHistory::new(Duration::from_secs(60)))
}

/// A healthy moving fix with one GPS satellite, tagged so tests can tell
/// snapshots apart via `t_utc`.
fn live_line(t_utc: &str) -> String {
    format!(
        r#"{{"t_utc":"{t_utc}",
            "health":{{"age_ms":200.0,"avg_dt_ms":980.0,"status":"LIVE"}},
            "fix":{{"lat":21.14,"lon":-86.82,"speed_knots":12.0,"cog_deg":118.0}},
            "sats":[{{"gnssid":"GPS","prn":7,"az":40.0,"el":55.0,"snr":42.0,"used":true}}]}}"#
    )
}

fn sat_json(gnssid: &str, prn: u32, snr: f64) -> String {
    format!(r#"{{"gnssid":"{gnssid}","prn":{prn},"snr":{snr},"used":true}}"#)
}

fn line_with_sats(sats: &[String]) -> String {
    format!(
        r#"{{"health":{{"age_ms":100.0}},"sats":[{}]}}"#,
        sats.join(",")
    )
}

struct CaptureSink {
    frames: Vec<(Option<String>, LinkStatus, bool)>,
}

impl FrameSink for CaptureSink {
    fn on_frame(&mut self, frame: &RenderFrame<'_>) {
        self.frames.push((
            frame.snapshot.t_utc.clone(),
            frame.link,
            frame.heading.is_some(),
        ));
    }
}

// ──────────────────────── ingestion ────────────────────────

#[test]
fn malformed_line_is_rejected_and_state_kept() {
    let mut pipeline = pipeline();
    let now = Instant::now();
    pipeline.ingest_line(&live_line("120000"), now).unwrap();

    assert!(pipeline.ingest_line("{ broken", now).is_err());
    assert!(pipeline.ingest_line("", now).is_err());

    let stats = pipeline.stats();
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.rejected, 2);
    let latest = pipeline.latest().unwrap();
    assert_eq!(latest.t_utc.as_deref(), Some("120000"));
    assert_eq!(pipeline.history().len(), 1);
}

#[test]
fn unrendered_snapshot_is_superseded() {
    let mut pipeline = pipeline();
    let now = Instant::now();

    pipeline.ingest_line(&live_line("120000"), now).unwrap();
    pipeline.ingest_line(&live_line("120001"), now).unwrap();
    assert_eq!(pipeline.stats().superseded, 1);

    // A rendered snapshot is consumed, not superseded.
    assert!(pipeline.frame().is_some());
    pipeline.ingest_line(&live_line("120002"), now).unwrap();
    assert_eq!(pipeline.stats().superseded, 1);
    assert_eq!(pipeline.stats().accepted, 3);
}

#[test]
fn publish_delivers_only_the_latest_snapshot() {
    let mut pipeline = pipeline();
    let mut sink = CaptureSink { frames: Vec::new() };
    let now = Instant::now();

    assert!(!pipeline.publish(&mut sink), "no snapshot yet");

    for t in ["120000", "120001", "120002"] {
        pipeline.ingest_line(&live_line(t), now).unwrap();
    }
    assert!(pipeline.publish(&mut sink));

    assert_eq!(sink.frames.len(), 1);
    let (t_utc, link, heading) = &sink.frames[0];
    assert_eq!(t_utc.as_deref(), Some("120002"));
    assert_eq!(*link, LinkStatus::Live);
    assert!(heading);
}

// ──────────────────────── history windowing ────────────────────────

#[test]
fn samples_older_than_the_window_are_trimmed() {
    let mut pipeline = pipeline();
    let base = Instant::now();
    let line = live_line("120000");

    for secs in [0, 10, 30, 70] {
        pipeline
            .ingest_line(&line, base + Duration::from_secs(secs))
            .unwrap();
    }

    let key = SatKey::new(Constellation::Gps, 7);
    let series = pipeline.history().series(key).unwrap();
    // At t=70 the window is (10, 70]; t=0 and t=10 both fall out.
    assert_eq!(series.samples().len(), 2);
    assert_eq!(series.samples()[0].at, base + Duration::from_secs(30));
}

#[test]
fn vanished_satellite_ages_out_after_the_window() {
    let mut pipeline = pipeline();
    let base = Instant::now();

    let two_sats = line_with_sats(&[sat_json("GPS", 7, 42.0), sat_json("GAL", 11, 38.0)]);
    let one_sat = line_with_sats(&[sat_json("GPS", 7, 42.0)]);
    pipeline.ingest_line(&two_sats, base).unwrap();

    let galileo = SatKey::new(Constellation::Galileo, 11);
    pipeline
        .ingest_line(&one_sat, base + Duration::from_secs(30))
        .unwrap();
    assert!(
        pipeline.history().series(galileo).is_some(),
        "still inside the window"
    );

    pipeline
        .ingest_line(&one_sat, base + Duration::from_secs(61))
        .unwrap();
    assert!(pipeline.history().series(galileo).is_none());
    assert_eq!(pipeline.history().len(), 1);
}

#[test]
fn missing_snr_is_recorded_as_zero() {
    let mut pipeline = pipeline();
    let line = r#"{"sats":[{"gnssid":"GPS","prn":3,"used":false}]}"#;
    pipeline.ingest_line(line, Instant::now()).unwrap();

    let series = pipeline
        .history()
        .series(SatKey::new(Constellation::Gps, 3))
        .unwrap();
    assert_eq!(series.latest().unwrap().snr, 0.0);
    assert!(!series.latest().unwrap().used);
}

#[test]
fn chart_is_capped_and_ranked_by_strength() {
    let mut pipeline = pipeline();
    let sats: Vec<String> = (1..=14)
        .map(|prn| sat_json("GPS", prn, f64::from(prn) * 3.0))
        .collect();
    pipeline
        .ingest_line(&line_with_sats(&sats), Instant::now())
        .unwrap();

    let frame = pipeline.frame().unwrap();
    assert_eq!(frame.chart.len(), MAX_CHART_LINES);
    assert_eq!(frame.chart[0].key, SatKey::new(Constellation::Gps, 14));
    let weakest_kept = frame.chart.last().unwrap().key;
    assert_eq!(weakest_kept, SatKey::new(Constellation::Gps, 3));
}

// ──────────────────────── heading gate ────────────────────────

#[test]
fn heading_requires_live_link_and_motion() {
    let mut pipeline = pipeline();
    let now = Instant::now();

    pipeline.ingest_line(&live_line("120000"), now).unwrap();
    assert!(pipeline.frame().unwrap().heading.is_some());

    // Below the speed floor the vector is suppressed.
    let crawling = r#"{"health":{"age_ms":200.0},
        "fix":{"lat":21.14,"lon":-86.82,"speed_knots":0.3,"cog_deg":118.0}}"#;
    pipeline.ingest_line(crawling, now).unwrap();
    assert!(pipeline.frame().unwrap().heading.is_none());

    // A stale link suppresses it even at speed.
    let stale = r#"{"health":{"age_ms":3000.0},
        "fix":{"lat":21.14,"lon":-86.82,"speed_knots":12.0,"cog_deg":118.0}}"#;
    pipeline.ingest_line(stale, now).unwrap();
    let frame = pipeline.frame().unwrap();
    assert_eq!(frame.link, LinkStatus::Stale);
    assert!(frame.heading.is_none());
}

// ──────────────────────── synthetic feed ────────────────────────

#[test]
fn dummy_feed_lines_flow_into_render_frames() {
    let mut feed = DummyFeed::new(Duration::from_millis(500));
    let mut pipeline = pipeline();
    let mut rng = rand::rng();
    let base = Instant::now();

    // The simulated fix idles for the first few seconds of each cycle;
    // ten ticks at 500ms puts it well underway.
    for i in 0..10 {
        let snapshot = feed.tick(&mut rng);
        let line = serde_json::to_string(&snapshot).unwrap();
        pipeline
            .ingest_line(&line, base + Duration::from_millis(500 * i))
            .unwrap();
        let _ = pipeline.frame();
    }

    let frame = pipeline.frame().unwrap();
    assert_eq!(frame.link, LinkStatus::Live);
    assert!(frame.heading.is_some(), "the synthetic fix is underway");
    assert_eq!(frame.snapshot.sats.len(), 12);
    assert!(!frame.chart.is_empty());
    assert!(frame.chart.len() <= MAX_CHART_LINES);

    // The two dropout satellites chart at zero signal.
    let lost = pipeline
        .history()
        .series(SatKey::new(Constellation::Glonass, 67))
        .unwrap();
    assert_eq!(lost.latest().unwrap().snr, 0.0);
}
