//! Feed transport: the NDJSON socket reader and the built-in dummy receiver.
//!
//! The reader owns its socket on a background thread and hands raw lines to
//! the pipeline over a bounded channel. Any disconnect, including a failed
//! connect, is followed by a fixed reconnect delay; there is no backoff
//! schedule because the upstream collector restarts quickly or not at all.

use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{bounded, Receiver, Sender};
use rand::Rng;

use crate::core::config::FeedConfig;
use crate::telemetry::snapshot::{Counts, Dop, Fix, Health, Sat, Snapshot};

/// Capacity of the feed-to-pipeline channel. The consumer drains to the
/// newest line on every pass, so depth only needs to cover a render stall.
const FEED_CHANNEL_CAPACITY: usize = 256;

/// Sky-track points retained per satellite in the dummy receiver.
const DUMMY_TRAIL_CAP: usize = 90;
/// Sky-track points emitted per satellite in each payload.
const DUMMY_TRAIL_EMIT: usize = 30;

/// One message from the feed thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    /// A connection was established.
    Connected { endpoint: String },
    /// One NDJSON line, undecoded.
    Line(String),
    /// The connection dropped or could not be established. The reader sleeps
    /// for the reconnect delay after sending this.
    Disconnected { details: String },
}

/// Spawn the socket reader thread. The thread exits when the receiver is
/// dropped.
#[must_use]
pub fn spawn_tcp_feed(config: &FeedConfig) -> Receiver<FeedMessage> {
    let (tx, rx) = bounded(FEED_CHANNEL_CAPACITY);
    let endpoint = config.endpoint.clone();
    let delay = Duration::from_millis(config.reconnect_delay_ms);

    thread::spawn(move || loop {
        match TcpStream::connect(&endpoint) {
            Ok(stream) => {
                if tx
                    .send(FeedMessage::Connected {
                        endpoint: endpoint.clone(),
                    })
                    .is_err()
                {
                    return;
                }
                if !read_lines(stream, &tx) {
                    return;
                }
            }
            Err(e) => {
                if tx
                    .send(FeedMessage::Disconnected {
                        details: format!("connect {endpoint}: {e}"),
                    })
                    .is_err()
                {
                    return;
                }
            }
        }
        thread::sleep(delay);
    });

    rx
}

/// Read NDJSON lines until the stream ends. Returns `false` when the
/// receiver side is gone and the thread should exit.
fn read_lines(stream: TcpStream, tx: &Sender<FeedMessage>) -> bool {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if tx.send(FeedMessage::Line(line)).is_err() {
                    return false;
                }
            }
            Err(e) => {
                return tx
                    .send(FeedMessage::Disconnected {
                        details: format!("read: {e}"),
                    })
                    .is_ok();
            }
        }
    }
    tx.send(FeedMessage::Disconnected {
        details: "stream closed".to_string(),
    })
    .is_ok()
}

// ──────────────────────── dummy receiver ────────────────────────

/// Satellites simulated by the dummy receiver: `(constellation, prn)`.
const DUMMY_SATS: [(&str, u32); 12] = [
    ("GPS", 1),
    ("GPS", 2),
    ("GPS", 4),
    ("GPS", 7),
    ("GLONASS", 66),
    ("GLONASS", 67),
    ("GALILEO", 11),
    ("GALILEO", 12),
    ("BEIDOU", 21),
    ("BEIDOU", 22),
    ("SBAS", 133),
    ("SBAS", 135),
];

/// PRNs that participate in the simulated fix.
const DUMMY_USED_PRNS: [u32; 7] = [1, 2, 4, 7, 66, 11, 21];
/// PRNs simulated as lost (zero SNR), to exercise dropout rendering.
const DUMMY_LOST_PRNS: [u32; 2] = [67, 135];

struct DummySat {
    name: &'static str,
    prn: u32,
    az: f64,
    el: f64,
    snr: f64,
    used: bool,
    trail: Vec<[f64; 2]>,
}

/// Deterministic-track dummy receiver for development without hardware.
///
/// Produces a harbour-tour track off a fixed anchorage: slow drift for a few
/// seconds of each cycle, then a sweep with the course advancing steadily.
pub struct DummyFeed {
    t: f64,
    step: f64,
    sats: Vec<DummySat>,
}

impl DummyFeed {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let sats = DUMMY_SATS
            .iter()
            .enumerate()
            .map(|(i, &(name, prn))| {
                #[allow(clippy::cast_precision_loss)]
                let i = i as f64;
                DummySat {
                    name,
                    prn,
                    az: (i * 28.0) % 360.0,
                    el: 15.0 + (i * 5.0) % 70.0,
                    snr: 20.0 + (i * 3.0) % 25.0,
                    used: DUMMY_USED_PRNS.contains(&prn),
                    trail: Vec::new(),
                }
            })
            .collect();
        Self {
            t: 0.0,
            step: interval.as_secs_f64(),
            sats,
        }
    }

    /// Advance the simulation one interval and emit a snapshot.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Snapshot {
        self.t += self.step;
        let t = self.t;

        for sat in &mut self.sats {
            sat.az = (sat.az + 2.5 + rng.random_range(-1.0..1.0)).rem_euclid(360.0);
            sat.el = (sat.el + (t / 6.0 + f64::from(sat.prn)).sin() * 0.2).clamp(5.0, 85.0);
            sat.snr = if DUMMY_LOST_PRNS.contains(&sat.prn) {
                0.0
            } else {
                (sat.snr + f64::from(rng.random_range(-2i32..=2))).clamp(5.0, 50.0)
            };
            sat.trail.push([sat.az, sat.el]);
            if sat.trail.len() > DUMMY_TRAIL_CAP {
                sat.trail.remove(0);
            }
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cycle = (t as u64) % 20;
        let speed = if cycle < 4 {
            0.2
        } else {
            (18.0 + 12.0 * (t / 4.0).sin() + 6.0 * (t / 11.0).sin()).max(0.0)
        };
        let cog = (120.0 + t * 6.0 + (t / 7.0).sin() * 10.0).rem_euclid(360.0);

        let sats: Vec<Sat> = self
            .sats
            .iter()
            .map(|sat| Sat {
                id: Some(format!("{}-{:02}", sat.name, sat.prn)),
                gnssid: Some(sat.name.to_string()),
                prn: Some(sat.prn),
                az: Some(sat.az),
                el: Some(sat.el),
                snr: Some(sat.snr),
                used: sat.used && sat.snr > 0.0,
                trail: sat
                    .trail
                    .iter()
                    .rev()
                    .take(DUMMY_TRAIL_EMIT)
                    .rev()
                    .copied()
                    .collect(),
            })
            .collect();

        #[allow(clippy::cast_possible_truncation)]
        let used = sats.iter().filter(|s| s.used).count() as u32;
        #[allow(clippy::cast_possible_truncation)]
        let in_view = sats.len() as u32;

        Snapshot {
            t_utc: Some(Utc::now().format("%H%M%S").to_string()),
            health: Some(Health {
                age_ms: Some(200.0),
                avg_dt_ms: Some(980.0),
                status: Some("LIVE".to_string()),
            }),
            fix: Some(Fix {
                status: Some("A".to_string()),
                mode: Some("3D".to_string()),
                quality: Some("DGPS".to_string()),
                lat: Some(21.143_671),
                lon: Some(-86.822_661),
                alt_m: Some(24.0 + (t / 8.0).sin() * 2.4),
                speed_knots: Some(speed),
                cog_deg: Some(cog),
            }),
            dop: Some(Dop {
                pdop: Some(3.04),
                hdop: Some(0.89),
                vdop: Some(2.91),
            }),
            counts: Some(Counts {
                used: Some(used),
                in_view: Some(in_view),
            }),
            sats,
        }
    }
}

/// Spawn the dummy receiver thread. Emits serialized snapshot lines at the
/// configured interval; exits when the receiver is dropped.
#[must_use]
pub fn spawn_dummy_feed(interval: Duration) -> Receiver<FeedMessage> {
    let (tx, rx) = bounded(FEED_CHANNEL_CAPACITY);

    thread::spawn(move || {
        let mut feed = DummyFeed::new(interval);
        let mut rng = rand::rng();
        if tx
            .send(FeedMessage::Connected {
                endpoint: "dummy".to_string(),
            })
            .is_err()
        {
            return;
        }
        loop {
            let snapshot = feed.tick(&mut rng);
            let line = match serde_json::to_string(&snapshot) {
                Ok(line) => line,
                Err(_) => continue,
            };
            if tx.send(FeedMessage::Line(line)).is_err() {
                return;
            }
            thread::sleep(interval);
        }
    });

    rx
}

// ──────────────────────── tests ────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::snapshot::Constellation;

    fn tick_once(feed: &mut DummyFeed) -> Snapshot {
        let mut rng = rand::rng();
        feed.tick(&mut rng)
    }

    #[test]
    fn dummy_tracks_twelve_sats() {
        let mut feed = DummyFeed::new(Duration::from_millis(500));
        let snap = tick_once(&mut feed);
        assert_eq!(snap.sats.len(), 12);
        assert_eq!(snap.counts.unwrap().in_view, Some(12));
    }

    #[test]
    fn dummy_sat_ids_are_padded() {
        let mut feed = DummyFeed::new(Duration::from_millis(500));
        let snap = tick_once(&mut feed);
        assert_eq!(snap.sats[0].id.as_deref(), Some("GPS-01"));
        assert_eq!(snap.sats[10].id.as_deref(), Some("SBAS-133"));
    }

    #[test]
    fn dummy_lost_sats_report_zero_snr() {
        let mut feed = DummyFeed::new(Duration::from_millis(500));
        let snap = tick_once(&mut feed);
        for sat in &snap.sats {
            if DUMMY_LOST_PRNS.contains(&sat.prn.unwrap()) {
                assert_eq!(sat.snr, Some(0.0));
                assert!(!sat.used);
            }
        }
    }

    #[test]
    fn dummy_geometry_stays_in_range() {
        let mut feed = DummyFeed::new(Duration::from_millis(100));
        for _ in 0..50 {
            let snap = tick_once(&mut feed);
            for sat in &snap.sats {
                let az = sat.az.unwrap();
                let el = sat.el.unwrap();
                let snr = sat.snr.unwrap();
                assert!((0.0..360.0).contains(&az), "az {az}");
                assert!((5.0..=85.0).contains(&el), "el {el}");
                assert!((0.0..=50.0).contains(&snr), "snr {snr}");
            }
        }
    }

    #[test]
    fn dummy_trail_caps_at_thirty_emitted() {
        let mut feed = DummyFeed::new(Duration::from_millis(100));
        let mut last = None;
        for _ in 0..120 {
            last = Some(tick_once(&mut feed));
        }
        let snap = last.unwrap();
        for sat in &snap.sats {
            assert_eq!(sat.trail.len(), DUMMY_TRAIL_EMIT);
            // Newest trail point matches the current position.
            let newest = sat.trail.last().unwrap();
            assert_eq!(newest[0], sat.az.unwrap());
            assert_eq!(newest[1], sat.el.unwrap());
        }
    }

    #[test]
    fn dummy_idles_at_cycle_start() {
        // First four seconds of each 20s cycle hold at drift speed.
        let mut feed = DummyFeed::new(Duration::from_secs(1));
        let snap = tick_once(&mut feed);
        assert_eq!(snap.fix.unwrap().speed_knots, Some(0.2));
    }

    #[test]
    fn dummy_payload_roundtrips_through_parser() {
        let mut feed = DummyFeed::new(Duration::from_millis(500));
        let snap = tick_once(&mut feed);
        let line = serde_json::to_string(&snap).unwrap();
        let parsed = Snapshot::parse(&line).unwrap();
        assert_eq!(parsed.sats.len(), 12);
        assert_eq!(parsed.sats[4].constellation(), Constellation::Glonass);
        assert!(parsed.fix.unwrap().cog_deg.is_some());
    }

    #[test]
    fn dummy_course_advances() {
        let mut feed = DummyFeed::new(Duration::from_secs(1));
        let a = tick_once(&mut feed).fix.unwrap().cog_deg.unwrap();
        let b = tick_once(&mut feed).fix.unwrap().cog_deg.unwrap();
        assert_ne!(a, b);
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn dummy_feed_thread_emits_lines() {
        let rx = spawn_dummy_feed(Duration::from_millis(10));
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            FeedMessage::Connected { .. },
        ));
        match rx.recv_timeout(Duration::from_secs(1)).unwrap() {
            FeedMessage::Line(line) => {
                assert!(Snapshot::parse(&line).is_ok());
            }
            other => panic!("expected Line, got {other:?}"),
        }
    }

    #[test]
    fn tcp_feed_reports_failed_connect() {
        // Reserved port with nothing listening.
        let config = FeedConfig {
            endpoint: "127.0.0.1:9".to_string(),
            reconnect_delay_ms: 10,
            ..Default::default()
        };
        let rx = spawn_tcp_feed(&config);
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            FeedMessage::Disconnected { .. },
        ));
    }

    #[test]
    fn tcp_feed_streams_lines_then_disconnects() {
        use std::io::Write as _;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(b"{\"t_utc\": \"083000\"}\n\n").unwrap();
        });

        let config = FeedConfig {
            endpoint: addr.to_string(),
            reconnect_delay_ms: 5_000,
            ..Default::default()
        };
        let rx = spawn_tcp_feed(&config);
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            FeedMessage::Connected { .. },
        ));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FeedMessage::Line(line) => assert!(line.contains("083000")),
            other => panic!("expected Line, got {other:?}"),
        }
        // Blank line is skipped; peer close surfaces as a disconnect.
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            FeedMessage::Disconnected { .. },
        ));
    }
}
