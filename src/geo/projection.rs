//! Spherical forward geodesic and heading-vector synthesis.
//!
//! All projections use the spherical Earth model (mean radius). Longitudes
//! are normalized to the half-open range [-180, 180) so consumers never see
//! antimeridian wraparound artifacts.

use serde::Serialize;

/// Mean Earth radius in meters for the spherical model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters traveled in one hour at one knot.
pub const METERS_PER_KNOT_HOUR: f64 = 1_852.0;

/// Arrow head length as a fraction of the projected travel distance.
pub const ARROW_LEN_FRACTION: f64 = 0.44;
/// Minimum arrow head length in meters.
pub const ARROW_LEN_MIN_M: f64 = 1_040.0;
/// Maximum arrow head length in meters.
pub const ARROW_LEN_MAX_M: f64 = 2_400.0;
/// Arrow head width as a fraction of its length.
pub const ARROW_WIDTH_RATIO: f64 = 0.9;
/// Mid-chevron width as a fraction of the arrow width.
pub const CHEVRON_WIDTH_RATIO: f64 = 0.9;
/// Notch length as a fraction of the chevron length.
pub const NOTCH_LEN_RATIO: f64 = 0.5;
/// Notch width as a fraction of the chevron width.
pub const NOTCH_WIDTH_RATIO: f64 = 0.6;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Construct a point, normalizing the longitude.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon: normalize_lon(lon),
        }
    }
}

/// Normalize a longitude in degrees to [-180, 180).
#[must_use]
pub fn normalize_lon(deg: f64) -> f64 {
    (deg + 540.0).rem_euclid(360.0) - 180.0
}

/// Forward geodesic on a sphere: the point reached from `origin` after
/// traveling `distance_m` meters along the initial bearing `bearing_deg`.
///
/// Zero distance returns the origin unchanged (modulo longitude
/// normalization).
#[must_use]
pub fn destination_point(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    if distance_m == 0.0 {
        return GeoPoint::new(origin.lat, origin.lon);
    }

    let bearing = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let dr = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * dr.cos() + lat1.cos() * dr.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * dr.sin() * lat1.cos()).atan2(dr.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Projected heading geometry for the map overlay.
///
/// The shaft spans one hour of travel at the current speed. The arrow head
/// sits at the far end; a chevron and a narrower notch mark the midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadingVector {
    /// Shaft from the current position to the one-hour projection.
    pub line: [GeoPoint; 2],
    /// Arrow head triangle at the far end: tip, left flank, right flank.
    pub arrow: [GeoPoint; 3],
    /// Mid-course chevron: left flank, midpoint, right flank.
    pub chevron: [GeoPoint; 3],
    /// Narrower notch under the chevron: left flank, midpoint, right flank.
    pub notch: [GeoPoint; 3],
}

impl HeadingVector {
    /// Build the heading geometry from position, course over ground, and
    /// speed. Callers are expected to gate on link health and minimum speed
    /// before constructing.
    #[must_use]
    pub fn project(origin: GeoPoint, cog_deg: f64, speed_knots: f64) -> Self {
        let distance = speed_knots * METERS_PER_KNOT_HOUR;
        let dest = destination_point(origin, cog_deg, distance);

        let arrow_len = (distance * ARROW_LEN_FRACTION).clamp(ARROW_LEN_MIN_M, ARROW_LEN_MAX_M);
        let arrow_width = arrow_len * ARROW_WIDTH_RATIO;
        let back = (cog_deg + 180.0) % 360.0;
        let port = (cog_deg + 270.0) % 360.0;
        let starboard = (cog_deg + 90.0) % 360.0;

        let base = destination_point(dest, back, arrow_len);
        let left = destination_point(base, port, arrow_width / 2.0);
        let right = destination_point(base, starboard, arrow_width / 2.0);

        let mid = destination_point(origin, cog_deg, distance * 0.5);
        let chev_len = arrow_len;
        let chev_width = arrow_width * CHEVRON_WIDTH_RATIO;
        let chev_base = destination_point(mid, back, chev_len);
        let chev_left = destination_point(chev_base, port, chev_width / 2.0);
        let chev_right = destination_point(chev_base, starboard, chev_width / 2.0);

        let notch_len = chev_len * NOTCH_LEN_RATIO;
        let notch_width = chev_width * NOTCH_WIDTH_RATIO;
        let notch_base = destination_point(mid, back, notch_len);
        let notch_left = destination_point(notch_base, port, notch_width / 2.0);
        let notch_right = destination_point(notch_base, starboard, notch_width / 2.0);

        Self {
            line: [origin, dest],
            arrow: [dest, left, right],
            chevron: [chev_left, mid, chev_right],
            notch: [notch_left, mid, notch_right],
        }
    }
}

// ──────────────────────── tests ────────────────────────
