pub use std::f64::consts::PI;

pub const TWO_PI: f64 = 2.0 * PI;

/// Marker written into masked pixels. Renderers treat it as blank.
pub const UNSEEN: f64 = f64::NAN;

/// Half-opening angle of a single pointing (10.1 deg beam diameter).
pub const DEFAULT_POINTING_RADIUS_DEG: f64 = 5.05;

pub const J2000_JD: f64 = 2451545.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
pub const SECONDS_PER_DAY: f64 = 86400.0;
