//! Observing window of an instrument restricted to a cone around the
//! antisolar point.

use std::fmt;

use log::{debug, warn};

use crate::{
    coordinates::{Equatorial, Galactic, Vec3d},
    ephemeris::{LowPrecisionSun, SolarEphemeris},
    error::Result,
    time::UtTimestamp,
};

/// Longitude offsets (deg) of the annotation labels from the points they name.
const WINDOW_LABEL_OFFSET_DEG: f64 = 20.0;
const SUN_LABEL_OFFSET_DEG: f64 = -5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObsWindow {
    pub time: UtTimestamp,
    pub sun: Equatorial,
    pub center: Equatorial,
    pub sun_galactic: Galactic,
    pub center_galactic: Galactic,
    /// Half-opening angle of the allowed pointing cone.
    pub radius_deg: f64,
}

/// Text placed on an all-sky map at Galactic `(lon_deg, lat_deg)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyLabel {
    pub text: &'static str,
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl ObsWindow {
    pub fn radius(&self) -> f64 {
        self.radius_deg.to_radians()
    }

    /// Galactic unit vector of the window centre, for disc queries.
    pub fn center_vector(&self) -> Vec3d {
        self.center_galactic.to_vec3d()
    }

    pub fn sun_vector(&self) -> Vec3d {
        self.sun_galactic.to_vec3d()
    }

    pub fn label_positions(&self) -> [SkyLabel; 2] {
        [
            SkyLabel {
                text: "Obs Window",
                lon_deg: self.center_galactic.lon_degrees() + WINDOW_LABEL_OFFSET_DEG,
                lat_deg: self.center_galactic.lat_degrees(),
            },
            SkyLabel {
                text: "Sun",
                lon_deg: self.sun_galactic.lon_degrees() + SUN_LABEL_OFFSET_DEG,
                lat_deg: self.sun_galactic.lat_degrees(),
            },
        ]
    }
}

impl fmt::Display for ObsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}, Window Center: [{}], radius {} deg",
            self.time, self.center, self.radius_deg
        )
    }
}

/// Window for the UT date string `date` using the built-in solar ephemeris.
pub fn compute_antipodal_window(date: &str, radius_deg: f64) -> Result<ObsWindow> {
    let time = UtTimestamp::parse(date)?;
    Ok(compute_antipodal_window_at(&LowPrecisionSun, &time, radius_deg))
}

pub fn compute_antipodal_window_at<E>(ephemeris: &E, time: &UtTimestamp, radius_deg: f64) -> ObsWindow
where
    E: SolarEphemeris + ?Sized,
{
    if radius_deg >= 180.0 {
        warn!("window radius {} deg covers the whole sky", radius_deg);
    }

    let sun = ephemeris.sun_position(time);
    let center = sun.antipode();
    let sun_galactic = sun.to_galactic();
    let center_galactic = center.to_galactic();
    debug!(
        "window centre {} -> galactic l={:.4} b={:.4} deg",
        center,
        center_galactic.lon_degrees(),
        center_galactic.lat_degrees()
    );

    ObsWindow {
        time: *time,
        sun,
        center,
        sun_galactic,
        center_galactic,
        radius_deg,
    }
}
