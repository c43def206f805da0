pub mod cfg;
pub mod constants;
pub mod coordinates;
pub mod ephemeris;
pub mod error;
pub mod fits;
pub mod healpix;
pub mod masker;
pub mod pointing;
pub mod time;
pub mod window;

pub use crate::{
    cfg::{ObsCfg, PointingCfg, WindowCfg},
    constants::{DEFAULT_POINTING_RADIUS_DEG, UNSEEN},
    coordinates::{Equatorial, Galactic, SphCoord, Vec3d},
    ephemeris::{LowPrecisionSun, SolarEphemeris},
    error::{Result, SkyError},
    healpix::{RingPixelization, SkyPixelization},
    masker::{mask_disc, mask_disc_in_place, mask_disc_with, mask_window},
    pointing::{
        coverage_fraction, rasterize_coverage, rasterize_coverage_with, sample_random_pointings,
        sample_random_pointings_with,
    },
    time::UtTimestamp,
    window::{compute_antipodal_window, compute_antipodal_window_at, ObsWindow, SkyLabel},
};
