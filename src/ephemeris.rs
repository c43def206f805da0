use log::debug;

use crate::{coordinates::Equatorial, time::UtTimestamp};

/// Source of the Sun's apparent equatorial position.
pub trait SolarEphemeris {
    fn sun_position(&self, t: &UtTimestamp) -> Equatorial;
}

/// Low-precision geocentric solar coordinates (Meeus, Astronomical
/// Algorithms, ch. 25), good to about 0.01 deg.
///
/// UT is used in place of TT and topocentric parallax (< 9") is ignored, so
/// the observing site never enters the result.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowPrecisionSun;

impl LowPrecisionSun {
    /// Apparent ecliptic longitude and true obliquity, radians.
    fn apparent_longitude_and_obliquity(t: f64) -> (f64, f64) {
        let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
        let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).to_radians();

        let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
            + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
            + 0.000289 * (3.0 * m).sin();
        let omega = (125.04 - 1934.136 * t).to_radians();
        let lambda = l0 + c - 0.00569 - 0.00478 * omega.sin();

        let eps0_arcsec = 84381.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t;
        let eps = eps0_arcsec / 3600.0 + 0.00256 * omega.cos();

        (lambda.to_radians(), eps.to_radians())
    }
}

impl SolarEphemeris for LowPrecisionSun {
    fn sun_position(&self, t: &UtTimestamp) -> Equatorial {
        let (lambda, eps) = Self::apparent_longitude_and_obliquity(t.julian_centuries());
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let (sin_eps, cos_eps) = eps.sin_cos();

        let ra = (cos_eps * sin_lambda).atan2(cos_lambda);
        let dec = (sin_eps * sin_lambda).asin();
        debug!("sun at {}: ra={:.6} rad dec={:.6} rad", t, ra, dec);
        Equatorial::new(ra, dec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sun(s: &str) -> Equatorial {
        LowPrecisionSun.sun_position(&UtTimestamp::parse(s).unwrap())
    }

    #[test]
    fn meeus_example_25a() {
        let pos = sun("1992/10/13 0:00");
        assert_abs_diff_eq!(pos.ra.to_degrees(), 198.38083, epsilon = 1e-3);
        assert_abs_diff_eq!(pos.dec_degrees(), -7.78507, epsilon = 1e-3);
    }

    #[test]
    fn march_equinox_2019() {
        let pos = sun("2019/3/20 21:58");
        let ra = pos.ra.to_degrees();
        assert!(ra < 0.05 || ra > 359.95, "ra = {}", ra);
        assert!(pos.dec_degrees().abs() < 0.02, "dec = {}", pos.dec_degrees());
    }

    #[test]
    fn june_solstice_2019() {
        let pos = sun("2019/6/21 15:54");
        assert_abs_diff_eq!(pos.ra_hours(), 6.0, epsilon = 0.01);
        assert_abs_diff_eq!(pos.dec_degrees(), 23.437, epsilon = 0.02);
    }
}
