use log::{debug, info};

use crate::{
    constants::UNSEEN,
    coordinates::Vec3d,
    error::{Result, SkyError},
    healpix::{RingPixelization, SkyPixelization},
    window::ObsWindow,
};

pub(crate) fn check_radius(radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(SkyError::InvalidRadius(radius))
    }
}

fn check_center(center: &Vec3d) -> Result<()> {
    let norm = center.norm();
    if norm > 0.0 && norm.is_finite() {
        Ok(())
    } else {
        Err(SkyError::InvalidCenter)
    }
}

/// Overwrites every pixel within `radius` radians of `center` with
/// [`UNSEEN`], leaving the rest of `map` untouched. Returns the number of
/// masked pixels.
pub fn mask_disc_with<P, V>(pix: &P, map: &mut [f64], center: V, radius: f64) -> Result<usize>
where
    P: SkyPixelization + ?Sized,
    V: Into<Vec3d>,
{
    let expected = pix.pixel_count();
    if map.len() != expected {
        return Err(SkyError::SizeMismatch {
            expected,
            found: map.len(),
        });
    }
    check_radius(radius)?;
    let center: Vec3d = center.into();
    check_center(&center)?;

    let disc = pix.query_disc(&center, radius);
    debug!("disc query r={:.6} rad returned {} pixels", radius, disc.len());
    for &ipix in &disc {
        map[ipix] = UNSEEN;
    }
    Ok(disc.len())
}

pub fn mask_disc_in_place<V>(map: &mut [f64], nside: usize, center: V, radius: f64) -> Result<usize>
where
    V: Into<Vec3d>,
{
    mask_disc_with(&RingPixelization::new(nside)?, map, center, radius)
}

/// Copy of `map` with the disc around `center` set to [`UNSEEN`].
pub fn mask_disc<V>(map: &[f64], nside: usize, center: V, radius: f64) -> Result<Vec<f64>>
where
    V: Into<Vec3d>,
{
    let mut masked = map.to_vec();
    mask_disc_in_place(&mut masked, nside, center, radius)?;
    Ok(masked)
}

/// Blanks the observing window, in Galactic coordinates, on `map`.
pub fn mask_window(map: &[f64], nside: usize, window: &ObsWindow) -> Result<Vec<f64>> {
    let mut masked = map.to_vec();
    let n = mask_disc_in_place(&mut masked, nside, window.center_galactic, window.radius())?;
    info!(
        "masked {} of {} pixels for the window at {}",
        n,
        masked.len(),
        window.time
    );
    Ok(masked)
}
