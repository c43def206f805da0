//! Random sky pointings and the coverage they achieve.

use log::info;
use rand::{distributions::Uniform, rngs::StdRng, thread_rng, Rng, SeedableRng};

use crate::{
    error::{Result, SkyError},
    healpix::{RingPixelization, SkyPixelization},
    masker::check_radius,
};

pub use crate::constants::DEFAULT_POINTING_RADIUS_DEG;

/// `n` pixel indices drawn uniformly, with replacement, from `rng`.
pub fn sample_random_pointings_with<R>(rng: &mut R, nside: usize, n: usize) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    let npix = RingPixelization::new(nside)?.pixel_count();
    let dist = Uniform::from(0..npix);
    Ok((0..n).map(|_| rng.sample(dist)).collect())
}

/// `n` uniform random pixel indices. With `seed = None` every call draws a
/// fresh sequence from the thread RNG.
pub fn sample_random_pointings(nside: usize, n: usize, seed: Option<u64>) -> Result<Vec<usize>> {
    match seed {
        Some(seed) => sample_random_pointings_with(&mut StdRng::seed_from_u64(seed), nside, n),
        None => sample_random_pointings_with(&mut thread_rng(), nside, n),
    }
}

/// Sets to 1.0 every pixel of `coverage` within `radius` radians of any
/// pointing's pixel centre.
pub fn rasterize_coverage_with<P>(
    pix: &P,
    coverage: &mut [f64],
    pointings: &[usize],
    radius: f64,
) -> Result<()>
where
    P: SkyPixelization + ?Sized,
{
    let npix = pix.pixel_count();
    if coverage.len() != npix {
        return Err(SkyError::SizeMismatch {
            expected: npix,
            found: coverage.len(),
        });
    }
    check_radius(radius)?;
    if let Some(&pixel) = pointings.iter().find(|&&p| p >= npix) {
        return Err(SkyError::PixelOutOfRange { pixel, npix });
    }

    for &p in pointings {
        let center = pix.pixel_to_vector(p);
        for ipix in pix.query_disc(&center, radius) {
            coverage[ipix] = 1.0;
        }
    }
    Ok(())
}

/// Coverage map (1.0 covered, 0.0 not) of discs of `radius_deg` around each
/// pointing.
pub fn rasterize_coverage(nside: usize, pointings: &[usize], radius_deg: f64) -> Result<Vec<f64>> {
    let pix = RingPixelization::new(nside)?;
    let mut coverage = vec![0.0; pix.pixel_count()];
    rasterize_coverage_with(&pix, &mut coverage, pointings, radius_deg.to_radians())?;
    info!(
        "{} pointings of {} deg cover {:.2}% of the sky at nside {}",
        pointings.len(),
        radius_deg,
        100.0 * coverage_fraction(&coverage),
        nside
    );
    Ok(coverage)
}

/// Fraction of pixels marked as covered.
pub fn coverage_fraction(coverage: &[f64]) -> f64 {
    if coverage.is_empty() {
        return 0.0;
    }
    coverage.iter().filter(|&&x| x > 0.0).count() as f64 / coverage.len() as f64
}
