//! HEALPix RING-scheme pixelization of the sphere.
//!
//! Free functions follow the usual `nside2npix` / `pix2vec_ring` naming;
//! [`SkyPixelization`] wraps them behind a trait so map operations can be
//! exercised against other pixel layouts in tests.

pub mod pix;
pub mod query;
pub mod utils;

pub use pix::{ang2pix_ring, pix2ang_ring, pix2ring_ring, pix2vec_ring, ring_info, vec2pix_ring};
pub use query::query_disc_ring;
pub use utils::{npix2nside, nside2npix, nside2nring, MAX_NSIDE};

use crate::{
    coordinates::Vec3d,
    error::{Result, SkyError},
};

/// Hierarchical equal-area pixelization at a fixed resolution.
pub trait SkyPixelization {
    fn nside(&self) -> usize;

    fn pixel_count(&self) -> usize;

    /// Unit vector of the pixel centre.
    fn pixel_to_vector(&self, ipix: usize) -> Vec3d;

    fn vector_to_pixel(&self, v: &Vec3d) -> usize;

    /// Pixels whose centres lie within `radius` radians of `center`, sorted.
    fn query_disc(&self, center: &Vec3d, radius: f64) -> Vec<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingPixelization {
    nside: usize,
}

impl RingPixelization {
    pub fn new(nside: usize) -> Result<Self> {
        if nside == 0 || nside > MAX_NSIDE {
            return Err(SkyError::InvalidNside(nside));
        }
        Ok(RingPixelization { nside })
    }

    /// Resolution matching a map of `npix` pixels.
    pub fn for_map(npix: usize) -> Result<Self> {
        let nside = npix2nside(npix).ok_or(SkyError::InvalidPixelCount(npix))?;
        Ok(RingPixelization { nside })
    }
}

impl SkyPixelization for RingPixelization {
    fn nside(&self) -> usize {
        self.nside
    }

    fn pixel_count(&self) -> usize {
        nside2npix(self.nside)
    }

    fn pixel_to_vector(&self, ipix: usize) -> Vec3d {
        pix2vec_ring(self.nside, ipix)
    }

    fn vector_to_pixel(&self, v: &Vec3d) -> usize {
        vec2pix_ring(self.nside, v)
    }

    fn query_disc(&self, center: &Vec3d, radius: f64) -> Vec<usize> {
        query_disc_ring(self.nside, center, radius)
    }
}
