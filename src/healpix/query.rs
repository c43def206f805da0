use crate::{constants::PI, coordinates::Vec3d};

use super::{
    pix::{pix2vec_ring, ring_info, vec2pix_ring},
    utils::{nside2npix, nside2nring},
};

/// Slack on the ring pre-selection so that rounding never drops a ring the
/// exact dot-product test would accept.
const RING_MARGIN: f64 = 1e-9;

/// RING-ordered pixels whose centres lie within `radius` radians of `center`.
///
/// The pixel containing `center` is always part of the result, so the set is
/// never empty. Output is sorted ascending.
pub fn query_disc_ring(nside: usize, center: &Vec3d, radius: f64) -> Vec<usize> {
    let npix = nside2npix(nside);
    if radius >= PI {
        return (0..npix).collect();
    }

    let center = center.normalized();
    let cos_r = radius.cos();
    let theta_c = center.z.clamp(-1.0, 1.0).acos();

    let mut result = Vec::new();
    for iring in 1..=nside2nring(nside) {
        let (start, count, z) = ring_info(nside, iring);
        if (z.acos() - theta_c).abs() > radius + RING_MARGIN {
            continue;
        }
        result.extend(
            (start..start + count).filter(|&ipix| pix2vec_ring(nside, ipix).dot(&center) >= cos_r),
        );
    }

    let ipix = vec2pix_ring(nside, &center);
    if let Err(pos) = result.binary_search(&ipix) {
        result.insert(pos, ipix);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(nside: usize, center: &Vec3d, radius: f64) -> Vec<usize> {
        let c = center.normalized();
        (0..nside2npix(nside))
            .filter(|&p| pix2vec_ring(nside, p).dot(&c) >= radius.cos())
            .collect()
    }

    #[test]
    fn matches_brute_force() {
        let nside = 16;
        let centers = [
            Vec3d::new(0.0, 0.0, 1.0),
            Vec3d::new(1.0, 0.0, 0.0),
            Vec3d::new(-0.3, 0.2, -0.9),
            pix2vec_ring(nside, 1000),
        ];
        for c in &centers {
            for &r_deg in &[3.0, 10.0, 45.0, 120.0] {
                let r = f64::to_radians(r_deg);
                let got = query_disc_ring(nside, c, r);
                let mut expected = brute_force(nside, c, r);
                let own = vec2pix_ring(nside, c);
                if let Err(pos) = expected.binary_search(&own) {
                    expected.insert(pos, own);
                }
                assert_eq!(got, expected, "center={:?} r={}", c, r_deg);
            }
        }
    }

    #[test]
    fn tiny_radius_keeps_center_pixel() {
        let nside = 32;
        let c = Vec3d::new(0.2, 0.5, 0.3);
        let got = query_disc_ring(nside, &c, 1e-8);
        assert_eq!(got, vec![vec2pix_ring(nside, &c)]);
    }

    #[test]
    fn half_sphere_and_whole_sky() {
        let nside = 8;
        let npix = nside2npix(nside);
        assert_eq!(query_disc_ring(nside, &Vec3d::new(0.0, 1.0, 0.0), PI).len(), npix);
        assert_eq!(query_disc_ring(nside, &Vec3d::new(0.0, 1.0, 0.0), 4.0).len(), npix);
        let north = query_disc_ring(nside, &Vec3d::new(0.0, 0.0, 1.0), PI / 2.0);
        // the equator ring sits exactly at z = 0 and falls just outside
        assert_eq!(north.len(), npix / 2 - 2 * nside);
    }

    #[test]
    fn monotonic_in_radius() {
        let nside = 16;
        let c = Vec3d::new(0.4, -0.1, 0.6);
        let small = query_disc_ring(nside, &c, 0.1);
        let large = query_disc_ring(nside, &c, 0.2);
        assert!(small.iter().all(|p| large.binary_search(p).is_ok()));
        assert!(large.len() > small.len());
    }
}
