use crate::{
    constants::PI,
    coordinates::{SphCoord, Vec3d},
};

use super::utils::{isqrt, nside2ncap, nside2npix};

/// First pixel, pixel count and `z = cos(theta)` of ring `iring` (1-based).
pub fn ring_info(nside: usize, iring: usize) -> (usize, usize, f64) {
    let npix = nside2npix(nside);
    let ncap = nside2ncap(nside);
    let fact2 = 4.0 / npix as f64;
    let fact1 = (2 * nside) as f64 * fact2;
    if iring < nside {
        let z = 1.0 - (iring * iring) as f64 * fact2;
        (2 * iring * (iring - 1), 4 * iring, z)
    } else if iring <= 3 * nside {
        let z = (2 * nside as i64 - iring as i64) as f64 * fact1;
        (ncap + (iring - nside) * 4 * nside, 4 * nside, z)
    } else {
        let nr = 4 * nside - iring;
        let z = -1.0 + (nr * nr) as f64 * fact2;
        (npix - 2 * nr * (nr + 1), 4 * nr, z)
    }
}

/// Ring number (1-based, counted from the north pole) of `ipix`.
pub fn pix2ring_ring(nside: usize, ipix: usize) -> usize {
    let npix = nside2npix(nside);
    let ncap = nside2ncap(nside);
    if ipix < ncap {
        (1 + isqrt(1 + 2 * ipix)) >> 1
    } else if ipix < npix - ncap {
        (ipix - ncap) / (4 * nside) + nside
    } else {
        let ip = npix - ipix;
        4 * nside - ((1 + isqrt(2 * ip - 1)) >> 1)
    }
}

fn pix2zphi_ring(nside: usize, ipix: usize) -> (f64, f64) {
    let npix = nside2npix(nside);
    let ncap = nside2ncap(nside);
    let fact2 = 4.0 / npix as f64;
    let fact1 = (2 * nside) as f64 * fact2;
    if ipix < ncap {
        let iring = (1 + isqrt(1 + 2 * ipix)) >> 1;
        let iphi = (ipix + 1) - 2 * iring * (iring - 1);
        let z = 1.0 - (iring * iring) as f64 * fact2;
        let phi = (iphi as f64 - 0.5) * (PI / 2.0) / iring as f64;
        (z, phi)
    } else if ipix < npix - ncap {
        let ip = ipix - ncap;
        let iring = ip / (4 * nside) + nside;
        let iphi = ip % (4 * nside) + 1;
        let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };
        let z = (2 * nside as i64 - iring as i64) as f64 * fact1;
        let phi = (iphi as f64 - fodd) * PI * 0.75 * fact1;
        (z, phi)
    } else {
        let ip = npix - ipix;
        let iring = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let z = -1.0 + (iring * iring) as f64 * fact2;
        let phi = (iphi as f64 - 0.5) * (PI / 2.0) / iring as f64;
        (z, phi)
    }
}

pub fn pix2ang_ring(nside: usize, ipix: usize) -> SphCoord {
    let (z, phi) = pix2zphi_ring(nside, ipix);
    SphCoord::new(z.acos(), phi)
}

pub fn pix2vec_ring(nside: usize, ipix: usize) -> Vec3d {
    let (z, phi) = pix2zphi_ring(nside, ipix);
    let sth = ((1.0 - z) * (1.0 + z)).sqrt();
    Vec3d::new(sth * phi.cos(), sth * phi.sin(), z)
}

fn fmodulo(v: f64, m: f64) -> f64 {
    if v >= 0.0 {
        if v < m {
            v
        } else {
            v % m
        }
    } else {
        let r = v % m + m;
        if r >= m {
            0.0
        } else {
            r
        }
    }
}

fn zphi2pix_ring(nside: usize, z: f64, phi: f64) -> usize {
    let ns = nside as i64;
    let nl4 = 4 * ns;
    let za = z.abs();
    let tt = fmodulo(phi * 2.0 / PI, 4.0);
    if za <= 2.0 / 3.0 {
        let temp1 = nside as f64 * (0.5 + tt);
        let temp2 = nside as f64 * z * 0.75;
        let jp = (temp1 - temp2) as i64;
        let jm = (temp1 + temp2) as i64;
        let ir = ns + 1 + jp - jm;
        let kshift = 1 - (ir & 1);
        let t1 = jp + jm - ns + kshift + 1 + nl4 + nl4;
        let ip = (t1 >> 1) % nl4;
        (nside2ncap(nside) as i64 + (ir - 1) * nl4 + ip) as usize
    } else {
        let tp = tt - tt.floor();
        let tmp = nside as f64 * (3.0 * (1.0 - za)).sqrt();
        let jp = (tp * tmp) as i64;
        let jm = ((1.0 - tp) * tmp) as i64;
        let ir = jp + jm + 1;
        let ip = ((tt * ir as f64) as i64).min(4 * ir - 1);
        if z > 0.0 {
            (2 * ir * (ir - 1) + ip) as usize
        } else {
            (nside2npix(nside) as i64 - 2 * ir * (ir + 1) + ip) as usize
        }
    }
}

pub fn ang2pix_ring(nside: usize, sph: &SphCoord) -> usize {
    zphi2pix_ring(nside, sph.pol.cos(), sph.az)
}

pub fn vec2pix_ring(nside: usize, v: &Vec3d) -> usize {
    let n = v.norm();
    let z = (v.z / n).clamp(-1.0, 1.0);
    let phi = if v.x == 0.0 && v.y == 0.0 {
        0.0
    } else {
        v.y.atan2(v.x)
    };
    zphi2pix_ring(nside, z, phi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pix2ang_ang2pix_round_trip() {
        for &nside in &[1, 2, 4, 8, 16, 32] {
            for ipix in 0..nside2npix(nside) {
                let sph = pix2ang_ring(nside, ipix);
                assert_eq!(ang2pix_ring(nside, &sph), ipix, "nside={} ipix={}", nside, ipix);
                let v = pix2vec_ring(nside, ipix);
                assert_eq!(vec2pix_ring(nside, &v), ipix, "nside={} ipix={}", nside, ipix);
            }
        }
    }

    #[test]
    fn pixel_vectors_are_unit() {
        let nside = 16;
        for ipix in 0..nside2npix(nside) {
            assert_abs_diff_eq!(pix2vec_ring(nside, ipix).norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn first_pixel_nside1() {
        let sph = pix2ang_ring(1, 0);
        assert_abs_diff_eq!(sph.pol, (2.0_f64 / 3.0).acos(), epsilon = 1e-12);
        assert_abs_diff_eq!(sph.az, PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rings_partition_pixels() {
        let nside = 8;
        let mut expected_start = 0;
        for iring in 1..=4 * nside - 1 {
            let (start, count, z) = ring_info(nside, iring);
            assert_eq!(start, expected_start);
            for ipix in start..start + count {
                assert_eq!(pix2ring_ring(nside, ipix), iring);
                assert_abs_diff_eq!(pix2vec_ring(nside, ipix).z, z, epsilon = 1e-12);
            }
            expected_start += count;
        }
        assert_eq!(expected_start, nside2npix(nside));
    }

    #[test]
    fn poles_and_equator() {
        let nside = 64;
        let north = vec2pix_ring(nside, &Vec3d::new(0.0, 0.0, 1.0));
        assert!(north < 4);
        let south = vec2pix_ring(nside, &Vec3d::new(0.0, 0.0, -1.0));
        assert!(south >= nside2npix(nside) - 4);
        let eq = vec2pix_ring(nside, &Vec3d::new(1.0, 0.0, 0.0));
        assert_eq!(pix2ring_ring(nside, eq), 2 * nside);
    }
}
