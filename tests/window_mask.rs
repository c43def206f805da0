use approx::assert_abs_diff_eq;

use halosat_window::{
    compute_antipodal_window, compute_antipodal_window_at,
    fits::{read_map, write_map},
    healpix::{nside2npix, vec2pix_ring},
    mask_window, Equatorial, SolarEphemeris, UtTimestamp,
};

struct SunAt(Equatorial);

impl SolarEphemeris for SunAt {
    fn sun_position(&self, _t: &UtTimestamp) -> Equatorial {
        self.0
    }
}

#[test]
fn window_geometry_with_fake_sun() {
    let t = UtTimestamp::parse("2019/3/9 5:13").unwrap();
    let w = compute_antipodal_window_at(&SunAt(Equatorial::new(0.0, 0.0)), &t, 10.0);
    assert_abs_diff_eq!(w.center.ra_hours(), 12.0, epsilon = 1e-12);
    assert_eq!(w.center.dec, 0.0);
}

#[test]
fn masked_map_survives_fits_round_trip() {
    let nside = 64;
    let map: Vec<f64> = (0..nside2npix(nside)).map(|i| (i % 97) as f64).collect();
    let window = compute_antipodal_window("2019/3/9 5:13", 10.0).unwrap();
    let masked = mask_window(&map, nside, &window).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("window.fits");
    write_map(&path, &[&masked], false).unwrap();
    let back = read_map(&path).unwrap();

    assert_eq!(back.len(), masked.len());
    let center = vec2pix_ring(nside, &window.center_vector());
    assert!(back[center].is_nan());
    let blanks = back.iter().filter(|x| x.is_nan()).count();
    assert_eq!(blanks, masked.iter().filter(|x| x.is_nan()).count());
    // a 10 deg cone is ~0.76% of the sky
    let expected = nside2npix(nside) as f64 * (1.0 - 10.0_f64.to_radians().cos()) / 2.0;
    assert!((blanks as f64 - expected).abs() < 0.1 * expected);
}
