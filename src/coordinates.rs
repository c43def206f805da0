use std::fmt;

use ndarray::{arr1, arr2, Array1, Array2};

use crate::constants::{PI, TWO_PI};

/// Rows are the Galactic x, y, z axes expressed in J2000 equatorial
/// coordinates, so `gal = M * eq` and `eq = M^T * gal`.
#[allow(clippy::excessive_precision)]
pub const EQUATORIAL_TO_GALACTIC: [[f64; 3]; 3] = [
    [
        -0.054875560416215368492398900454,
        -0.873437090234885048760383168409,
        -0.483835015548713226831774175116,
    ],
    [
        0.494109427875583673525222371358,
        -0.444829629960011178146614061616,
        0.746982244497218890527388004556,
    ],
    [
        -0.867666149019004701181616534570,
        -0.198076373431201528180486091412,
        0.455983776175066922272100478348,
    ],
];

/// Wraps an angle into `[0, 2pi)`.
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TWO_PI);
    if r >= TWO_PI {
        0.0
    } else {
        r
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3d { x, y, z }
    }

    pub fn dot(&self, rhs: &Vec3d) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(&self) -> Vec3d {
        let n = self.norm();
        Vec3d::new(self.x / n, self.y / n, self.z / n)
    }

    pub fn from_sph_coord(sph: SphCoord) -> Vec3d {
        let (sin_pol, cos_pol) = sph.pol.sin_cos();
        let (sin_az, cos_az) = sph.az.sin_cos();
        Vec3d::new(sin_pol * cos_az, sin_pol * sin_az, cos_pol)
    }

    pub fn to_sph_coord(&self) -> SphCoord {
        SphCoord::from_xyz(self.x, self.y, self.z)
    }

    /// Great-circle angle to `other`, in radians.
    pub fn angle_to(&self, other: &Vec3d) -> f64 {
        let a = self.normalized();
        let b = other.normalized();
        let cross = Vec3d::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        );
        cross.norm().atan2(a.dot(&b))
    }

    fn to_array(self) -> Array1<f64> {
        arr1(&[self.x, self.y, self.z])
    }

    fn from_array(v: &Array1<f64>) -> Vec3d {
        Vec3d::new(v[0], v[1], v[2])
    }
}

/// Spherical position as colatitude `pol` and azimuth `az`, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphCoord {
    pub pol: f64,
    pub az: f64,
}

impl SphCoord {
    pub fn new(pol: f64, az: f64) -> Self {
        SphCoord { pol, az }
    }

    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        SphCoord::new(PI / 2.0 - lat, lon)
    }

    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        let rho = (x * x + y * y).sqrt();
        let pol = rho.atan2(z);
        let az = if rho == 0.0 { 0.0 } else { y.atan2(x) };
        SphCoord::new(pol, normalize_angle(az))
    }

    pub fn lon(&self) -> f64 {
        self.az
    }

    pub fn lat(&self) -> f64 {
        PI / 2.0 - self.pol
    }
}

/// Equatorial direction, J2000. `ra` in `[0, 2pi)`, `dec` in `[-pi/2, pi/2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ra: f64,
    pub dec: f64,
}

impl Equatorial {
    pub fn new(ra: f64, dec: f64) -> Self {
        Equatorial {
            ra: normalize_angle(ra),
            dec,
        }
    }

    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Equatorial::new(ra_deg.to_radians(), dec_deg.to_radians())
    }

    pub fn ra_hours(&self) -> f64 {
        self.ra.to_degrees() / 15.0
    }

    pub fn dec_degrees(&self) -> f64 {
        self.dec.to_degrees()
    }

    /// The direction on the opposite side of the sphere.
    pub fn antipode(&self) -> Equatorial {
        Equatorial::new(self.ra + PI, -self.dec)
    }

    pub fn to_vec3d(&self) -> Vec3d {
        Vec3d::from_sph_coord(SphCoord::from_lonlat(self.ra, self.dec))
    }

    pub fn from_vec3d(v: &Vec3d) -> Equatorial {
        let sph = v.to_sph_coord();
        Equatorial::new(sph.lon(), sph.lat())
    }

    pub fn to_galactic(&self) -> Galactic {
        let m: Array2<f64> = arr2(&EQUATORIAL_TO_GALACTIC);
        let g = m.dot(&self.to_vec3d().to_array());
        Galactic::from_vec3d(&Vec3d::from_array(&g))
    }
}

impl fmt::Display for Equatorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RA {} DEC {}",
            format_hours(self.ra),
            format_degrees(self.dec)
        )
    }
}

/// Galactic direction. `lon` in `[0, 2pi)`, `lat` in `[-pi/2, pi/2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galactic {
    pub lon: f64,
    pub lat: f64,
}

impl Galactic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Galactic {
            lon: normalize_angle(lon),
            lat,
        }
    }

    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Galactic::new(lon_deg.to_radians(), lat_deg.to_radians())
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }

    pub fn to_vec3d(&self) -> Vec3d {
        Vec3d::from_sph_coord(SphCoord::from_lonlat(self.lon, self.lat))
    }

    pub fn from_vec3d(v: &Vec3d) -> Galactic {
        let sph = v.to_sph_coord();
        Galactic::new(sph.lon(), sph.lat())
    }

    pub fn to_equatorial(&self) -> Equatorial {
        let m: Array2<f64> = arr2(&EQUATORIAL_TO_GALACTIC);
        let e = m.t().dot(&self.to_vec3d().to_array());
        Equatorial::from_vec3d(&Vec3d::from_array(&e))
    }
}

impl fmt::Display for Galactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "l {} b {}",
            format_degrees(self.lon),
            format_degrees(self.lat)
        )
    }
}

impl From<Vec3d> for SphCoord {
    fn from(v: Vec3d) -> SphCoord {
        v.to_sph_coord()
    }
}

impl From<SphCoord> for Vec3d {
    fn from(s: SphCoord) -> Vec3d {
        Vec3d::from_sph_coord(s)
    }
}

impl From<Equatorial> for Vec3d {
    fn from(e: Equatorial) -> Vec3d {
        e.to_vec3d()
    }
}

impl From<Galactic> for Vec3d {
    fn from(g: Galactic) -> Vec3d {
        g.to_vec3d()
    }
}

fn sexagesimal(value: f64, decimals: u32) -> String {
    let scale = 10_u64.pow(decimals);
    let sign = if value < 0.0 { "-" } else { "" };
    let total = (value.abs() * 3600.0 * scale as f64).round() as u64;
    let frac = total % scale;
    let secs = total / scale % 60;
    let mins = total / scale / 60 % 60;
    let units = total / scale / 3600;
    if decimals == 0 {
        format!("{}{}:{:02}:{:02}", sign, units, mins, secs)
    } else {
        format!(
            "{}{}:{:02}:{:02}.{:0width$}",
            sign,
            units,
            mins,
            secs,
            frac,
            width = decimals as usize
        )
    }
}

/// `h:mm:ss.ss` for an angle in radians.
pub fn format_hours(rad: f64) -> String {
    sexagesimal(rad.to_degrees() / 15.0, 2)
}

/// `d:mm:ss.s` for an angle in radians.
pub fn format_degrees(rad: f64) -> String {
    sexagesimal(rad.to_degrees(), 1)
}
