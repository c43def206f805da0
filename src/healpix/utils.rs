/// Largest resolution a 64-bit RING index supports.
pub const MAX_NSIDE: usize = 1 << 29;

pub fn nside2npix(nside: usize) -> usize {
    12 * nside * nside
}

/// Inverse of [`nside2npix`], `None` when `npix` is not a valid pixel count.
pub fn npix2nside(npix: usize) -> Option<usize> {
    let nside = isqrt(npix / 12);
    if nside > 0 && nside2npix(nside) == npix {
        Some(nside)
    } else {
        None
    }
}

pub fn nside2nring(nside: usize) -> usize {
    4 * nside - 1
}

/// Number of pixels in the northern polar cap.
pub fn nside2ncap(nside: usize) -> usize {
    2 * nside * (nside - 1)
}

pub(crate) fn isqrt(v: usize) -> usize {
    let mut r = (v as f64).sqrt() as usize;
    while r * r > v {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= v {
        r += 1;
    }
    r
}
