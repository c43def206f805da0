use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkyError {
    #[error("invalid UT timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("map has {found} pixels, nside implies {expected}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("angular radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("disc centre must be a finite, non-zero vector")]
    InvalidCenter,

    #[error("invalid nside: {0}")]
    InvalidNside(usize),

    #[error("{0} is not a valid HEALPix pixel count")]
    InvalidPixelCount(usize),

    #[error("pixel {pixel} out of range for a map of {npix} pixels")]
    PixelOutOfRange { pixel: usize, npix: usize },

    #[error("FITS: {0}")]
    Fits(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SkyError>;
