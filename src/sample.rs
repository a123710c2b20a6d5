//! Pixel sampling from decoded images.
//!
//! Coordinates have their origin at the top-left corner, with `x` growing to
//! the right and `y` growing downwards.

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::color::ColorSample;

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The middle pixel of a `width` x `height` image, the default pick when
    /// no coordinate is given.
    #[must_use]
    pub const fn center(width: u32, height: u32) -> Self {
        Self {
            x: width / 2,
            y: height / 2,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Decode an image file into 8-bit RGB, dropping any alpha channel.
///
/// # Errors
///
/// Returns [`SampleError::Decode`] if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<RgbImage, SampleError> {
    let img = image::open(path).map_err(|source| SampleError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = img.to_rgb8();
    log::debug!(
        "loaded {} ({} x {})",
        path.display(),
        rgb.width(),
        rgb.height()
    );
    Ok(rgb)
}

/// Read the color of one pixel.
///
/// # Errors
///
/// Returns [`SampleError::OutOfBounds`] if `position` lies outside the image.
pub fn sample_pixel(image: &RgbImage, position: Position) -> Result<ColorSample, SampleError> {
    let (width, height) = image.dimensions();
    let pixel = image
        .get_pixel_checked(position.x, position.y)
        .ok_or(SampleError::OutOfBounds {
            position,
            width,
            height,
        })?;
    Ok(ColorSample::from(pixel.0))
}

/// Errors raised while sampling a pixel.
#[derive(Debug)]
pub enum SampleError {
    /// The image could not be opened or decoded.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// The requested pixel is outside the image.
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, source } => {
                write!(f, "Cannot read image {}: {source}", path.display())
            }
            Self::OutOfBounds {
                position,
                width,
                height,
            } => write!(
                f,
                "Pixel X = {}, Y = {} is outside the {width} x {height} image",
                position.x, position.y
            ),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::OutOfBounds { .. } => None,
        }
    }
}
