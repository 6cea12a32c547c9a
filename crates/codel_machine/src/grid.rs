use alloc::vec;
use alloc::vec::Vec;
use thiserror_no_std::Error;
use tracing::debug;

use crate::colour::{Colour, Rgba};
use crate::direction::Position;

/// Read access to a rectangular grid of raw pixels. The image codec lives
/// outside this crate; anything that can answer these three questions can
/// be run as a program.
pub trait PixelSource {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// The pixel at column `x`, row `y`, or `None` outside the image.
    fn pixel(&self, x: usize, y: usize) -> Option<Rgba>;
}

/// Write access to a grid of raw pixels, used by the painter.
pub trait PixelSink {
    /// Returns `false` when the coordinate is outside the image.
    fn set_pixel(&mut self, x: usize, y: usize, value: Rgba) -> bool;
}

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RasterError {
    #[error("a {0}x{1} raster does not fit in memory")]
    TooLarge(usize, usize),
    #[error("expected {expected} bytes of RGBA data but got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// An in-memory RGBA image, row major.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Raster {
    pub fn new(width: usize, height: usize, fill: Rgba) -> Result<Self, RasterError> {
        let Some(len) = width.checked_mul(height) else {
            return Err(RasterError::TooLarge(width, height));
        };
        Ok(Self {
            width,
            height,
            pixels: vec![fill; len],
        })
    }

    /// Builds a raster from tightly packed 8 bit RGBA bytes.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, RasterError> {
        let Some(expected) = width.checked_mul(height).and_then(|len| len.checked_mul(4)) else {
            return Err(RasterError::TooLarge(width, height));
        };
        if bytes.len() != expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| px.iter().fold(0u32, |raw, byte| (raw << 8) | u32::from(*byte)))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// The raster as tightly packed 8 bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|raw| raw.to_be_bytes()).collect()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        y.checked_mul(self.width)?.checked_add(x)
    }
}

impl PixelSource for Raster {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        self.index(x, y).and_then(|i| self.pixels.get(i).copied())
    }
}

impl PixelSink for Raster {
    fn set_pixel(&mut self, x: usize, y: usize, value: Rgba) -> bool {
        let Some(slot) = self.index(x, y).and_then(|i| self.pixels.get_mut(i)) else {
            return false;
        };
        *slot = value;
        true
    }
}

impl<P: PixelSource + ?Sized> PixelSource for &P {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (**self).pixel(x, y)
    }
}

/// A pixel source addressed in codels. The codel size is worked out once,
/// when the grid is built.
#[derive(Debug)]
pub struct ColourGrid<P> {
    source: P,
    codel_size: usize,
    width: usize,
    height: usize,
}

impl<P: PixelSource> ColourGrid<P> {
    pub fn new(source: P) -> Self {
        let codel_size = detect_codel_size(&source);
        let width = source.width() / codel_size;
        let height = source.height() / codel_size;
        debug!(codel_size, width, height, "detected codel size");
        Self {
            source,
            codel_size,
            width,
            height,
        }
    }

    pub fn codel_size(&self) -> usize {
        self.codel_size
    }

    /// Width in codels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in codels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cell(position).is_some()
    }

    /// Converts a position to unsigned codel coordinates when it is on the
    /// grid.
    pub fn cell(&self, position: Position) -> Option<(usize, usize)> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// The raw value of the codel's top left pixel.
    pub fn raw_at(&self, position: Position) -> Option<Rgba> {
        let (x, y) = self.cell(position)?;
        self.source
            .pixel(x.checked_mul(self.codel_size)?, y.checked_mul(self.codel_size)?)
    }

    pub fn colour_at(&self, position: Position) -> Option<Colour> {
        self.raw_at(position).map(Colour::from_raw)
    }
}

/// Picks the largest size, among those dividing both dimensions, at which
/// every aligned square of the image is a single colour.
fn detect_codel_size<P: PixelSource>(source: &P) -> usize {
    let width = source.width();
    let height = source.height();
    if width == 0 || height == 0 {
        return 1;
    }

    let candidates: Vec<usize> = (1..=width.min(height))
        .filter(|size| width % size == 0 && height % size == 0)
        .collect();
    if candidates.len() == 1 {
        return 1;
    }

    candidates
        .iter()
        .rev()
        .copied()
        .find(|size| is_uniform_at(source, *size))
        .unwrap_or(1)
}

fn is_uniform_at<P: PixelSource>(source: &P, size: usize) -> bool {
    let columns = source.width() / size;
    let rows = source.height() / size;
    (0..columns).all(|cx| (0..rows).all(|cy| is_homogeneous(source, cx * size, cy * size, size)))
}

fn is_homogeneous<P: PixelSource>(source: &P, left: usize, top: usize, size: usize) -> bool {
    let corner = source.pixel(left, top);
    (left..left + size).all(|x| (top..top + size).all(|y| source.pixel(x, y) == corner))
}
