//! Renders literal text as a program that prints it.
//!
//! Layout, one codel per cell, on a black background:
//!
//! ```text
//!     row 0   P P P P P P P P P P N N P P P ... N N F
//!     row 1   P P P P P P P P P P . . P P P ... . F F
//!     ...     P P                     P P
//! ```
//!
//! Each character gets a pale block (`P`) holding as many codels as its
//! code, packed row by row at most [`BLOCK_WIDTH`] wide, then a two codel
//! bar (`N`) of the same hue at normal lightness. Pale to normal is a push
//! of the block size. Every pale block is 60 degrees of hue behind the one
//! before, so normal to the next pale block prints the pushed value as a
//! character. The last bar leads into an L shaped block (`F`) whose every
//! exit is black or off the grid, which ends the run.

use alloc::vec::Vec;
use thiserror_no_std::Error;

use crate::colour::{self, BLACK, Colour, HUES};
use crate::grid::{PixelSink, PixelSource, Raster, RasterError};

/// Widest a character's block may be, in codels.
pub const BLOCK_WIDTH: usize = 10;
/// Largest character code the painter accepts.
pub const MAX_CHAR_CODE: u32 = 1024;
/// The closing block needs two rows.
const MIN_ROWS: usize = 2;
/// Width of the bar between two blocks.
const BAR_WIDTH: usize = 2;

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum PaintError {
    #[error("there is no text to paint")]
    EmptyText,
    #[error("character {0:?} cannot be painted; codes must be 1..=1024")]
    UnpaintableChar(char),
    #[error("codel size must be at least one pixel")]
    ZeroCodelSize,
    #[error("the image is too large: {0}")]
    Raster(RasterError),
    #[error("the pixel sink is smaller than the painting")]
    SinkTooSmall,
}

impl From<RasterError> for PaintError {
    fn from(error: RasterError) -> Self {
        PaintError::Raster(error)
    }
}

pub struct Painter<'t> {
    text: &'t str,
    codel_size: usize,
}

impl<'t> Painter<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            codel_size: 1,
        }
    }

    /// Paint every codel as a square of `size` pixels.
    pub fn codel_size(mut self, size: usize) -> Self {
        self.codel_size = size;
        self
    }

    /// Lays the program out at one pixel per codel.
    pub fn layout(&self) -> Result<Raster, PaintError> {
        let codes = self.codes()?;
        let rows = codes
            .iter()
            .map(|code| code.div_ceil(BLOCK_WIDTH))
            .max()
            .unwrap_or(0)
            .max(MIN_ROWS);

        let columns: usize = codes
            .iter()
            .map(|code| (*code).min(BLOCK_WIDTH) + BAR_WIDTH)
            .sum::<usize>()
            + 1;
        let mut width = columns;
        while gcd(width, rows) != 1 {
            width += 1;
        }

        let mut codels = Raster::new(width, rows, BLACK)?;
        let mut left = 0usize;
        let mut hue_index = 0usize;
        for code in codes.iter().copied() {
            let block_width = code.min(BLOCK_WIDTH);
            let pale = standard(hue_index, colour::PALE);
            let normal = standard(hue_index, colour::NORMAL);
            for k in 0..code {
                put(&mut codels, left + k % block_width, k / block_width, pale)?;
            }
            for offset in 0..BAR_WIDTH {
                put(&mut codels, left + block_width + offset, 0, normal)?;
            }
            left += block_width + BAR_WIDTH;
            hue_index += 1;
        }

        let last = standard(hue_index, colour::PALE);
        put(&mut codels, left, 0, last)?;
        put(&mut codels, left, 1, last)?;
        put(&mut codels, left - 1, 1, last)?;
        Ok(codels)
    }

    /// Pixel dimensions of the finished painting.
    pub fn dimensions(&self) -> Result<(usize, usize), PaintError> {
        let codels = self.layout()?;
        let scale = |n: usize| {
            n.checked_mul(self.codel_size)
                .ok_or(PaintError::Raster(RasterError::TooLarge(n, self.codel_size)))
        };
        Ok((scale(codels.width())?, scale(codels.height())?))
    }

    pub fn paint(&self) -> Result<Raster, PaintError> {
        let (width, height) = self.dimensions()?;
        let mut raster = Raster::new(width, height, BLACK)?;
        self.paint_into(&mut raster)?;
        Ok(raster)
    }

    /// Writes the painting into an existing sink, starting at its top left.
    pub fn paint_into<S: PixelSink>(&self, sink: &mut S) -> Result<(), PaintError> {
        if self.codel_size == 0 {
            return Err(PaintError::ZeroCodelSize);
        }
        let codels = self.layout()?;
        let size = self.codel_size;
        for cy in 0..codels.height() {
            for cx in 0..codels.width() {
                let value = codels.pixel(cx, cy).unwrap_or(BLACK);
                for py in cy * size..(cy + 1) * size {
                    for px in cx * size..(cx + 1) * size {
                        if !sink.set_pixel(px, py, value) {
                            return Err(PaintError::SinkTooSmall);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn codes(&self) -> Result<Vec<usize>, PaintError> {
        if self.codel_size == 0 {
            return Err(PaintError::ZeroCodelSize);
        }
        if self.text.is_empty() {
            return Err(PaintError::EmptyText);
        }
        self.text
            .chars()
            .map(|ch| match u32::from(ch) {
                code @ 1..=MAX_CHAR_CODE => usize::try_from(code).map_err(|_| PaintError::UnpaintableChar(ch)),
                _ => Err(PaintError::UnpaintableChar(ch)),
            })
            .collect()
    }
}

/// The hue `index` steps of 60 degrees backwards from red.
fn standard(index: usize, lightness: u8) -> Colour {
    let hue = HUES.get((HUES.len() - index % HUES.len()) % HUES.len()).copied().unwrap_or(0);
    Colour::standard(hue, lightness).unwrap_or(Colour::Black)
}

fn put(codels: &mut Raster, x: usize, y: usize, colour: Colour) -> Result<(), PaintError> {
    if codels.set_pixel(x, y, colour.to_raw()) {
        Ok(())
    } else {
        Err(PaintError::SinkTooSmall)
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod test;
