//! PNG files in and out of [`Raster`]s.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::RgbaImage;

use codel_machine::{PixelSource, Raster};

pub fn load(path: &Path) -> Result<Raster> {
    let image = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgba8();
    from_image(&image)
}

pub fn save(raster: &Raster, path: &Path) -> Result<()> {
    to_image(raster)?
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn from_image(image: &RgbaImage) -> Result<Raster> {
    let width = usize::try_from(image.width())?;
    let height = usize::try_from(image.height())?;
    Raster::from_rgba8(width, height, image.as_raw()).map_err(|error| anyhow!("{error}"))
}

pub fn to_image(raster: &Raster) -> Result<RgbaImage> {
    let width = u32::try_from(raster.width()).context("image too wide")?;
    let height = u32::try_from(raster.height()).context("image too tall")?;
    RgbaImage::from_raw(width, height, raster.to_rgba8())
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))
}
