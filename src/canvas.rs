//! RGB card canvas
//!
//! An in-memory pixel buffer that embedded-graphics can draw on, backed by an
//! `image::RgbImage` so the finished card can be written straight to PNG.

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use image::{ImageFormat, Rgb, RgbImage};
use std::convert::Infallible;
use std::path::Path;

/// Card-sized drawing surface
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Number of pixels currently set to `color`.
    pub fn count_pixels(&self, color: Rgb888) -> usize {
        let target = Rgb([color.r(), color.g(), color.b()]);
        self.image.pixels().filter(|p| **p == target).count()
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, ImageFormat::Png)
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            // Off-canvas pixels are clipped
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < width && y < height {
                self.image
                    .put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}
