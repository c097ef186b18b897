//! Pixel sinks and image containers.
//!
//! The renderer hands each pixel's accumulated color to a [`PixelSink`];
//! the sink owns raster storage. Writing a container to disk is separate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::RenderResult;
use crate::renderer::encode_color;
use crate::Color;

/// Receives one finished pixel at a time.
pub trait PixelSink {
    /// `accumulated` is the unaveraged sum of `samples` radiance samples.
    fn write_color(&mut self, x: u32, y: u32, accumulated: Color, samples: u32);
}

/// 8-bit RGBA raster, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Number of RGBA bytes a `width` x `height` raster needs, or `None` if it
    /// does not fit in `usize`.
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)
    }

    /// Create a new image buffer filled with opaque black.
    ///
    /// Callers validate the resolution first; see [`ImageBuffer::byte_len`].
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        pixel_offset(self.width, x, y)
    }

    /// Get the RGBA value at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Raw RGBA bytes in row-major order.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }
}

impl PixelSink for ImageBuffer {
    fn write_color(&mut self, x: u32, y: u32, accumulated: Color, samples: u32) {
        let [r, g, b] = encode_color(accumulated, samples);
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&[r, g, b, 255]);
    }
}

fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// Write the image as an ASCII PPM (P3) triplet stream.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> RenderResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgba in image.as_rgba().chunks_exact(4) {
        writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the image, picking the container from the file extension.
///
/// `.ppm` is written as ASCII PPM; anything else goes through the `image`
/// crate (PNG, BMP, TGA, ...).
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)?;
        write_ppm(image, BufWriter::new(file))?;
    } else {
        image::save_buffer(
            path,
            image.as_rgba(),
            image.width,
            image.height,
            image::ColorType::Rgba8,
        )?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_opaque_black() {
        let image = ImageBuffer::new(3, 2);
        assert_eq!(image.as_rgba().len(), 24);
        assert_eq!(image.get(2, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_write_color_encodes_once() {
        let mut image = ImageBuffer::new(2, 2);
        image.write_color(1, 0, Color::new(1.0, 0.25, 0.0), 1);

        assert_eq!(image.get(1, 0), [255, 128, 0, 255]);
        assert_eq!(image.get(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_large_resolution_offsets_do_not_wrap() {
        // 2^30 pixels: the RGBA byte count no longer fits in u32
        assert_eq!(ImageBuffer::byte_len(32768, 32768), Some(1usize << 32));
        assert_eq!(pixel_offset(32768, 32767, 32767), (1usize << 32) - 4);
        assert_eq!(ImageBuffer::byte_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.write_color(0, 0, Color::ONE, 1);

        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 255 255\n0 0 0\n");
    }
}
