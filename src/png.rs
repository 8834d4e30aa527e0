use std::io::Write;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rgb::ComponentBytes;

use crate::surface::Surface;
use crate::ErrorKind;

/// Writes an 8-bit `Rgb` or `Rgba` surface as a PNG stream.
///
/// Alpha channels are written straight (non-premultiplied), as stored. The
/// alpha-only formats have no PNG color type here and fail with
/// [`ErrorKind::UnsupportedSurfaceFormat`].
pub fn write_png<W: Write>(surface: &Surface, writer: W) -> Result<(), ErrorKind> {
    let width = surface.width() as u32;
    let height = surface.height() as u32;

    match surface {
        Surface::Rgba(img) => {
            PngEncoder::new(writer).write_image(
                img.buf().as_bytes(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        Surface::Rgb(img) => {
            PngEncoder::new(writer).write_image(
                img.buf().as_bytes(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        other => return Err(ErrorKind::UnsupportedSurfaceFormat(other.format())),
    }

    Ok(())
}
