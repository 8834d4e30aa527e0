use imgref::{Img, ImgVec};
use rgb::{RGB8, RGBA8};

use crate::pixel::{Pixel, PixelFormat};
use crate::ErrorKind;

/// An owned pixel buffer the rasterizer paints into.
///
/// The buffer layout is row-major. `Rgba`, `Rgb` and `Alpha8` store one value
/// per pixel; the sub-byte alpha formats pack 2, 4 or 8 pixels per byte with
/// the leftmost pixel in the high bits.
///
/// A surface is not safe for concurrent mutation; contexts sharing one must
/// serialize externally.
pub enum Surface {
    Rgba(ImgVec<RGBA8>),
    Rgb(ImgVec<RGB8>),
    Alpha8(ImgVec<u8>),
    Packed {
        format: PixelFormat,
        data: Vec<u8>,
        width: usize,
        height: usize,
    },
}

impl Surface {
    /// Creates a zeroed (transparent) surface of the given format and size.
    pub fn new(format: PixelFormat, width: usize, height: usize) -> Self {
        match format {
            PixelFormat::Rgba => Self::Rgba(Img::new(
                vec![RGBA8::new(0, 0, 0, 0); width * height],
                width,
                height,
            )),
            PixelFormat::Rgb => Self::Rgb(Img::new(vec![RGB8::new(0, 0, 0); width * height], width, height)),
            PixelFormat::Alpha8 => Self::Alpha8(Img::new(vec![0u8; width * height], width, height)),
            PixelFormat::Alpha4 | PixelFormat::Alpha2 | PixelFormat::Alpha1 => {
                let per_byte = pixels_per_byte(format);
                Self::Packed {
                    format,
                    data: vec![0u8; (width + per_byte - 1) / per_byte * height],
                    width,
                    height,
                }
            }
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Rgba(img) => img.width(),
            Self::Rgb(img) => img.width(),
            Self::Alpha8(img) => img.width(),
            Self::Packed { width, .. } => *width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Rgba(img) => img.height(),
            Self::Rgb(img) => img.height(),
            Self::Alpha8(img) => img.height(),
            Self::Packed { height, .. } => *height,
        }
    }

    pub fn format(&self) -> PixelFormat {
        match self {
            Self::Rgba(_) => PixelFormat::Rgba,
            Self::Rgb(_) => PixelFormat::Rgb,
            Self::Alpha8(_) => PixelFormat::Alpha8,
            Self::Packed { format, .. } => *format,
        }
    }

    /// Reads the pixel at `(x, y)`, or `None` outside the surface.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width() || y >= self.height() {
            return None;
        }

        Some(match self {
            Self::Rgba(img) => Pixel::Rgba(img.buf()[y * img.stride() + x]),
            Self::Rgb(img) => Pixel::Rgb(img.buf()[y * img.stride() + x]),
            Self::Alpha8(img) => Pixel::Alpha8(img.buf()[y * img.stride() + x]),
            Self::Packed {
                format,
                data,
                width,
                ..
            } => {
                let (byte, shift, mask) = packed_slot(*format, *width, x, y);
                let value = (data[byte] >> shift) & mask;

                match format {
                    PixelFormat::Alpha4 => Pixel::Alpha4(value),
                    PixelFormat::Alpha2 => Pixel::Alpha2(value),
                    _ => Pixel::Alpha1(value),
                }
            }
        })
    }

    /// Stores a pixel at `(x, y)`, converting it to the surface format when
    /// the variants differ. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> Result<(), ErrorKind> {
        if x >= self.width() || y >= self.height() {
            return Ok(());
        }

        let pixel = pixel.convert(self.format());

        match (self, pixel) {
            (Self::Rgba(img), Pixel::Rgba(p)) => {
                let stride = img.stride();
                img.buf_mut()[y * stride + x] = p;
            }
            (Self::Rgb(img), Pixel::Rgb(p)) => {
                let stride = img.stride();
                img.buf_mut()[y * stride + x] = p;
            }
            (Self::Alpha8(img), Pixel::Alpha8(a)) => {
                let stride = img.stride();
                img.buf_mut()[y * stride + x] = a;
            }
            (
                Self::Packed {
                    format,
                    data,
                    width,
                    ..
                },
                Pixel::Alpha4(a) | Pixel::Alpha2(a) | Pixel::Alpha1(a),
            ) => {
                let (byte, shift, mask) = packed_slot(*format, *width, x, y);
                data[byte] = (data[byte] & !(mask << shift)) | ((a & mask) << shift);
            }
            _ => unreachable!("pixel converted to surface format above"),
        }

        Ok(())
    }

    /// Fills the whole surface with one pixel value.
    pub fn clear(&mut self, pixel: Pixel) -> Result<(), ErrorKind> {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.put_pixel(x, y, pixel)?;
            }
        }

        Ok(())
    }
}

fn pixels_per_byte(format: PixelFormat) -> usize {
    match format {
        PixelFormat::Alpha4 => 2,
        PixelFormat::Alpha2 => 4,
        PixelFormat::Alpha1 => 8,
        _ => 1,
    }
}

/// Byte index, bit shift and value mask for a packed sub-byte pixel.
fn packed_slot(format: PixelFormat, width: usize, x: usize, y: usize) -> (usize, u8, u8) {
    let per_byte = pixels_per_byte(format);
    let bits = 8 / per_byte;
    let row_bytes = (width + per_byte - 1) / per_byte;
    let byte = y * row_bytes + x / per_byte;
    let slot = x % per_byte;
    let shift = (8 - bits * (slot + 1)) as u8;
    let mask = ((1u16 << bits) - 1) as u8;

    (byte, shift, mask)
}
