use rgb::{RGB8, RGBA8};

use crate::Color;

/// Pixel formats a [`Surface`](crate::Surface) can store.
///
/// The alpha-only formats hold coverage masks; `Alpha4`, `Alpha2` and
/// `Alpha1` are packed several pixels to the byte in the surface buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Rgba,
    Rgb,
    Alpha8,
    Alpha4,
    Alpha2,
    Alpha1,
}

/// A single pixel value, tagged with its format.
///
/// Sub-byte formats carry their quantized value in the low bits of the `u8`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pixel {
    Rgba(RGBA8),
    Rgb(RGB8),
    Alpha8(u8),
    Alpha4(u8),
    Alpha2(u8),
    Alpha1(u8),
}

impl Pixel {
    pub fn format(&self) -> PixelFormat {
        match self {
            Self::Rgba(_) => PixelFormat::Rgba,
            Self::Rgb(_) => PixelFormat::Rgb,
            Self::Alpha8(_) => PixelFormat::Alpha8,
            Self::Alpha4(_) => PixelFormat::Alpha4,
            Self::Alpha2(_) => PixelFormat::Alpha2,
            Self::Alpha1(_) => PixelFormat::Alpha1,
        }
    }

    /// A fully transparent pixel in the given format.
    pub fn transparent(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgba => Self::Rgba(RGBA8::new(0, 0, 0, 0)),
            PixelFormat::Rgb => Self::Rgb(RGB8::new(0, 0, 0)),
            PixelFormat::Alpha8 => Self::Alpha8(0),
            PixelFormat::Alpha4 => Self::Alpha4(0),
            PixelFormat::Alpha2 => Self::Alpha2(0),
            PixelFormat::Alpha1 => Self::Alpha1(0),
        }
    }

    pub fn from_color(color: Color, format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgba => Self::Rgba(RGBA8::new(
                unit_to_u8(color.r),
                unit_to_u8(color.g),
                unit_to_u8(color.b),
                unit_to_u8(color.a),
            )),
            PixelFormat::Rgb => Self::Rgb(RGB8::new(
                unit_to_u8(color.r),
                unit_to_u8(color.g),
                unit_to_u8(color.b),
            )),
            PixelFormat::Alpha8 => Self::Alpha8(unit_to_u8(color.a)),
            PixelFormat::Alpha4 => Self::Alpha4(quantize(color.a, 15)),
            PixelFormat::Alpha2 => Self::Alpha2(quantize(color.a, 3)),
            PixelFormat::Alpha1 => Self::Alpha1(quantize(color.a, 1)),
        }
    }

    pub fn to_color(self) -> Color {
        match self {
            Self::Rgba(p) => Color::rgba(p.r, p.g, p.b, p.a),
            Self::Rgb(p) => Color::rgb(p.r, p.g, p.b),
            Self::Alpha8(a) => Color::rgbaf(0.0, 0.0, 0.0, a as f32 / 255.0),
            Self::Alpha4(a) => Color::rgbaf(0.0, 0.0, 0.0, a as f32 / 15.0),
            Self::Alpha2(a) => Color::rgbaf(0.0, 0.0, 0.0, a as f32 / 3.0),
            Self::Alpha1(a) => Color::rgbaf(0.0, 0.0, 0.0, a as f32),
        }
    }

    /// Requantizes the pixel into another format. Lossy between color and
    /// alpha-only formats.
    pub fn convert(self, format: PixelFormat) -> Self {
        if self.format() == format {
            self
        } else {
            Self::from_color(self.to_color(), format)
        }
    }
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

fn quantize(v: f32, max: u8) -> u8 {
    (v.clamp(0.0, 1.0) * max as f32 + 0.5) as u8
}

/// Compositing operators applied when the filler touches a pixel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operator {
    /// Source placed over the destination, weighted by source alpha.
    SrcOver,
    /// Source replaces the destination.
    Src,
}

impl Default for Operator {
    fn default() -> Self {
        Self::SrcOver
    }
}

impl Operator {
    /// Combines a (coverage-attenuated) source color with the destination.
    /// Straight-alpha math.
    pub(crate) fn compose(self, src: Color, dst: Color) -> Color {
        match self {
            Self::Src => src,
            Self::SrcOver => {
                let sa = src.a;
                let da = dst.a;
                let oa = sa + da * (1.0 - sa);

                if oa <= 0.0 {
                    return Color::rgbaf(0.0, 0.0, 0.0, 0.0);
                }

                let blend = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / oa;

                Color::rgbaf(blend(src.r, dst.r), blend(src.g, dst.g), blend(src.b, dst.b), oa)
            }
        }
    }
}
