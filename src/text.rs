use std::path::Path as FilePath;

use fnv::FnvHashMap;
use slotmap::new_key_type;

use crate::geometry::{Point, Transform};
use crate::path::{Path, Verb};
use crate::ErrorKind;

new_key_type! {
    /// Handle to a font added to a [`Context`](crate::Context).
    pub struct FontId;
}

// A glyph outline in font units (y up), plus its horizontal advance.
#[derive(Clone, Debug, Default)]
struct Glyph {
    verbs: Vec<Verb>,
    advance: f64,
}

/// A TrueType font whose glyph outlines feed the fill pipeline.
///
/// The font owns its byte buffer; outlines are extracted on first use per
/// glyph and cached in font units.
pub struct Font {
    data: Vec<u8>,
    units_per_em: f64,
    glyphs: FnvHashMap<u16, Glyph>,
}

impl Font {
    /// Parses a font from an owned byte buffer.
    pub fn from_vec(data: Vec<u8>) -> Result<Self, ErrorKind> {
        let face = ttf_parser::Face::parse(&data, 0)?;
        let units_per_em = face.units_per_em();

        Ok(Self {
            data,
            units_per_em: if units_per_em == 0 { 1000.0 } else { units_per_em as f64 },
            glyphs: FnvHashMap::default(),
        })
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, ErrorKind> {
        Self::from_vec(data.to_vec())
    }

    pub fn from_file<P: AsRef<FilePath>>(path: P) -> Result<Self, ErrorKind> {
        Self::from_vec(std::fs::read(path)?)
    }

    pub fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    // Looks a character's outline up, extracting and caching it on first
    // use. `None` for characters the font has no glyph for.
    fn glyph(&mut self, c: char) -> Option<&Glyph> {
        let face = ttf_parser::Face::parse(&self.data, 0).ok()?;
        let glyph_id = face.glyph_index(c)?;

        let entry = self.glyphs.entry(glyph_id.0).or_insert_with(|| {
            let mut builder = GlyphPathBuilder::default();

            // Glyphs without an outline (spaces) still carry an advance.
            if face.outline_glyph(glyph_id, &mut builder).is_none() {
                builder.verbs.clear();
            }

            Glyph {
                verbs: builder.verbs,
                advance: face.glyph_hor_advance(glyph_id).unwrap_or(0) as f64,
            }
        });

        Some(entry)
    }

    fn advance(&mut self, c: char) -> Option<f64> {
        self.glyph(c).map(|glyph| glyph.advance)
    }
}

// Collects ttf-parser outline callbacks into a verb list in font units.
// Quadratic segments are elevated to cubics on the way in.
#[derive(Default)]
struct GlyphPathBuilder {
    verbs: Vec<Verb>,
    last: Point,
}

impl GlyphPathBuilder {
    fn push(&mut self, verb: Verb) {
        if let Verb::MoveTo(p) | Verb::LineTo(p) | Verb::CurveTo(_, _, p) = verb {
            self.last = p;
        }

        self.verbs.push(verb);
    }
}

impl ttf_parser::OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push(Verb::MoveTo(Point::new(x as f64, y as f64)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(Verb::LineTo(Point::new(x as f64, y as f64)));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = (self.last.x, self.last.y);
        let (cx, cy) = (x1 as f64, y1 as f64);
        let (x, y) = (x as f64, y as f64);

        self.push(Verb::CurveTo(
            Point::new(x0 + 2.0 / 3.0 * (cx - x0), y0 + 2.0 / 3.0 * (cy - y0)),
            Point::new(x + 2.0 / 3.0 * (cx - x), y + 2.0 / 3.0 * (cy - y)),
            Point::new(x, y),
        ));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.push(Verb::CurveTo(
            Point::new(x1 as f64, y1 as f64),
            Point::new(x2 as f64, y2 as f64),
            Point::new(x as f64, y as f64),
        ));
    }

    fn close(&mut self) {
        self.verbs.push(Verb::Close);
    }
}

/// Builds a path spelling `text` with its baseline origin at `(x, y)`,
/// glyphs scaled to `size` pixels per em and mapped through `transform`.
/// Characters without a glyph are skipped.
pub(crate) fn text_path(
    font: &mut Font,
    x: f64,
    y: f64,
    size: f64,
    transform: Transform,
    text: &str,
) -> Result<Path, ErrorKind> {
    let scale = size / font.units_per_em();

    let mut path = Path::new();
    path.set_transform(transform);

    let mut pen = x;

    for c in text.chars() {
        let Some(glyph) = font.glyph(c) else {
            continue;
        };

        // Font outlines are y-up; the surface is y-down.
        for verb in &glyph.verbs {
            match *verb {
                Verb::MoveTo(p) => {
                    path.move_to(pen + p.x * scale, y - p.y * scale);
                }
                Verb::LineTo(p) => {
                    path.line_to(pen + p.x * scale, y - p.y * scale);
                }
                Verb::CurveTo(p1, p2, p3) => {
                    path.curve_to(
                        pen + p1.x * scale,
                        y - p1.y * scale,
                        pen + p2.x * scale,
                        y - p2.y * scale,
                        pen + p3.x * scale,
                        y - p3.y * scale,
                    )?;
                }
                Verb::Close => {
                    path.close()?;
                }
            }
        }

        pen += glyph.advance * scale;
    }

    Ok(path)
}

/// Advance width of `text` at `size` pixels per em.
pub(crate) fn measure(font: &mut Font, size: f64, text: &str) -> f64 {
    let scale = size / font.units_per_em();

    text.chars()
        .filter_map(|c| font.advance(c))
        .sum::<f64>()
        * scale
}
