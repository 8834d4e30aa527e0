//! Antialiased 2D vector drawing with a CPU scanline rasterizer.
//!
//! Paths made of line segments and cubic beziers are filled or stroked onto
//! an owned pixel [`Surface`], with configurable fill rules, caps, joins,
//! dashing, affine transformations, solid and gradient paints, and TrueType
//! text.
//!
//! ```
//! use softvg::{Color, Context, Paint, PixelFormat, Surface};
//!
//! let mut surface = Surface::new(PixelFormat::Rgba, 100, 100);
//! let mut ctx = Context::new(&mut surface);
//!
//! ctx.set_source(Paint::color(Color::rgb(220, 40, 40)));
//! ctx.move_to(10.0, 10.0);
//! ctx.line_to(90.0, 10.0);
//! ctx.line_to(50.0, 90.0);
//! ctx.close()?;
//! ctx.fill()?;
//! # Ok::<(), softvg::ErrorKind>(())
//! ```

mod color;
pub use color::Color;

mod error;
pub use error::ErrorKind;

pub mod geometry;
pub use geometry::{Point, Transform};

mod paint;
pub use paint::{LinearGradient, Paint};

mod path;
pub use path::{Path, Verb};
use path::FlattenedPath;

mod pixel;
pub use pixel::{Operator, Pixel, PixelFormat};

mod surface;
pub use surface::Surface;

mod fill;
mod stroke;

#[cfg(feature = "text")]
mod text;
#[cfg(feature = "text")]
pub use text::{Font, FontId};
#[cfg(feature = "text")]
use slotmap::SlotMap;

#[cfg(feature = "png")]
mod png;
#[cfg(feature = "png")]
pub use png::write_png;

use fill::FillParams;
use stroke::StrokeParams;

// Merge distance for flattened points, in device pixels.
const DIST_TOL: f64 = 1e-6;

const MIN_TOLERANCE: f64 = 0.001;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        Self::Butt
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        Self::Miter
    }
}

/// Decides which winding counts make a crossing span interior.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl Default for FillRule {
    fn default() -> Self {
        Self::NonZero
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AntiAlias {
    /// One sample at the pixel center.
    None,
    /// 4×4 supersampling; coverage attenuates the source alpha.
    Default,
}

impl Default for AntiAlias {
    fn default() -> Self {
        Self::Default
    }
}

/// The drawing context: owns a path under construction, the source paint and
/// the current option set, and borrows the surface it paints.
///
/// Options are snapshotted when `fill`/`stroke` is called; changing them
/// afterwards does not affect work already done.
pub struct Context<'a> {
    surface: &'a mut Surface,
    path: Path,
    paint: Paint,
    transform: Transform,
    line_width: f64,
    miter_limit: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    fill_rule: FillRule,
    anti_alias: AntiAlias,
    tolerance: f64,
    dashes: Vec<f64>,
    dash_offset: f64,
    operator: Operator,
    font_size: f64,
    #[cfg(feature = "text")]
    fonts: SlotMap<FontId, Font>,
    #[cfg(feature = "text")]
    font: Option<FontId>,
}

impl<'a> Context<'a> {
    pub fn new(surface: &'a mut Surface) -> Self {
        Self {
            surface,
            path: Path::new(),
            paint: Paint::default(),
            transform: Transform::identity(),
            line_width: 2.0,
            miter_limit: 10.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            fill_rule: FillRule::default(),
            anti_alias: AntiAlias::default(),
            tolerance: 0.1,
            dashes: Vec::new(),
            dash_offset: 0.0,
            operator: Operator::default(),
            font_size: 16.0,
            #[cfg(feature = "text")]
            fonts: SlotMap::with_key(),
            #[cfg(feature = "text")]
            font: None,
        }
    }

    // Render styles

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Sets the stroke width for shapes stroked with this context.
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    /// Sets the limit at which a sharp corner is drawn beveled.
    ///
    /// If the miter at a corner exceeds this limit, the join falls back to
    /// [`LineJoin::Bevel`].
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.miter_limit = limit;
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    /// Sets how the ends of open stroked lines are drawn.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Sets how sharp path corners are drawn when stroking.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.fill_rule = rule;
    }

    pub fn anti_alias(&self) -> AntiAlias {
        self.anti_alias
    }

    pub fn set_anti_alias(&mut self, mode: AntiAlias) {
        self.anti_alias = mode;
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Sets the maximum deviation allowed when curves are flattened, in
    /// device pixels. Clamped below to 0.001.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance.max(MIN_TOLERANCE);
    }

    pub fn dashes(&self) -> &[f64] {
        &self.dashes
    }

    /// Sets the on/off dash pattern used when stroking. An empty pattern
    /// draws solid lines; a pattern with negative entries, or without a
    /// positive one, disables dashing as well.
    pub fn set_dashes(&mut self, dashes: &[f64]) {
        self.dashes = dashes.to_vec();
    }

    pub fn dash_offset(&self) -> f64 {
        self.dash_offset
    }

    /// Phase into the dash pattern at the start of each subpath. Positive
    /// offsets pull the pattern forward, negative ones push it back.
    pub fn set_dash_offset(&mut self, offset: f64) {
        self.dash_offset = offset;
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Sets the text size in pixels per em.
    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    // Transform

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Replaces the current transformation. New path segments are mapped
    /// through it as they are added; recorded segments keep their positions.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.path.set_transform(transform);
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.set_transform(self.transform.translate(tx, ty));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.set_transform(self.transform.scale(sx, sy));
    }

    /// Appends a rotation by `a` radians to the current transformation.
    pub fn rotate(&mut self, a: f64) {
        self.set_transform(self.transform.rotate(a));
    }

    // Source

    pub fn source(&self) -> &Paint {
        &self.paint
    }

    /// Makes `paint` the current source.
    ///
    /// Gradients capture the current transformation at this moment; when it
    /// is not invertible the change is dropped and the previous source kept.
    pub fn set_source(&mut self, mut paint: Paint) {
        match paint.freeze_transform(&self.transform) {
            Ok(()) => self.paint = paint,
            Err(_) => {
                log::warn!("set_source: non-invertible transform, keeping previous paint");
            }
        }
    }

    // Path construction

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Clears the path under construction.
    pub fn begin_path(&mut self) {
        self.path.reset();
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(x, y);
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> Result<(), ErrorKind> {
        self.path.curve_to(x1, y1, x2, y2, x3, y3)?;
        Ok(())
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> Result<(), ErrorKind> {
        self.path.quad_to(cx, cy, x, y)?;
        Ok(())
    }

    pub fn rel_move_to(&mut self, dx: f64, dy: f64) -> Result<(), ErrorKind> {
        self.path.rel_move_to(dx, dy)?;
        Ok(())
    }

    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> Result<(), ErrorKind> {
        self.path.rel_line_to(dx, dy)?;
        Ok(())
    }

    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx3: f64,
        dy3: f64,
    ) -> Result<(), ErrorKind> {
        self.path.rel_curve_to(dx1, dy1, dx2, dy2, dx3, dy3)?;
        Ok(())
    }

    pub fn arc(&mut self, xc: f64, yc: f64, r: f64, a0: f64, a1: f64) {
        self.path.arc(xc, yc, r, a0, a1);
    }

    pub fn arc_negative(&mut self, xc: f64, yc: f64, r: f64, a0: f64, a1: f64) {
        self.path.arc_negative(xc, yc, r, a0, a1);
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), ErrorKind> {
        self.path.rect(x, y, w, h)?;
        Ok(())
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64) -> Result<(), ErrorKind> {
        self.path.circle(cx, cy, r)?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), ErrorKind> {
        self.path.close()?;
        Ok(())
    }

    // Drawing

    /// Fills the context's own path with the current source.
    pub fn fill(&mut self) -> Result<(), ErrorKind> {
        let params = self.fill_params(self.fill_rule);
        let tolerance = self.tolerance;
        let flat = Self::flatten_for_fill(&self.path, tolerance)?;

        match flat {
            Some(flat) => fill::fill_path(self.surface, &flat, &self.paint, &params),
            None => Ok(()),
        }
    }

    /// Fills an externally built path with the current source.
    pub fn fill_path(&mut self, path: &Path) -> Result<(), ErrorKind> {
        let params = self.fill_params(self.fill_rule);
        let flat = Self::flatten_for_fill(path, self.tolerance)?;

        match flat {
            Some(flat) => fill::fill_path(self.surface, &flat, &self.paint, &params),
            None => Ok(()),
        }
    }

    /// Strokes the context's own path with the current source.
    pub fn stroke(&mut self) -> Result<(), ErrorKind> {
        let stroke_params = self.stroke_params();
        let fill_params = self.fill_params(FillRule::NonZero);

        let flat = FlattenedPath::new(self.path.verbs(), self.tolerance, DIST_TOL);
        let outline = stroke::expand_stroke(&flat, &stroke_params);

        fill::fill_path(self.surface, &outline, &self.paint, &fill_params)
    }

    /// Strokes an externally built path with the current source.
    pub fn stroke_path(&mut self, path: &Path) -> Result<(), ErrorKind> {
        let stroke_params = self.stroke_params();
        let fill_params = self.fill_params(FillRule::NonZero);

        let flat = FlattenedPath::new(path.verbs(), self.tolerance, DIST_TOL);
        let outline = stroke::expand_stroke(&flat, &stroke_params);

        fill::fill_path(self.surface, &outline, &self.paint, &fill_params)
    }

    // Text

    /// Loads a font from disk and makes it current.
    #[cfg(feature = "text")]
    pub fn add_font<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<FontId, ErrorKind> {
        self.install_font(Font::from_file(path)?)
    }

    /// Adds a font from a byte slice and makes it current.
    #[cfg(feature = "text")]
    pub fn add_font_mem(&mut self, data: &[u8]) -> Result<FontId, ErrorKind> {
        self.install_font(Font::from_slice(data)?)
    }

    #[cfg(feature = "text")]
    fn install_font(&mut self, font: Font) -> Result<FontId, ErrorKind> {
        let id = self.fonts.insert(font);
        self.font = Some(id);
        Ok(id)
    }

    /// Selects a previously added font.
    #[cfg(feature = "text")]
    pub fn set_font(&mut self, id: FontId) {
        if self.fonts.contains_key(id) {
            self.font = Some(id);
        }
    }

    /// Fills `text` with its baseline starting at `(x, y)`.
    #[cfg(feature = "text")]
    pub fn fill_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), ErrorKind> {
        let path = self.build_text_path(x, y, text)?;
        let params = self.fill_params(self.fill_rule);
        let flat = Self::flatten_for_fill(&path, self.tolerance)?;

        match flat {
            Some(flat) => fill::fill_path(self.surface, &flat, &self.paint, &params),
            None => Ok(()),
        }
    }

    /// Strokes the outlines of `text` with its baseline starting at `(x, y)`.
    #[cfg(feature = "text")]
    pub fn stroke_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), ErrorKind> {
        let path = self.build_text_path(x, y, text)?;
        self.stroke_path(&path)
    }

    /// Advance width of `text` at the current font and size.
    #[cfg(feature = "text")]
    pub fn measure_text(&mut self, text: &str) -> Result<f64, ErrorKind> {
        let font_size = self.font_size;
        let font = self.current_font_mut()?;

        Ok(text::measure(font, font_size, text))
    }

    #[cfg(feature = "text")]
    fn build_text_path(&mut self, x: f64, y: f64, text: &str) -> Result<Path, ErrorKind> {
        let font_size = self.font_size;
        let transform = self.transform;
        let font = self.current_font_mut()?;

        text::text_path(font, x, y, font_size, transform, text)
    }

    #[cfg(feature = "text")]
    fn current_font_mut(&mut self) -> Result<&mut Font, ErrorKind> {
        self.font
            .and_then(|id| self.fonts.get_mut(id))
            .ok_or(ErrorKind::NoFontSet)
    }

    // Option snapshots taken at the top of each drawing call; the pipeline
    // below only ever sees these.

    fn fill_params(&self, rule: FillRule) -> FillParams {
        FillParams {
            fill_rule: rule,
            anti_alias: self.anti_alias,
            operator: self.operator,
        }
    }

    fn stroke_params(&self) -> StrokeParams {
        StrokeParams {
            width: self.line_width,
            cap: self.line_cap,
            join: self.line_join,
            miter_limit: self.miter_limit,
            dashes: self.dashes.clone(),
            dash_offset: self.dash_offset,
            tolerance: self.tolerance,
        }
    }

    // An empty node stream fills nothing; a non-empty one must end closed.
    fn flatten_for_fill(path: &Path, tolerance: f64) -> Result<Option<FlattenedPath>, ErrorKind> {
        if path.is_empty() {
            return Ok(None);
        }

        if !path.is_closed() {
            return Err(ErrorKind::PathNotClosed);
        }

        Ok(Some(FlattenedPath::new(path.verbs(), tolerance, DIST_TOL)))
    }
}
