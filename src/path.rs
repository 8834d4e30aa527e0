use std::f64::consts::PI;

use crate::geometry::{cross, dist_pt_segment, normalize, pt_equals, Point, Transform};
use crate::ErrorKind;

mod flatten;
pub(crate) use flatten::{Contour, FlattenedPath};

// Length proportional to radius of a cubic bezier handle for 90deg arcs.
const KAPPA90: f64 = 0.5522847493;

/// A single path node.
///
/// `Close` is always followed by a builder-inserted `MoveTo` of the subpath's
/// initial point, so consumers never see `Close` as the terminal node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verb {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    Close,
}

/// A mutable path builder accumulating a node stream.
///
/// Every incoming coordinate is mapped through the path's [`Transform`] as it
/// enters, so the recorded nodes are in device space and the rasterization
/// stages work in a single coordinate system. Relative variants and arcs work
/// off a user-space pen position kept alongside.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    verbs: Vec<Verb>,
    transform: Transform,
    initial_point: Option<Point>,
    current_point: Option<Point>,
    // User-space pen and subpath start.
    last_x: f64,
    last_y: f64,
    start_x: f64,
    start_y: f64,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// The transformation applied to every coordinate entering the builder.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// The recorded node stream, in device coordinates.
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// First point of the current subpath, in device coordinates.
    pub fn initial_point(&self) -> Option<Point> {
        self.initial_point
    }

    /// Pen position, in device coordinates.
    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    /// True when the node stream ends in `Close` followed by the re-priming
    /// `MoveTo`.
    pub fn is_closed(&self) -> bool {
        matches!(
            self.verbs.as_slice(),
            [.., Verb::Close, Verb::MoveTo(_)]
        )
    }

    /// Clears all nodes and forgets the current and initial points. The
    /// transform is kept.
    pub fn reset(&mut self) {
        self.verbs.clear();
        self.initial_point = None;
        self.current_point = None;
        self.last_x = 0.0;
        self.last_y = 0.0;
        self.start_x = 0.0;
        self.start_y = 0.0;
    }

    /// Starts a new sub-path with the specified point as first point.
    ///
    /// A `MoveTo` identical to the node already at the tail is collapsed.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let p = self.map(x, y);

        let dedup = matches!(self.verbs.last(), Some(Verb::MoveTo(last)) if *last == p);

        if !dedup {
            self.verbs.push(Verb::MoveTo(p));
        }

        self.initial_point = Some(p);
        self.current_point = Some(p);
        self.start_x = x;
        self.start_y = y;
        self.last_x = x;
        self.last_y = y;

        self
    }

    /// Adds a line segment from the last point in the path to the specified
    /// point. Without a current point this starts a sub-path instead.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        if self.current_point.is_none() {
            return self.move_to(x, y);
        }

        let p = self.map(x, y);
        self.verbs.push(Verb::LineTo(p));
        self.current_point = Some(p);
        self.last_x = x;
        self.last_y = y;

        self
    }

    /// Adds a cubic bezier segment from the last point in the path via two
    /// control points to the specified point.
    pub fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<&mut Self, ErrorKind> {
        if self.current_point.is_none() {
            return Err(ErrorKind::NoCurrentPoint);
        }

        let p1 = self.map(x1, y1);
        let p2 = self.map(x2, y2);
        let p3 = self.map(x3, y3);

        self.verbs.push(Verb::CurveTo(p1, p2, p3));
        self.current_point = Some(p3);
        self.last_x = x3;
        self.last_y = y3;

        Ok(self)
    }

    /// Adds a quadratic bezier segment, elevated to its cubic equivalent.
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> Result<&mut Self, ErrorKind> {
        let x0 = self.last_x;
        let y0 = self.last_y;

        self.curve_to(
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        )
    }

    pub fn rel_move_to(&mut self, dx: f64, dy: f64) -> Result<&mut Self, ErrorKind> {
        if self.current_point.is_none() {
            return Err(ErrorKind::NoCurrentPoint);
        }

        Ok(self.move_to(self.last_x + dx, self.last_y + dy))
    }

    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> Result<&mut Self, ErrorKind> {
        if self.current_point.is_none() {
            return Err(ErrorKind::NoCurrentPoint);
        }

        Ok(self.line_to(self.last_x + dx, self.last_y + dy))
    }

    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx3: f64,
        dy3: f64,
    ) -> Result<&mut Self, ErrorKind> {
        let (x0, y0) = (self.last_x, self.last_y);

        self.curve_to(x0 + dx1, y0 + dy1, x0 + dx2, y0 + dy2, x0 + dx3, y0 + dy3)
    }

    /// Closes the current sub-path and re-primes the pen at its initial
    /// point, so the node stream never ends on a bare `Close`.
    ///
    /// A no-op when there is no current point.
    pub fn close(&mut self) -> Result<&mut Self, ErrorKind> {
        if self.current_point.is_none() {
            return Ok(self);
        }

        if self.initial_point.is_none() {
            return Err(ErrorKind::NoInitialPoint);
        }

        self.verbs.push(Verb::Close);

        let (sx, sy) = (self.start_x, self.start_y);
        Ok(self.move_to(sx, sy))
    }

    /// Creates a circle arc sub-path around `(xc, yc)` with radius `r`,
    /// swept counterclockwise from angle `a0` to `a1` (radians).
    ///
    /// When the path already has a current point, the arc start is reached
    /// with a line segment; otherwise it starts a new sub-path. The end angle
    /// is lifted by full turns until it is not below the start angle.
    pub fn arc(&mut self, xc: f64, yc: f64, r: f64, a0: f64, a1: f64) -> &mut Self {
        let mut a1 = a1;

        while a1 < a0 {
            a1 += PI * 2.0;
        }

        self.arc_segments(xc, yc, r, a0, (a1 - a0).min(PI * 2.0))
    }

    /// Mirror of [`arc`](Self::arc): swept clockwise, the end angle lowered
    /// by full turns until it is not above the start angle.
    pub fn arc_negative(&mut self, xc: f64, yc: f64, r: f64, a0: f64, a1: f64) -> &mut Self {
        let mut a1 = a1;

        while a1 > a0 {
            a1 -= PI * 2.0;
        }

        self.arc_segments(xc, yc, r, a0, (a1 - a0).max(-PI * 2.0))
    }

    // Emits the arc as one cubic per <=90deg sweep. `da` is signed.
    fn arc_segments(&mut self, xc: f64, yc: f64, r: f64, a0: f64, da: f64) -> &mut Self {
        let ndivs = ((da.abs() / (PI * 0.5)).ceil() as usize).max(1);
        let hda = (da / ndivs as f64) / 2.0;
        let mut kappa = (4.0 / 3.0 * (1.0 - hda.cos()) / hda.sin()).abs();

        if hda.sin() == 0.0 {
            kappa = 0.0;
        }

        if da < 0.0 {
            kappa = -kappa;
        }

        let (mut px, mut py, mut ptanx, mut ptany) = (0f64, 0f64, 0f64, 0f64);

        for i in 0..=ndivs {
            let a = a0 + da * (i as f64 / ndivs as f64);
            let dx = a.cos();
            let dy = a.sin();
            let x = xc + dx * r;
            let y = yc + dy * r;
            let tanx = -dy * r * kappa;
            let tany = dx * r * kappa;

            if i == 0 {
                if self.current_point.is_some() {
                    self.line_to(x, y);
                } else {
                    self.move_to(x, y);
                }
            } else {
                // The pen is at the previous on-arc point, so this never fails.
                let _ = self.curve_to(px + ptanx, py + ptany, x - tanx, y - tany, x, y);
            }

            px = x;
            py = y;
            ptanx = tanx;
            ptany = tany;
        }

        self
    }

    /// Adds an arc segment at the corner defined by the last path point and
    /// two specified points, like rounding off a polyline corner.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<&mut Self, ErrorKind> {
        if self.current_point.is_none() {
            return Err(ErrorKind::NoCurrentPoint);
        }

        const DEGENERATE_TOL: f64 = 1e-6;

        let x0 = self.last_x;
        let y0 = self.last_y;

        // Handle degenerate cases.
        if pt_equals(x0, y0, x1, y1, DEGENERATE_TOL)
            || pt_equals(x1, y1, x2, y2, DEGENERATE_TOL)
            || dist_pt_segment(x1, y1, x0, y0, x2, y2) < DEGENERATE_TOL * DEGENERATE_TOL
            || radius < DEGENERATE_TOL
        {
            return Ok(self.line_to(x1, y1));
        }

        let mut dx0 = x0 - x1;
        let mut dy0 = y0 - y1;
        let mut dx1 = x2 - x1;
        let mut dy1 = y2 - y1;

        normalize(&mut dx0, &mut dy0);
        normalize(&mut dx1, &mut dy1);

        let a = (dx0 * dx1 + dy0 * dy1).acos();
        let d = radius / (a / 2.0).tan();

        if d > 10000.0 {
            return Ok(self.line_to(x1, y1));
        }

        if cross(dx0, dy0, dx1, dy1) > 0.0 {
            let cx = x1 + dx0 * d + dy0 * radius;
            let cy = y1 + dy0 * d - dx0 * radius;
            let a0 = dx0.atan2(-dy0);
            let a1 = -dx1.atan2(dy1);

            Ok(self.arc(cx, cy, radius, a0, a1))
        } else {
            let cx = x1 + dx0 * d - dy0 * radius;
            let cy = y1 + dy0 * d + dx0 * radius;
            let a0 = -dx0.atan2(dy0);
            let a1 = dx1.atan2(-dy1);

            Ok(self.arc_negative(cx, cy, radius, a0, a1))
        }
    }

    /// Creates a new rectangle shaped sub-path.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<&mut Self, ErrorKind> {
        self.move_to(x, y)
            .line_to(x, y + h)
            .line_to(x + w, y + h)
            .line_to(x + w, y)
            .close()
    }

    /// Creates a new rounded rectangle shaped sub-path.
    pub fn rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<&mut Self, ErrorKind> {
        if r < 0.1 {
            return self.rect(x, y, w, h);
        }

        let rx = r.min(w.abs() * 0.5) * w.signum();
        let ry = r.min(h.abs() * 0.5) * h.signum();

        self.move_to(x, y + ry);
        self.line_to(x, y + h - ry);
        self.curve_to(
            x,
            y + h - ry * (1.0 - KAPPA90),
            x + rx * (1.0 - KAPPA90),
            y + h,
            x + rx,
            y + h,
        )?;
        self.line_to(x + w - rx, y + h);
        self.curve_to(
            x + w - rx * (1.0 - KAPPA90),
            y + h,
            x + w,
            y + h - ry * (1.0 - KAPPA90),
            x + w,
            y + h - ry,
        )?;
        self.line_to(x + w, y + ry);
        self.curve_to(
            x + w,
            y + ry * (1.0 - KAPPA90),
            x + w - rx * (1.0 - KAPPA90),
            y,
            x + w - rx,
            y,
        )?;
        self.line_to(x + rx, y);
        self.curve_to(x + rx * (1.0 - KAPPA90), y, x, y + ry * (1.0 - KAPPA90), x, y + ry)?;
        self.close()
    }

    /// Creates a new ellipse shaped sub-path.
    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> Result<&mut Self, ErrorKind> {
        self.move_to(cx - rx, cy);
        self.curve_to(cx - rx, cy + ry * KAPPA90, cx - rx * KAPPA90, cy + ry, cx, cy + ry)?;
        self.curve_to(cx + rx * KAPPA90, cy + ry, cx + rx, cy + ry * KAPPA90, cx + rx, cy)?;
        self.curve_to(cx + rx, cy - ry * KAPPA90, cx + rx * KAPPA90, cy - ry, cx, cy - ry)?;
        self.curve_to(cx - rx * KAPPA90, cy - ry, cx - rx, cy - ry * KAPPA90, cx - rx, cy)?;
        self.close()
    }

    /// Creates a new circle shaped sub-path.
    pub fn circle(&mut self, cx: f64, cy: f64, r: f64) -> Result<&mut Self, ErrorKind> {
        self.ellipse(cx, cy, r, r)
    }

    fn map(&self, x: f64, y: f64) -> Point {
        self.transform.user_to_device(Point::new(x, y))
    }
}
