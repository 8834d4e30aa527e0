use crate::geometry::{pt_equals, Bounds, Point};
use crate::path::Verb;

/// One polyline run produced by flattening: the points of a subpath with a
/// flag telling whether the subpath was closed.
#[derive(Clone, Debug, Default)]
pub(crate) struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Contour {
    /// Contours shorter than a segment carry no geometry; the fill and
    /// stroke stages skip them (an empty subpath closed right away is legal).
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }
}

/// A path reduced to straight-segment contours in device space, with the
/// bounding box of its points.
///
/// Cubic segments are subdivided until the deviation from their chord is
/// within the tessellation tolerance; points closer than `dist_tol` are
/// merged.
#[derive(Clone, Debug, Default)]
pub(crate) struct FlattenedPath {
    pub contours: Vec<Contour>,
    pub bounds: Bounds,
}

impl FlattenedPath {
    pub fn new(verbs: &[Verb], tess_tol: f64, dist_tol: f64) -> Self {
        let mut flat = Self::default();

        for verb in verbs {
            match verb {
                Verb::MoveTo(p) => {
                    flat.finish_contour(dist_tol);
                    flat.contours.push(Contour::default());
                    flat.add_point(*p, dist_tol);
                }
                Verb::LineTo(p) => {
                    flat.add_point(*p, dist_tol);
                }
                Verb::CurveTo(p1, p2, p3) => {
                    if let Some(last) = flat.last_point() {
                        flat.tesselate_bezier(
                            last.x, last.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y, 0, tess_tol,
                            dist_tol,
                        );
                    }
                }
                Verb::Close => {
                    if let Some(contour) = flat.contours.last_mut() {
                        contour.closed = true;
                    }
                }
            }
        }

        flat.finish_contour(dist_tol);
        flat
    }

    pub fn from_contours(contours: Vec<Contour>) -> Self {
        let mut bounds = Bounds::default();

        for contour in &contours {
            for p in &contour.points {
                bounds.cover(p.x, p.y);
            }
        }

        Self { contours, bounds }
    }

    // Drops the redundant closing point of a closed contour so every point
    // is a distinct vertex.
    fn finish_contour(&mut self, dist_tol: f64) {
        if let Some(contour) = self.contours.last_mut() {
            if contour.closed && contour.points.len() > 2 {
                let first = contour.points[0];
                let last = *contour.points.last().unwrap();

                if pt_equals(first.x, first.y, last.x, last.y, dist_tol) {
                    contour.points.pop();
                }
            }
        }
    }

    fn last_point(&self) -> Option<Point> {
        self.contours.last().and_then(|c| c.points.last()).copied()
    }

    fn add_point(&mut self, p: Point, dist_tol: f64) {
        if self.contours.is_empty() {
            self.contours.push(Contour::default());
        }

        let points = &mut self.contours.last_mut().unwrap().points;

        if let Some(last) = points.last() {
            if pt_equals(last.x, last.y, p.x, p.y, dist_tol) {
                return;
            }
        }

        points.push(p);
        self.bounds.cover(p.x, p.y);
    }

    #[allow(clippy::too_many_arguments)]
    fn tesselate_bezier(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        x4: f64,
        y4: f64,
        level: usize,
        tess_tol: f64,
        dist_tol: f64,
    ) {
        if level > 10 {
            return;
        }

        let x12 = (x1 + x2) * 0.5;
        let y12 = (y1 + y2) * 0.5;
        let x23 = (x2 + x3) * 0.5;
        let y23 = (y2 + y3) * 0.5;
        let x34 = (x3 + x4) * 0.5;
        let y34 = (y3 + y4) * 0.5;
        let x123 = (x12 + x23) * 0.5;
        let y123 = (y12 + y23) * 0.5;

        let dx = x4 - x1;
        let dy = y4 - y1;
        let d2 = ((x2 - x4) * dy - (y2 - y4) * dx).abs();
        let d3 = ((x3 - x4) * dy - (y3 - y4) * dx).abs();

        if (d2 + d3) * (d2 + d3) < tess_tol * (dx * dx + dy * dy) {
            self.add_point(Point::new(x4, y4), dist_tol);
            return;
        }

        let x234 = (x23 + x34) * 0.5;
        let y234 = (y23 + y34) * 0.5;
        let x1234 = (x123 + x234) * 0.5;
        let y1234 = (y123 + y234) * 0.5;

        self.tesselate_bezier(
            x1, y1, x12, y12, x123, y123, x1234, y1234, level + 1, tess_tol, dist_tol,
        );
        self.tesselate_bezier(
            x1234, y1234, x234, y234, x34, y34, x4, y4, level + 1, tess_tol, dist_tol,
        );
    }
}
