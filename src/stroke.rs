use std::f64::consts::PI;

use bitflags::bitflags;
use itertools::Itertools;

use crate::geometry::{cross, normalize, pt_equals, Point};
use crate::path::{Contour, FlattenedPath};
use crate::{LineCap, LineJoin};

// Point flags
bitflags! {
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    struct PointFlags: u8 {
        const LEFT = 0x01;
        const BEVEL = 0x02;
        const INNERBEVEL = 0x04;
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct StrokePoint {
    x: f64,
    y: f64,
    // Unit direction to the next point and the segment length.
    dx: f64,
    dy: f64,
    len: f64,
    // Scaled half vector between the adjacent left normals.
    dmx: f64,
    dmy: f64,
    flags: PointFlags,
}

impl StrokePoint {
    fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Option snapshot handed to the stroke transformer.
#[derive(Clone, Debug)]
pub(crate) struct StrokeParams {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
    pub dashes: Vec<f64>,
    pub dash_offset: f64,
    pub tolerance: f64,
}

// A stroked piece of a contour: either a polyline to outline, or the
// degenerate dot a zero-length "on" dash entry leaves behind.
enum Run {
    Polyline { points: Vec<Point>, closed: bool },
    Dot { center: Point, dx: f64, dy: f64 },
}

/// Converts a flattened centerline into the closed outline of its stroked
/// region. The output is always fillable with the non-zero rule.
pub(crate) fn expand_stroke(path: &FlattenedPath, params: &StrokeParams) -> FlattenedPath {
    let r = params.width * 0.5;

    if !(r > 0.0) {
        return FlattenedPath::default();
    }

    let ncap = curve_divisions(r, PI, params.tolerance);
    let mut runs = Vec::new();

    let dashed = valid_dashes(&params.dashes);

    for contour in &path.contours {
        if contour.is_degenerate() {
            continue;
        }

        if dashed {
            dash_contour(contour, &params.dashes, params.dash_offset, &mut runs);
        } else {
            runs.push(Run::Polyline {
                points: contour.points.clone(),
                closed: contour.closed,
            });
        }
    }

    let mut out = Vec::new();

    for run in &runs {
        match run {
            Run::Polyline { points, closed } => {
                outline_polyline(points, *closed, r, params, ncap, &mut out);
            }
            Run::Dot { center, dx, dy } => {
                if let Some(contour) = dot_outline(*center, *dx, *dy, r, params.cap, ncap) {
                    out.push(contour);
                }
            }
        }
    }

    FlattenedPath::from_contours(out)
}

/// A dash array is usable when it has no negative entries and at least one
/// positive one; anything else disables dashing entirely.
fn valid_dashes(dashes: &[f64]) -> bool {
    !dashes.is_empty() && dashes.iter().all(|d| *d >= 0.0) && dashes.iter().any(|d| *d > 0.0)
}

// Walks the contour's arc length against the alternating on/off pattern and
// collects the "on" stretches. Odd-length patterns repeat inverted, so they
// are walked doubled. A closed contour is walked as an open loop from its
// first vertex.
fn dash_contour(contour: &Contour, dashes: &[f64], offset: f64, runs: &mut Vec<Run>) {
    let mut pattern = dashes.to_vec();

    if pattern.len() % 2 == 1 {
        pattern.extend_from_slice(dashes);
    }

    let total: f64 = pattern.iter().sum();

    let mut points = contour.points.clone();

    if contour.closed {
        points.push(points[0]);
    }

    // Positive offsets pull the phase forward, negative ones push it back.
    let mut phase = offset % total;

    if phase < 0.0 {
        phase += total;
    }

    let mut idx = 0;

    while phase >= pattern[idx] && pattern[idx] > 0.0 || pattern[idx] == 0.0 && phase > 0.0 {
        phase -= pattern[idx];
        idx = (idx + 1) % pattern.len();
    }

    let mut on = idx % 2 == 0;
    let mut remaining = pattern[idx] - phase;
    let mut run: Vec<Point> = if on { vec![points[0]] } else { Vec::new() };

    for (a, b) in points.iter().tuple_windows() {
        let mut dx = b.x - a.x;
        let mut dy = b.y - a.y;
        let seg_len = normalize(&mut dx, &mut dy);
        let mut dist = 0.0;

        while seg_len - dist > remaining {
            dist += remaining;
            let cut = Point::new(a.x + dx * dist, a.y + dy * dist);

            if on {
                run.push(cut);
                flush_run(std::mem::take(&mut run), dx, dy, runs);
            } else {
                run = vec![cut];
            }

            idx = (idx + 1) % pattern.len();
            remaining = pattern[idx];
            on = !on;
        }

        remaining -= seg_len - dist;

        if on {
            run.push(*b);
        }
    }

    if on {
        let n = points.len();
        let mut dx = points[n - 1].x - points[n - 2].x;
        let mut dy = points[n - 1].y - points[n - 2].y;
        normalize(&mut dx, &mut dy);
        flush_run(run, dx, dy, runs);
    }
}

fn flush_run(mut points: Vec<Point>, dx: f64, dy: f64, runs: &mut Vec<Run>) {
    points.dedup_by(|a, b| pt_equals(a.x, a.y, b.x, b.y, 1e-9));

    match points.len() {
        0 => {}
        1 => runs.push(Run::Dot {
            center: points[0],
            dx,
            dy,
        }),
        _ => runs.push(Run::Polyline { points, closed: false }),
    }
}

// Per-vertex direction vectors and join classification, with the miter-limit
// and inner-bevel tests driven by the scaled half vector.
fn prepare_points(points: &[Point], closed: bool, r: f64, join: LineJoin, miter_limit: f64) -> Vec<StrokePoint> {
    let mut pts: Vec<StrokePoint> = Vec::with_capacity(points.len());

    for p in points {
        if let Some(last) = pts.last() {
            if pt_equals(last.x, last.y, p.x, p.y, 1e-9) {
                continue;
            }
        }

        pts.push(StrokePoint {
            x: p.x,
            y: p.y,
            ..Default::default()
        });
    }

    let n = pts.len();

    if n < 2 {
        return pts;
    }

    for i in 0..n {
        let j = (i + 1) % n;

        if j == 0 && !closed {
            // Open endpoint keeps the incoming direction for its cap.
            pts[i].dx = pts[i - 1].dx;
            pts[i].dy = pts[i - 1].dy;
            pts[i].len = 0.0;
            continue;
        }

        let mut dx = pts[j].x - pts[i].x;
        let mut dy = pts[j].y - pts[i].y;
        let len = normalize(&mut dx, &mut dy);

        pts[i].dx = dx;
        pts[i].dy = dy;
        pts[i].len = len;
    }

    let iw = 1.0 / r;

    for i in 0..n {
        let p0 = if i == 0 { pts[n - 1] } else { pts[i - 1] };
        let p1 = &mut pts[i];

        let dlx0 = p0.dy;
        let dly0 = -p0.dx;
        let dlx1 = p1.dy;
        let dly1 = -p1.dx;

        // Calculate extrusions
        p1.dmx = (dlx0 + dlx1) * 0.5;
        p1.dmy = (dly0 + dly1) * 0.5;
        let dmr2 = p1.dmx * p1.dmx + p1.dmy * p1.dmy;

        if dmr2 > 1e-6 {
            let scale = (1.0 / dmr2).min(600.0);

            p1.dmx *= scale;
            p1.dmy *= scale;
        }

        p1.flags = PointFlags::empty();

        // Keep track of left turns.
        if cross(p0.dx, p0.dy, p1.dx, p1.dy) > 0.0 {
            p1.flags |= PointFlags::LEFT;
        }

        // Calculate if we should use bevel or miter for the inner join.
        let limit = (p0.len.min(p1.len) * iw).max(1.01);

        if (dmr2 * limit * limit) < 1.0 {
            p1.flags |= PointFlags::INNERBEVEL;
        }

        // Check to see if the corner needs to be beveled.
        if (dmr2 * miter_limit * miter_limit) < 1.0
            || join == LineJoin::Bevel
            || join == LineJoin::Round
        {
            p1.flags |= PointFlags::BEVEL;
        }
    }

    pts
}

// Builds the closed outline(s) of one stroked polyline. An open run becomes
// a single loop (left side, end cap, right side reversed, start cap); a
// closed run becomes two opposed loops.
fn outline_polyline(
    points: &[Point],
    closed: bool,
    r: f64,
    params: &StrokeParams,
    ncap: usize,
    out: &mut Vec<Contour>,
) {
    let pts = prepare_points(points, closed, r, params.join, params.miter_limit);
    let n = pts.len();

    if n < 2 {
        return;
    }

    let join = params.join;

    if closed && n > 2 {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for i in 0..n {
            let p0 = if i == 0 { &pts[n - 1] } else { &pts[i - 1] };
            join_points(p0, &pts[i], r, join, ncap, Side::Left, &mut left);
            join_points(p0, &pts[i], r, join, ncap, Side::Right, &mut right);
        }

        right.reverse();

        out.push(Contour {
            points: left,
            closed: true,
        });
        out.push(Contour {
            points: right,
            closed: true,
        });

        return;
    }

    let first = &pts[0];
    let last = &pts[n - 1];

    let mut outline = Vec::new();

    // Left side, walked forward.
    outline.push(offset_pt(first.pos(), first.dx, first.dy, r, Side::Left));

    for i in 1..n - 1 {
        join_points(&pts[i - 1], &pts[i], r, join, ncap, Side::Left, &mut outline);
    }

    outline.push(offset_pt(last.pos(), last.dx, last.dy, r, Side::Left));

    // End cap.
    cap_points(last.pos(), last.dx, last.dy, r, params.cap, ncap, false, &mut outline);

    // Right side, walked backward.
    let mut right = Vec::new();
    right.push(offset_pt(first.pos(), first.dx, first.dy, r, Side::Right));

    for i in 1..n - 1 {
        join_points(&pts[i - 1], &pts[i], r, join, ncap, Side::Right, &mut right);
    }

    right.push(offset_pt(last.pos(), last.dx, last.dy, r, Side::Right));
    right.reverse();
    outline.extend(right);

    // Start cap.
    cap_points(first.pos(), first.dx, first.dy, r, params.cap, ncap, true, &mut outline);

    out.push(Contour {
        points: outline,
        closed: true,
    });
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Side {
    Left,
    Right,
}

fn offset_pt(p: Point, dx: f64, dy: f64, r: f64, side: Side) -> Point {
    // Left normal of the travel direction.
    let (nx, ny) = (dy, -dx);

    match side {
        Side::Left => Point::new(p.x + nx * r, p.y + ny * r),
        Side::Right => Point::new(p.x - nx * r, p.y - ny * r),
    }
}

// Outline points contributed by the join at vertex `p1`, whose incoming
// direction lives on `p0`. The turn's outer side honors the join style; the
// inner side gets the clipped inner miter (or the offset pair when the miter
// would overshoot the adjacent segments).
fn join_points(
    p0: &StrokePoint,
    p1: &StrokePoint,
    r: f64,
    join: LineJoin,
    ncap: usize,
    side: Side,
    out: &mut Vec<Point>,
) {
    let sign = if side == Side::Left { 1.0 } else { -1.0 };

    let a = offset_pt(p1.pos(), p0.dx, p0.dy, r, side);
    let b = offset_pt(p1.pos(), p1.dx, p1.dy, r, side);
    let miter = Point::new(p1.x + p1.dmx * sign * r, p1.y + p1.dmy * sign * r);

    let inner = match side {
        Side::Left => p1.flags.contains(PointFlags::LEFT),
        Side::Right => !p1.flags.contains(PointFlags::LEFT),
    };

    if inner {
        if p1.flags.contains(PointFlags::INNERBEVEL) {
            out.push(a);
            out.push(b);
        } else {
            out.push(miter);
        }
        return;
    }

    if join == LineJoin::Round && p1.flags.contains(PointFlags::BEVEL) {
        round_fan(p1.pos(), a, b, r, ncap, out);
    } else if p1.flags.contains(PointFlags::BEVEL) {
        out.push(a);
        out.push(b);
    } else {
        out.push(miter);
    }
}

// Arc of radius `r` around `center` from `from` to `to`, flattened with the
// cap subdivision count. The sweep is the wrapped difference, which for a
// join is always the exterior angle (< half a turn).
fn round_fan(center: Point, from: Point, to: Point, r: f64, ncap: usize, out: &mut Vec<Point>) {
    let a0 = (from.y - center.y).atan2(from.x - center.x);
    let a1 = (to.y - center.y).atan2(to.x - center.x);

    let mut sweep = a1 - a0;

    if sweep > PI {
        sweep -= 2.0 * PI;
    } else if sweep < -PI {
        sweep += 2.0 * PI;
    }

    let steps = ((sweep.abs() / PI * ncap as f64).ceil() as usize).max(2);

    for i in 0..=steps {
        let a = a0 + sweep * (i as f64 / steps as f64);
        out.push(Point::new(center.x + a.cos() * r, center.y + a.sin() * r));
    }
}

// Cap points between the two stroke sides at an open endpoint. At the end of
// the outline they bridge left to right; at the start, right back to left.
fn cap_points(
    p: Point,
    dx: f64,
    dy: f64,
    r: f64,
    cap: LineCap,
    ncap: usize,
    start: bool,
    out: &mut Vec<Point>,
) {
    let dir = if start { -1.0 } else { 1.0 };

    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let (sx, sy) = (dx * r * dir, dy * r * dir);
            let left = offset_pt(p, dx, dy, r, Side::Left);
            let right = offset_pt(p, dx, dy, r, Side::Right);

            if start {
                out.push(Point::new(right.x + sx, right.y + sy));
                out.push(Point::new(left.x + sx, left.y + sy));
            } else {
                out.push(Point::new(left.x + sx, left.y + sy));
                out.push(Point::new(right.x + sx, right.y + sy));
            }
        }
        LineCap::Round => {
            let from = if start {
                offset_pt(p, dx, dy, r, Side::Right)
            } else {
                offset_pt(p, dx, dy, r, Side::Left)
            };

            // Half circle bulging past the endpoint (or behind it at the
            // start), swept towards the opposite side.
            let a0 = (from.y - p.y).atan2(from.x - p.x);
            let steps = ncap.max(2);

            for i in 1..steps {
                let a = a0 + PI * (i as f64 / steps as f64);
                out.push(Point::new(p.x + a.cos() * r, p.y + a.sin() * r));
            }
        }
    }
}

// The dot a zero-length "on" dash entry produces, shaped by the cap style.
// Butt caps make it invisible.
fn dot_outline(center: Point, dx: f64, dy: f64, r: f64, cap: LineCap, ncap: usize) -> Option<Contour> {
    match cap {
        LineCap::Butt => None,
        LineCap::Square => {
            let (nx, ny) = (dy, -dx);
            let points = vec![
                Point::new(center.x - dx * r + nx * r, center.y - dy * r + ny * r),
                Point::new(center.x + dx * r + nx * r, center.y + dy * r + ny * r),
                Point::new(center.x + dx * r - nx * r, center.y + dy * r - ny * r),
                Point::new(center.x - dx * r - nx * r, center.y - dy * r - ny * r),
            ];

            Some(Contour { points, closed: true })
        }
        LineCap::Round => {
            let steps = (ncap * 2).max(8);
            let mut points = Vec::with_capacity(steps);

            for i in 0..steps {
                let a = 2.0 * PI * (i as f64 / steps as f64);
                points.push(Point::new(center.x + a.cos() * r, center.y + a.sin() * r));
            }

            Some(Contour { points, closed: true })
        }
    }
}

fn curve_divisions(radius: f64, arc: f64, tol: f64) -> usize {
    let da = (radius / (radius + tol)).acos() * 2.0;

    ((arc / da).ceil() as usize).max(2)
}
