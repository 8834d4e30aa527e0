use crate::paint::Paint;
use crate::path::FlattenedPath;
use crate::pixel::{Operator, Pixel};
use crate::surface::Surface;
use crate::{AntiAlias, ErrorKind, FillRule};

/// Option snapshot handed to the rasterizer.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FillParams {
    pub fill_rule: FillRule,
    pub anti_alias: AntiAlias,
    pub operator: Operator,
}

// Subsample grid of the default anti-aliasing mode (4×4 per pixel). Coverage
// is counted in subsamples, so a fully covered pixel holds SUBSAMPLES².
const SUB: usize = 4;
const FULL_COVERAGE: u32 = (SUB * SUB) as u32;

// A non-horizontal polygon edge, keyed by its upper endpoint. `winding` is
// +1 for edges running down the surface, -1 for edges running up.
#[derive(Copy, Clone, Debug)]
struct Edge {
    y0: f64,
    y1: f64,
    x0: f64,
    dxdy: f64,
    winding: i32,
}

impl Edge {
    fn new(top: (f64, f64), bottom: (f64, f64), winding: i32) -> Self {
        Self {
            y0: top.1,
            y1: bottom.1,
            x0: top.0,
            dxdy: (bottom.0 - top.0) / (bottom.1 - top.1),
            winding,
        }
    }

    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * self.dxdy
    }
}

/// Scan-converts flattened contours onto the surface.
///
/// Every contour is treated as geometrically closed (the segment from last
/// point back to first is implied). Without anti-aliasing, scanlines are
/// walked at integer y from the top of the bounding box to one short of its
/// bottom, edges active top-inclusive/bottom-exclusive, and a pixel belongs
/// to a span when its full unit footprint lies inside it. The default mode
/// supersamples 4×4 at subpixel centers instead.
pub(crate) fn fill_path(
    surface: &mut Surface,
    path: &FlattenedPath,
    paint: &Paint,
    params: &FillParams,
) -> Result<(), ErrorKind> {
    let edges = collect_edges(path);

    if edges.is_empty() {
        return Ok(());
    }

    let width = surface.width();
    let height = surface.height();

    let y_start = (path.bounds.miny.floor().max(0.0)) as usize;
    let y_end = (path.bounds.maxy.ceil().min(height as f64)).max(0.0) as usize;

    let (sub_rows, sub_cols) = match params.anti_alias {
        AntiAlias::None => (1, 1),
        AntiAlias::Default => (SUB, SUB),
    };

    let full = (sub_rows * sub_cols) as u32;
    let mut coverage = vec![0u32; width];
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for y in y_start..y_end {
        coverage.fill(0);
        let mut row_touched = false;

        for j in 0..sub_rows {
            let ys = match params.anti_alias {
                AntiAlias::None => y as f64,
                AntiAlias::Default => y as f64 + (j as f64 + 0.5) / sub_rows as f64,
            };

            crossings.clear();

            for edge in &edges {
                if edge.y0 <= ys && ys < edge.y1 {
                    crossings.push((edge.x_at(ys), edge.winding));
                }
            }

            if crossings.is_empty() {
                continue;
            }

            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut acc = 0i32;
            let mut parity = false;
            let mut span_start = 0.0f64;
            let mut inside = false;

            for &(x, winding) in &crossings {
                acc += winding;
                parity = !parity;

                let now_inside = match params.fill_rule {
                    FillRule::NonZero => acc != 0,
                    FillRule::EvenOdd => parity,
                };

                if !inside && now_inside {
                    span_start = x;
                } else if inside && !now_inside {
                    accumulate_span(&mut coverage, span_start, x, sub_cols, width);
                    row_touched = true;
                }

                inside = now_inside;
            }
        }

        if !row_touched {
            continue;
        }

        for (x, &cov) in coverage.iter().enumerate() {
            if cov == 0 {
                continue;
            }

            // Scale partial coverage up so AA-off rows use the same range.
            let cov = cov * (FULL_COVERAGE / full);
            let factor = cov as f32 / FULL_COVERAGE as f32;

            let mut src = paint.sample(x as f64 + 0.5, y as f64 + 0.5);
            src.a *= factor;

            let dst = surface
                .get_pixel(x, y)
                .unwrap_or_else(|| Pixel::transparent(surface.format()))
                .to_color();

            let out = params.operator.compose(src, dst);
            surface.put_pixel(x, y, Pixel::from_color(out, surface.format()))?;
        }
    }

    Ok(())
}

fn collect_edges(path: &FlattenedPath) -> Vec<Edge> {
    let mut edges = Vec::new();

    for contour in &path.contours {
        if contour.is_degenerate() {
            continue;
        }

        let points = &contour.points;
        let n = points.len();

        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];

            // Horizontal edges contribute no winding.
            if a.y == b.y {
                continue;
            }

            if a.y < b.y {
                edges.push(Edge::new((a.x, a.y), (b.x, b.y), 1));
            } else {
                edges.push(Edge::new((b.x, b.y), (a.x, a.y), -1));
            }
        }
    }

    edges
}

// Adds one subscanline span to the row's coverage counters. A pixel's
// subsample columns sit at x + (k+0.5)/sub_cols; the ones inside [xa, xb)
// count.
fn accumulate_span(coverage: &mut [u32], xa: f64, xb: f64, sub_cols: usize, width: usize) {
    if xb <= 0.0 || xa >= width as f64 {
        return;
    }

    if sub_cols == 1 {
        // A pixel counts only when [x-0.5, x+0.5] sits inside the span.
        let first = (xa + 0.5).ceil().max(0.0) as usize;
        let last = ((xb - 0.5).ceil().min(width as f64)).max(0.0) as usize;

        if first >= last {
            return;
        }

        for cov in &mut coverage[first..last] {
            *cov += 1;
        }

        return;
    }

    let first = xa.floor().max(0.0) as usize;
    let last = (xb.ceil().min(width as f64)).max(0.0) as usize;
    let step = 1.0 / sub_cols as f64;

    for px in first.min(width)..last {
        let base = px as f64;

        // Fully covered interior pixels skip the per-subsample test.
        if base + step * 0.5 >= xa && base + 1.0 - step * 0.5 < xb {
            coverage[px] += sub_cols as u32;
            continue;
        }

        let mut count = 0u32;

        for k in 0..sub_cols {
            let sx = base + (k as f64 + 0.5) * step;

            if sx >= xa && sx < xb {
                count += 1;
            }
        }

        coverage[px] += count;
    }
}
