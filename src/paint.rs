use crate::geometry::{Point, Transform};
use crate::{Color, ErrorKind};

/// Paint sources the filler samples per painted pixel.
///
/// The set of variants is closed; each carries everything its `sample`
/// needs, so no dispatch beyond the match.
#[derive(Clone, Debug)]
pub enum Paint {
    Color(Color),
    LinearGradient(LinearGradient),
}

/// Two-stop linear gradient between `start` and `end` in user space.
///
/// The current transformation is frozen into the gradient when it becomes
/// the context source, as an inverse mapping from device pixels back into
/// gradient space. That copy is by value; later context transform changes
/// do not affect it.
#[derive(Clone, Debug)]
pub struct LinearGradient {
    start: Point,
    end: Point,
    inner_color: Color,
    outer_color: Color,
    inverse_transform: Transform,
}

impl Paint {
    pub fn color(color: Color) -> Self {
        Self::Color(color)
    }

    /// Creates a linear gradient paint from `(start_x, start_y)` to
    /// `(end_x, end_y)`, blending `inner_color` into `outer_color`.
    pub fn linear_gradient(
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        Self::LinearGradient(LinearGradient {
            start: Point::new(start_x, start_y),
            end: Point::new(end_x, end_y),
            inner_color,
            outer_color,
            inverse_transform: Transform::identity(),
        })
    }

    /// Freezes the given CTM into the paint. Fails with `InvalidMatrix` for
    /// gradients under a non-invertible transform; solid colors ignore it.
    pub(crate) fn freeze_transform(&mut self, ctm: &Transform) -> Result<(), ErrorKind> {
        match self {
            Self::Color(_) => Ok(()),
            Self::LinearGradient(gradient) => {
                gradient.inverse_transform = ctm.inverse()?;
                Ok(())
            }
        }
    }

    /// Color of the paint at device position `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> Color {
        match self {
            Self::Color(color) => *color,
            Self::LinearGradient(gradient) => gradient.sample(x, y),
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::Color(Color::black())
    }
}

impl LinearGradient {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn inner_color(&self) -> Color {
        self.inner_color
    }

    pub fn outer_color(&self) -> Color {
        self.outer_color
    }

    fn sample(&self, x: f64, y: f64) -> Color {
        let p = self.inverse_transform.user_to_device(Point::new(x, y));

        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len2 = dx * dx + dy * dy;

        if len2 <= 0.0 {
            return self.inner_color;
        }

        let t = ((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2;

        self.inner_color.mix(self.outer_color, t as f32)
    }
}
