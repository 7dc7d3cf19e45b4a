use super::{MAX_PARALLAX_RATIO, PADDING_RATIO, SEEK_RADIUS_RATIO, STROKE_RATIO, TICK_LENGTH_RATIO};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }
}

/// Everything the renderer and the pointer resolver derive from the widget's
/// pixel bounds. Only rebuilt when the bounds actually change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub radius: f64,
    pub padding: f64,
    pub tick_length: f64,
    pub seek_radius: f64,
    pub max_parallax: f64,
    pub stroke_width: f64,
}

impl Layout {
    pub fn recompute(width: f64, height: f64, external_padding: f64) -> Self {
        let (width, height) = (sanitize(width), sanitize(height));
        let external_padding = sanitize(external_padding);

        let radius = ((width - 2.0 * external_padding).min(height - 2.0 * external_padding) / 2.0)
            .max(0.0);

        Self {
            width,
            height,
            center: Point::new(width / 2.0, height / 2.0),
            radius,
            padding: PADDING_RATIO * radius,
            tick_length: TICK_LENGTH_RATIO * radius,
            seek_radius: SEEK_RADIUS_RATIO * radius,
            max_parallax: MAX_PARALLAX_RATIO * radius,
            stroke_width: STROKE_RATIO * radius,
        }
    }

    pub fn from_size(size: Size, external_padding: f64) -> Self {
        Self::recompute(size.width, size.height, external_padding)
    }

    /// Zero-sized bounds collapse the face; callers skip every computation
    /// that divides by the radius.
    pub fn is_degenerate(&self) -> bool {
        self.radius <= 0.0 || self.seek_radius <= 0.0
    }

    pub fn default_handle(&self) -> Point {
        Point::new(self.center.x, self.center.y - self.seek_radius)
    }

    /// Upper edge of the tick ring before the text offset is applied.
    pub fn ring_top(&self) -> f64 {
        self.center.y - self.radius + self.padding
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
