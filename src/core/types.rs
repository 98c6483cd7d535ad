use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Smallest span a viewport axis may have.
///
/// Roughly the limit of `f32` resolution on a full-HD plot area.
pub const MIN_VIEW_SPAN: f64 = 5e-12;

/// Visible data rectangle.
///
/// Invariants: `x0 < x1`, `y0 < y1`, and each span is at least
/// [`MIN_VIEW_SPAN`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Viewport {
    /// Builds a normalized viewport from two arbitrary corners.
    ///
    /// Corners are reordered, and spans below [`MIN_VIEW_SPAN`] are widened
    /// symmetrically around their center.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> PlotResult<Self> {
        if !x0.is_finite() || !y0.is_finite() || !x1.is_finite() || !y1.is_finite() {
            return Err(PlotError::InvalidData(
                "viewport bounds must be finite".to_owned(),
            ));
        }

        let (x0, x1) = enforce_min_span(x0.min(x1), x0.max(x1));
        let (y0, y1) = enforce_min_span(y0.min(y1), y0.max(y1));
        Ok(Self { x0, y0, x1, y1 })
    }

    #[must_use]
    pub fn x0(self) -> f64 {
        self.x0
    }

    #[must_use]
    pub fn y0(self) -> f64 {
        self.y0
    }

    #[must_use]
    pub fn x1(self) -> f64 {
        self.x1
    }

    #[must_use]
    pub fn y1(self) -> f64 {
        self.y1
    }

    #[must_use]
    pub fn x_range(self) -> AxisRange {
        AxisRange::new(self.x0, self.x1)
    }

    #[must_use]
    pub fn y_range(self) -> AxisRange {
        AxisRange::new(self.y0, self.y1)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
        }
    }
}

fn enforce_min_span(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo >= MIN_VIEW_SPAN {
        return (lo, hi);
    }
    let center = 0.5 * (lo + hi);
    // far from zero, half of MIN_VIEW_SPAN is below one ulp of the center
    let half = (0.5 * MIN_VIEW_SPAN).max(center.abs() * f64::EPSILON);
    (center - half, center + half)
}

/// Closed interval along one data axis, used while accumulating autoscale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub lo: f64,
    pub hi: f64,
}

impl AxisRange {
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// An inverted range that any finite value extends.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lo: f64::INFINITY,
            hi: f64::NEG_INFINITY,
        }
    }

    /// Extends the range to include `value`; non-finite values are ignored.
    pub fn include(&mut self, value: f64) {
        if value.is_finite() {
            self.lo = self.lo.min(value);
            self.hi = self.hi.max(value);
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.hi - self.lo
    }
}

/// Pixel rectangle on the host surface. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    #[must_use]
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    pub fn validate(self) -> PlotResult<Self> {
        if !self.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Reference to one point of one trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointRef {
    pub trace: usize,
    pub point: usize,
}

impl PointRef {
    #[must_use]
    pub const fn new(trace: usize, point: usize) -> Self {
        Self { trace, point }
    }
}
