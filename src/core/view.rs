//! Visible data rectangle plus the pan, zoom and autoscale operations on it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::trace_collection::TraceCollection;
use crate::core::types::{AxisRange, Viewport};
use crate::error::PlotResult;

/// Bound substituted for an autoscale side that saw no finite data.
pub const AUTOSCALE_EMPTY_LIMIT: f64 = 1e16;

/// Minimum span an autoscaled axis must reach to be accepted.
pub const AUTOSCALE_MIN_SPAN: f64 = 1e-16;

/// Minimum drag extent, in data units, for a rectangle zoom to apply.
pub const MIN_DRAG_ZOOM_EXTENT: f64 = 1e-18;

/// Which axes a wheel zoom scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomAxes {
    pub x: bool,
    pub y: bool,
}

impl ZoomAxes {
    pub const BOTH: Self = Self { x: true, y: true };
}

/// Which bounds of one axis to autoscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscaleBounds {
    pub low: bool,
    pub high: bool,
}

impl AutoscaleBounds {
    pub const BOTH: Self = Self {
        low: true,
        high: true,
    };
    pub const NONE: Self = Self {
        low: false,
        high: false,
    };
}

/// Current viewport with change tracking.
///
/// `revision` moves on every viewport mutation and invalidates cached
/// rasters. `axes_revision` moves only on changes that reset tic label
/// history (zoom, autoscale, explicit set).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotView {
    viewport: Viewport,
    revision: u64,
    axes_revision: u64,
}

impl PlotView {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            revision: 0,
            axes_revision: 0,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn axes_revision(&self) -> u64 {
        self.axes_revision
    }

    /// Replaces the viewport. Corners are reordered and clamped to the
    /// minimum span.
    pub fn set_viewport(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, reset_axes: bool) -> PlotResult<()> {
        self.viewport = Viewport::new(x0, y0, x1, y1)?;
        self.revision += 1;
        if reset_axes {
            self.axes_revision += 1;
        }
        debug!(
            x0 = self.viewport.x0(),
            y0 = self.viewport.y0(),
            x1 = self.viewport.x1(),
            y1 = self.viewport.y1(),
            reset_axes,
            "viewport changed"
        );
        Ok(())
    }

    /// Shifts the viewport by minus the drag delta, so the grabbed data
    /// point follows the pointer.
    pub fn pan(&mut self, dx: f64, dy: f64) -> PlotResult<()> {
        let view = self.viewport;
        self.set_viewport(
            view.x0() - dx,
            view.y0() - dy,
            view.x1() - dx,
            view.y1() - dy,
            false,
        )
    }

    /// Scales the distance from `(x, y)` to every bound by `factor` on the
    /// selected axes.
    pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64, axes: ZoomAxes) -> PlotResult<()> {
        let view = self.viewport;
        let (mut x0, mut x1) = (view.x0(), view.x1());
        let (mut y0, mut y1) = (view.y0(), view.y1());
        if axes.x {
            x0 = x + (x0 - x) * factor;
            x1 = x + (x1 - x) * factor;
        }
        if axes.y {
            y0 = y + (y0 - y) * factor;
            y1 = y + (y1 - y) * factor;
        }
        self.set_viewport(x0, y0, x1, y1, true)
    }

    /// Zooms to the rectangle spanned by two data corners.
    ///
    /// Returns `false` without touching the viewport when the rectangle has
    /// negligible extent on both axes, e.g. a click without drag.
    pub fn zoom_to_rect(&mut self, ax: f64, ay: f64, bx: f64, by: f64) -> PlotResult<bool> {
        if (ax - bx).abs() <= MIN_DRAG_ZOOM_EXTENT && (ay - by).abs() <= MIN_DRAG_ZOOM_EXTENT {
            return Ok(false);
        }
        self.set_viewport(ax.min(bx), ay.min(by), ax.max(bx), ay.max(by), true)?;
        Ok(true)
    }

    /// Fits the selected X bounds to the data and adds `margin` of the span
    /// on each fitted side.
    ///
    /// Returns `false` and leaves the axis unchanged when the result would
    /// not have a meaningful positive span.
    pub fn autoscale_x(&mut self, traces: &TraceCollection<'_>, bounds: AutoscaleBounds, margin: f64) -> PlotResult<bool> {
        let mut range = AxisRange::empty();
        traces.autoscale_x(&mut range);
        let view = self.viewport;
        let Some((x0, x1)) = fit_axis(range, view.x0(), view.x1(), bounds, margin) else {
            return Ok(!(bounds.low || bounds.high));
        };
        self.set_viewport(x0, view.y0(), x1, view.y1(), true)?;
        Ok(true)
    }

    /// Y counterpart of [`PlotView::autoscale_x`].
    pub fn autoscale_y(&mut self, traces: &TraceCollection<'_>, bounds: AutoscaleBounds, margin: f64) -> PlotResult<bool> {
        let mut range = AxisRange::empty();
        traces.autoscale_y(&mut range);
        let view = self.viewport;
        let Some((y0, y1)) = fit_axis(range, view.y0(), view.y1(), bounds, margin) else {
            return Ok(!(bounds.low || bounds.high));
        };
        self.set_viewport(view.x0(), y0, view.x1(), y1, true)?;
        Ok(true)
    }

    /// Autoscales `bounds` of both axes; an axis whose one-sided fit fails is
    /// retried with both of its bounds.
    pub fn autoscale_with_fallback(
        &mut self,
        traces: &TraceCollection<'_>,
        x_bounds: AutoscaleBounds,
        y_bounds: AutoscaleBounds,
        margin: f64,
    ) -> PlotResult<()> {
        if !self.autoscale_x(traces, x_bounds, margin)? {
            warn!(?x_bounds, "x autoscale failed, fitting both bounds");
            self.autoscale_x(traces, AutoscaleBounds::BOTH, margin)?;
        }
        if !self.autoscale_y(traces, y_bounds, margin)? {
            warn!(?y_bounds, "y autoscale failed, fitting both bounds");
            self.autoscale_y(traces, AutoscaleBounds::BOTH, margin)?;
        }
        Ok(())
    }
}

impl Default for PlotView {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

fn fit_axis(range: AxisRange, lo: f64, hi: f64, bounds: AutoscaleBounds, margin: f64) -> Option<(f64, f64)> {
    if !(bounds.low || bounds.high) {
        return None;
    }

    let data_lo = if range.lo.is_finite() { range.lo } else { -AUTOSCALE_EMPTY_LIMIT };
    let data_hi = if range.hi.is_finite() { range.hi } else { AUTOSCALE_EMPTY_LIMIT };

    let mut lo = if bounds.low { data_lo } else { lo };
    let mut hi = if bounds.high { data_hi } else { hi };
    if hi - lo <= AUTOSCALE_MIN_SPAN {
        debug!(lo, hi, "autoscale span too small");
        return None;
    }

    let gap = hi - lo;
    if bounds.low {
        lo -= gap * margin;
    }
    if bounds.high {
        hi += gap * margin;
    }
    Some((lo, hi))
}
