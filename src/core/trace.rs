#[cfg(feature = "parallel-rasterization")]
use rayon::prelude::*;
use tracing::trace;

use crate::core::marker::Marker;
use crate::core::projector::Projector;
use crate::core::stencil::Stencil;
use crate::core::types::AxisRange;
use crate::error::{PlotError, PlotResult};
use crate::render::{LayerPrimitives, LinePrimitive};

/// Points per rasterizer task.
pub const RASTER_CHUNK_LEN: usize = 65536 * 16;

/// One source of per-point annotation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSet<'a> {
    /// Entry `i` annotates point `i`.
    Literal(&'a [String]),
    /// Entry `i` of `indices` selects the text of point `i` from `table`.
    Indexed {
        indices: &'a [u32],
        table: &'a [String],
    },
}

impl<'a> AnnotationSet<'a> {
    /// Text for `point`, if this set covers it.
    #[must_use]
    pub fn get(&self, point: usize) -> Option<&'a str> {
        match *self {
            Self::Literal(texts) => texts.get(point).map(String::as_str),
            Self::Indexed { indices, table } => {
                let index = *indices.get(point)?;
                table.get(index as usize).map(String::as_str)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointMask<'a> {
    values: &'a [u16],
    target: u16,
}

/// One plottable series: points, reference lines and annotations that share
/// a marker.
///
/// Data arrays are borrowed. The owner of the buffers must outlive every
/// trace and every worker that reads them, which the borrow checker enforces.
#[derive(Debug, Clone)]
pub struct Trace<'a> {
    marker: &'a Marker,
    x: Option<&'a [f32]>,
    y: Option<&'a [f32]>,
    mask: Option<PointMask<'a>>,
    annotations: Vec<AnnotationSet<'a>>,
    vertical_lines: Vec<f64>,
    horizontal_lines: Vec<f64>,
}

impl<'a> Trace<'a> {
    /// Empty trace; add points or lines with the `with_*` builders.
    #[must_use]
    pub fn new(marker: &'a Marker) -> Self {
        Self {
            marker,
            x: None,
            y: None,
            mask: None,
            annotations: Vec::new(),
            vertical_lines: Vec::new(),
            horizontal_lines: Vec::new(),
        }
    }

    /// Y values; without X data, point `i` sits at `x = i + 1`.
    #[must_use]
    pub fn with_y(mut self, y: &'a [f32]) -> Self {
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_x(mut self, x: &'a [f32]) -> Self {
        self.x = Some(x);
        self
    }

    /// Only points whose mask value equals `target` are drawn and located.
    #[must_use]
    pub fn with_mask(mut self, values: &'a [u16], target: u16) -> Self {
        self.mask = Some(PointMask { values, target });
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: AnnotationSet<'a>) -> Self {
        self.annotations.push(annotations);
        self
    }

    #[must_use]
    pub fn with_vertical_line(mut self, x: f64) -> Self {
        self.vertical_lines.push(x);
        self
    }

    #[must_use]
    pub fn with_horizontal_line(mut self, y: f64) -> Self {
        self.horizontal_lines.push(y);
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        let expected = self.y.map(<[f32]>::len);
        if let Some(x) = self.x {
            let Some(expected) = expected else {
                return Err(PlotError::InvalidData(
                    "x data requires y data".to_owned(),
                ));
            };
            if x.len() != expected {
                return Err(PlotError::TraceLengthMismatch {
                    field: "x",
                    expected,
                    actual: x.len(),
                });
            }
        }
        if let Some(mask) = self.mask {
            let Some(expected) = expected else {
                return Err(PlotError::InvalidData(
                    "mask requires y data".to_owned(),
                ));
            };
            if mask.values.len() != expected {
                return Err(PlotError::TraceLengthMismatch {
                    field: "mask",
                    expected,
                    actual: mask.values.len(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn marker(&self) -> &'a Marker {
        self.marker
    }

    #[must_use]
    pub fn has_points(&self) -> bool {
        self.y.is_some()
    }

    /// Number of data points, masked ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.map_or(0, <[f32]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn vertical_lines(&self) -> &[f64] {
        &self.vertical_lines
    }

    #[must_use]
    pub fn horizontal_lines(&self) -> &[f64] {
        &self.horizontal_lines
    }

    #[inline]
    fn is_selected(&self, point: usize) -> bool {
        self.mask
            .is_none_or(|mask| mask.values.get(point) == Some(&mask.target))
    }

    /// `None` when explicit X data is shorter than the Y data.
    #[inline]
    fn x_at(&self, point: usize) -> Option<f64> {
        match self.x {
            Some(x) => x.get(point).copied().map(f64::from),
            None => Some((point + 1) as f64),
        }
    }

    /// Data coordinates of `point`.
    #[must_use]
    pub fn point(&self, point: usize) -> Option<(f64, f64)> {
        let y = *self.y?.get(point)?;
        Some((self.x_at(point)?, f64::from(y)))
    }

    /// Every annotation text of `point`, in annotation-set order.
    pub fn annotations(&self, point: usize) -> impl Iterator<Item = &'a str> + '_ {
        self.annotations.iter().filter_map(move |set| set.get(point))
    }

    /// Marks this trace's reference lines and points in `stencil`.
    ///
    /// `projector` maps data onto stencil pixels. Points are split into
    /// chunks of [`RASTER_CHUNK_LEN`] that run as independent tasks; the call
    /// returns once every chunk is done.
    pub fn rasterize(&self, projector: &Projector, stencil: &Stencil) {
        for &x in &self.vertical_lines {
            stencil.hit_column(projector.proj_x(x));
        }
        for &y in &self.horizontal_lines {
            stencil.hit_row(projector.proj_y(y));
        }

        let Some(ys) = self.y else {
            return;
        };
        trace!(points = ys.len(), "rasterize trace points");

        #[cfg(feature = "parallel-rasterization")]
        {
            ys.par_chunks(RASTER_CHUNK_LEN)
                .enumerate()
                .for_each(|(chunk, ys)| {
                    self.rasterize_chunk(chunk * RASTER_CHUNK_LEN, ys, projector, stencil);
                });
        }

        #[cfg(not(feature = "parallel-rasterization"))]
        {
            for (chunk, ys) in ys.chunks(RASTER_CHUNK_LEN).enumerate() {
                self.rasterize_chunk(chunk * RASTER_CHUNK_LEN, ys, projector, stencil);
            }
        }
    }

    fn rasterize_chunk(&self, start: usize, ys: &[f32], projector: &Projector, stencil: &Stencil) {
        for (offset, &y) in ys.iter().enumerate() {
            let point = start + offset;
            if !self.is_selected(point) {
                continue;
            }
            let Some(x) = self.x_at(point) else {
                continue;
            };
            let y = f64::from(y);
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            stencil.hit(projector.proj_x(x), projector.proj_y(y));
        }
    }

    /// Emits the reference lines as plain line primitives.
    ///
    /// Used for traces without point data so they skip the stencil.
    pub fn draw_lines_directly(&self, projector: &Projector, layer: &mut LayerPrimitives) {
        let area = projector.screen_rect();
        let color = self.marker.color();
        let (left, top) = (f64::from(area.x), f64::from(area.y));
        let (right, bottom) = (f64::from(area.right()), f64::from(area.bottom()));

        for &x in &self.vertical_lines {
            let px = projector.proj_x(x);
            if px >= area.x && px < area.right() {
                let px = f64::from(px);
                layer.lines.push(LinePrimitive::new(px, top, px, bottom, color));
            }
        }
        for &y in &self.horizontal_lines {
            let py = projector.proj_y(y);
            if py >= area.y && py < area.bottom() {
                let py = f64::from(py);
                layer.lines.push(LinePrimitive::new(left, py, right, py, color));
            }
        }
    }

    /// Extends `range` by all finite X data and vertical line positions.
    pub fn autoscale_x(&self, range: &mut AxisRange) {
        if let Some(ys) = self.y {
            match self.x {
                Some(xs) => xs.iter().for_each(|&x| range.include(f64::from(x))),
                None => {
                    range.include(1.0);
                    range.include((ys.len() + 1) as f64);
                }
            }
        }
        self.vertical_lines.iter().for_each(|&x| range.include(x));
    }

    /// Extends `range` by all finite Y data and horizontal line positions.
    pub fn autoscale_y(&self, range: &mut AxisRange) {
        if let Some(ys) = self.y {
            ys.iter().for_each(|&y| range.include(f64::from(y)));
        }
        self.horizontal_lines.iter().for_each(|&y| range.include(y));
    }

    /// Finds the point nearest to pixel `(screen_x, screen_y)`.
    ///
    /// Only returns a point that beats `best_distance_sq` (squared pixel
    /// distance). Points outside the projector's data rectangle are skipped
    /// before projection. The scan stops at an exact hit.
    #[must_use]
    pub fn find_closest_point(
        &self,
        projector: &Projector,
        screen_x: i32,
        screen_y: i32,
        best_distance_sq: i64,
    ) -> Option<(usize, i64)> {
        let ys = self.y?;
        let mut best: Option<(usize, i64)> = None;
        let mut bound = best_distance_sq;
        if bound == 0 {
            return None;
        }

        for (point, &y) in ys.iter().enumerate() {
            if !self.is_selected(point) {
                continue;
            }
            let Some(x) = self.x_at(point) else {
                continue;
            };
            let y = f64::from(y);
            if !projector.contains_data(x, y) {
                continue;
            }
            let dx = i64::from(projector.proj_x(x)) - i64::from(screen_x);
            let dy = i64::from(projector.proj_y(y)) - i64::from(screen_y);
            let distance_sq = dx * dx + dy * dy;
            if distance_sq < bound {
                bound = distance_sq;
                best = Some((point, distance_sq));
                if distance_sq == 0 {
                    break;
                }
            }
        }
        best
    }
}
