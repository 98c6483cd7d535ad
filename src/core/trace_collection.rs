use smallvec::SmallVec;
use tracing::debug;

use crate::core::marker::Marker;
use crate::core::projector::Projector;
use crate::core::stencil::{Stencil, mask_to_rgba};
use crate::core::trace::Trace;
use crate::core::types::{AxisRange, PointRef, ScreenRect};
use crate::error::PlotResult;
use crate::render::{ImagePrimitive, LayerPrimitives};

/// Result of a nearest-point search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosestPoint {
    pub trace: usize,
    pub point: usize,
    /// Squared pixel distance to the cursor.
    pub distance_sq: i64,
}

impl ClosestPoint {
    #[must_use]
    pub fn point_ref(self) -> PointRef {
        PointRef::new(self.trace, self.point)
    }
}

/// Ordered traces of one plot.
#[derive(Debug, Clone, Default)]
pub struct TraceCollection<'a> {
    traces: Vec<Trace<'a>>,
}

impl<'a> TraceCollection<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends `trace`, returning its index.
    pub fn push(&mut self, trace: Trace<'a>) -> PlotResult<usize> {
        trace.validate()?;
        self.traces.push(trace);
        Ok(self.traces.len() - 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    #[must_use]
    pub fn get(&self, trace: usize) -> Option<&Trace<'a>> {
        self.traces.get(trace)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trace<'a>> {
        self.traces.iter()
    }

    /// Draws every trace into `layer`.
    ///
    /// Consecutive traces with the same marker instance share one stencil,
    /// which is dilated and composited once per group as an RGBA image at
    /// the top-left corner of the plot area. Traces without points emit
    /// their reference lines straight into the layer. Returns the number of
    /// composited marker groups.
    pub fn draw(&self, projector: &Projector, layer: &mut LayerPrimitives) -> PlotResult<usize> {
        let area = projector.screen_rect().validate()?;
        let stencil_projector = Projector::for_stencil(projector.viewport()?, area.width, area.height)?;

        let mut stencil: Option<Stencil> = None;
        let mut current: Option<&Marker> = None;
        let mut groups = 0;

        for trace in &self.traces {
            if !trace.has_points() {
                trace.draw_lines_directly(projector, layer);
                continue;
            }

            let stencil = stencil.get_or_insert_with(|| Stencil::new(area.width, area.height));
            if let Some(marker) = current {
                if !std::ptr::eq(marker, trace.marker()) {
                    composite(stencil, marker, area, layer);
                    stencil.clear();
                    groups += 1;
                }
            }
            trace.rasterize(&stencil_projector, stencil);
            current = Some(trace.marker());
        }

        if let (Some(stencil), Some(marker)) = (stencil.as_ref(), current) {
            composite(stencil, marker, area, layer);
            groups += 1;
        }

        debug!(
            traces = self.traces.len(),
            marker_groups = groups,
            width = area.width,
            height = area.height,
            "composited traces"
        );
        Ok(groups)
    }

    /// Extends `range` to cover every trace's X data and vertical lines.
    pub fn autoscale_x(&self, range: &mut AxisRange) {
        for trace in &self.traces {
            trace.autoscale_x(range);
        }
    }

    /// Extends `range` to cover every trace's Y data and horizontal lines.
    pub fn autoscale_y(&self, range: &mut AxisRange) {
        for trace in &self.traces {
            trace.autoscale_y(range);
        }
    }

    /// Locates the visible point nearest to data position `(x, y)`.
    ///
    /// Distances are measured in pixels of `projector`. Earlier traces win
    /// ties; an exact hit ends the search.
    #[must_use]
    pub fn find_closest_point(&self, projector: &Projector, x: f64, y: f64) -> Option<ClosestPoint> {
        let screen_x = projector.proj_x(x);
        let screen_y = projector.proj_y(y);

        let mut best: Option<ClosestPoint> = None;
        for (index, trace) in self.traces.iter().enumerate() {
            let bound = best.map_or(i64::MAX, |found| found.distance_sq);
            if let Some((point, distance_sq)) =
                trace.find_closest_point(projector, screen_x, screen_y, bound)
            {
                best = Some(ClosestPoint {
                    trace: index,
                    point,
                    distance_sq,
                });
                if distance_sq == 0 {
                    break;
                }
            }
        }
        best
    }

    /// Data coordinates of one point.
    #[must_use]
    pub fn point(&self, point: PointRef) -> Option<(f64, f64)> {
        self.traces.get(point.trace)?.point(point.point)
    }

    /// All annotation texts of one point.
    #[must_use]
    pub fn annotations(&self, point: PointRef) -> SmallVec<[&'a str; 4]> {
        self.traces
            .get(point.trace)
            .map(|trace| trace.annotations(point.point).collect())
            .unwrap_or_default()
    }
}

fn composite(stencil: &Stencil, marker: &Marker, area: ScreenRect, layer: &mut LayerPrimitives) {
    let dilated = stencil.convolve(marker);
    let image = mask_to_rgba(&dilated, area.width, area.height, marker.color());
    layer.images.push(ImagePrimitive::new(area.x, area.y, image));
}

#[cfg(test)]
mod tests {
    use super::TraceCollection;
    use crate::core::{Marker, PointRef, Projector, ScreenRect, Trace, Viewport};
    use crate::render::{Color, LayerPrimitives};

    fn projector() -> Projector {
        let viewport = Viewport::new(0.0, 0.0, 10.0, 10.0).expect("viewport");
        Projector::for_plot_area(viewport, ScreenRect::new(5, 3, 100, 100)).expect("projector")
    }

    #[test]
    fn shared_marker_traces_form_one_group() {
        let red = Marker::square(0, Color::RED);
        let blue = Marker::square(0, Color::BLUE);
        let y = [1.0f32, 2.0, 3.0];
        let mut traces = TraceCollection::new();
        traces.push(Trace::new(&red).with_y(&y)).expect("push");
        traces.push(Trace::new(&red).with_y(&y)).expect("push");
        traces.push(Trace::new(&blue).with_y(&y)).expect("push");
        traces.push(Trace::new(&red).with_y(&y)).expect("push");

        let mut layer = LayerPrimitives::new();
        let groups = traces.draw(&projector(), &mut layer).expect("draw");
        assert_eq!(groups, 3);
        assert_eq!(layer.images.len(), 3);
        assert_eq!(layer.images[0].x, 5);
        assert_eq!(layer.images[0].y, 3);
        assert!(layer.lines.is_empty());
    }

    #[test]
    fn line_only_traces_bypass_the_stencil() {
        let green = Marker::square(1, Color::GREEN);
        let mut traces = TraceCollection::new();
        traces
            .push(Trace::new(&green).with_vertical_line(5.0).with_horizontal_line(50.0))
            .expect("push");

        let mut layer = LayerPrimitives::new();
        let groups = traces.draw(&projector(), &mut layer).expect("draw");
        assert_eq!(groups, 0);
        assert!(layer.images.is_empty());
        // the horizontal line sits outside the data range
        assert_eq!(layer.lines.len(), 1);
        assert_eq!(layer.lines[0].x1, 55.0);
        assert_eq!(layer.lines[0].color, Color::GREEN);
    }

    #[test]
    fn closest_point_prefers_exact_hit() {
        let marker = Marker::square(0, Color::WHITE);
        let near = [4.0f32];
        let exact = [5.0f32];
        let mut traces = TraceCollection::new();
        traces.push(Trace::new(&marker).with_y(&near)).expect("push");
        traces.push(Trace::new(&marker).with_y(&exact)).expect("push");

        let found = traces
            .find_closest_point(&projector(), 1.0, 5.0)
            .expect("closest point");
        assert_eq!(found.point_ref(), PointRef::new(1, 0));
        assert_eq!(found.distance_sq, 0);
        assert_eq!(traces.point(found.point_ref()), Some((1.0, 5.0)));
    }

    #[test]
    fn points_outside_view_are_never_found() {
        let marker = Marker::square(0, Color::WHITE);
        let y = [50.0f32];
        let mut traces = TraceCollection::new();
        traces.push(Trace::new(&marker).with_y(&y)).expect("push");
        assert!(traces.find_closest_point(&projector(), 1.0, 9.0).is_none());
    }
}
