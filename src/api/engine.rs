use std::thread::Scope;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    AutoscaleBounds, LabelPlacer, PlotView, Projector, ScreenRect, TraceCollection, Viewport,
};
use crate::error::PlotResult;
use crate::interaction::InteractionState;
use crate::render::{LayerPrimitives, Renderer};

use super::axis_decorations::plot_area;
use super::{Annotator, CursorHighlight, PlotConfig, ResolvedCallback};

/// Counts of scene rebuilds versus cached scene reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedrawStats {
    pub full_redraws: u64,
    pub cached_redraws: u64,
}

#[derive(Debug, Clone)]
pub(super) struct CachedScene {
    pub(super) revision: u64,
    pub(super) widget: ScreenRect,
    pub(super) scene: LayerPrimitives,
}

/// Interactive plot facade consumed by a host widget.
///
/// `PlotEngine` owns the viewport, input state, tic label history and the
/// cursor lookup worker, and turns them into frames for its renderer. Trace
/// data is borrowed for `'s`, the lifetime of the thread scope that also
/// hosts the worker.
pub struct PlotEngine<'s, R: Renderer> {
    pub(super) renderer: R,
    pub(super) traces: &'s TraceCollection<'s>,
    pub(super) annotator: Annotator<'s>,
    pub(super) config: PlotConfig,
    pub(super) widget: ScreenRect,
    pub(super) view: PlotView,
    pub(super) interaction: InteractionState,
    pub(super) highlight: CursorHighlight,
    pub(super) x_labels: LabelPlacer,
    pub(super) y_labels: LabelPlacer,
    pub(super) labels_revision: u64,
    pub(super) cache: Option<CachedScene>,
    pub(super) force_full_redraw: bool,
    pub(super) cursor_visible: bool,
    pub(super) stats: RedrawStats,
}

impl<'s, R: Renderer> PlotEngine<'s, R> {
    /// Builds the engine and starts its lookup worker inside `scope`.
    ///
    /// Axis bounds missing from the config limits are autoscaled; an axis
    /// whose one-sided fit fails is fitted on both bounds instead.
    pub fn new<'env>(
        scope: &'s Scope<'s, 'env>,
        renderer: R,
        traces: &'s TraceCollection<'s>,
        widget: ScreenRect,
        config: PlotConfig,
    ) -> PlotResult<Self> {
        Self::with_resolved_callback(scope, renderer, traces, widget, config, None)
    }

    /// Like [`PlotEngine::new`], with a closure the worker calls after every
    /// finished lookup.
    pub fn with_resolved_callback<'env>(
        scope: &'s Scope<'s, 'env>,
        renderer: R,
        traces: &'s TraceCollection<'s>,
        widget: ScreenRect,
        config: PlotConfig,
        on_resolved: Option<ResolvedCallback<'s>>,
    ) -> PlotResult<Self> {
        config.validate()?;
        let widget = widget.validate()?;
        let view = initial_view(traces, &config)?;
        let annotator = Annotator::spawn(scope, traces, on_resolved)?;
        debug!(
            traces = traces.len(),
            width = widget.width,
            height = widget.height,
            "plot engine created"
        );

        Ok(Self {
            renderer,
            traces,
            annotator,
            config,
            widget,
            view,
            interaction: InteractionState::default(),
            highlight: CursorHighlight::new(),
            x_labels: LabelPlacer::new(),
            y_labels: LabelPlacer::new(),
            labels_revision: view.axes_revision(),
            cache: None,
            force_full_redraw: true,
            cursor_visible: false,
            stats: RedrawStats::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    #[must_use]
    pub fn traces(&self) -> &'s TraceCollection<'s> {
        self.traces
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.view.viewport()
    }

    #[must_use]
    pub fn view(&self) -> &PlotView {
        &self.view
    }

    #[must_use]
    pub fn widget(&self) -> ScreenRect {
        self.widget
    }

    #[must_use]
    pub fn highlight(&self) -> &CursorHighlight {
        &self.highlight
    }

    #[must_use]
    pub fn annotator(&self) -> &Annotator<'s> {
        &self.annotator
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    #[must_use]
    pub fn redraw_stats(&self) -> RedrawStats {
        self.stats
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Pixel area the traces are drawn into.
    pub fn plot_area(&self) -> PlotResult<ScreenRect> {
        plot_area(self.widget, &self.config)
    }

    /// Data-to-widget projection of the current viewport.
    pub fn projector(&self) -> PlotResult<Projector> {
        Projector::for_plot_area(self.view.viewport(), self.plot_area()?)
    }

    /// Sets the visible data rectangle.
    ///
    /// `reset_axes` drops tic label history, which suits jumps that change
    /// the grid; small shifts keep labels stable.
    pub fn set_viewport(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, reset_axes: bool) -> PlotResult<()> {
        self.view.set_viewport(x0, y0, x1, y1, reset_axes)
    }

    /// Marks the scene stale (`full`) or only asks for an overlay refresh.
    pub fn invalidate(&mut self, full: bool) {
        self.force_full_redraw |= full;
    }

    pub fn resize(&mut self, widget: ScreenRect) -> PlotResult<()> {
        self.widget = widget.validate()?;
        debug!(width = widget.width, height = widget.height, "plot resized");
        Ok(())
    }

    pub fn toggle_cursor(&mut self) {
        self.cursor_visible = !self.cursor_visible;
    }

    pub fn render(&mut self) -> PlotResult<()> {
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    /// Stops the lookup worker. Must run before the trace data goes away;
    /// a second call is an error.
    pub fn shutdown(&mut self) -> PlotResult<()> {
        self.annotator.shutdown()
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

fn initial_view(traces: &TraceCollection<'_>, config: &PlotConfig) -> PlotResult<PlotView> {
    let (x, y) = (config.x_limits, config.y_limits);
    let (x0, x1) = seed_bounds(x.low, x.high);
    let (y0, y1) = seed_bounds(y.low, y.high);

    let mut view = PlotView::new(Viewport::new(x0, y0, x1, y1)?);
    view.autoscale_with_fallback(
        traces,
        AutoscaleBounds {
            low: x.low.is_none(),
            high: x.high.is_none(),
        },
        AutoscaleBounds {
            low: y.low.is_none(),
            high: y.high.is_none(),
        },
        config.autoscale_margin,
    )?;
    Ok(view)
}

fn seed_bounds(low: Option<f64>, high: Option<f64>) -> (f64, f64) {
    match (low, high) {
        (Some(low), Some(high)) => (low, high),
        (Some(low), None) => (low, low + 1.0),
        (None, Some(high)) => (high - 1.0, high),
        (None, None) => (0.0, 1.0),
    }
}
