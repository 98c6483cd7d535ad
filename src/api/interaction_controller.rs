use tracing::{debug, trace};

use crate::core::{AutoscaleBounds, ZoomAxes};
use crate::error::PlotResult;
use crate::interaction::{InputEvent, InteractionMode, Modifiers, PointerButton};
use crate::render::Renderer;

use super::PlotEngine;

impl<R: Renderer> PlotEngine<'_, R> {
    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// Applies one host input event. Returns whether a redraw is needed.
    pub fn handle_event(&mut self, event: InputEvent) -> PlotResult<bool> {
        trace!(?event, "input event");
        match event {
            InputEvent::PointerDown { x, y, button } => self.on_pointer_down(x, y, button),
            InputEvent::PointerUp { x, y, button } => self.on_pointer_up(x, y, button),
            InputEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InputEvent::Wheel {
                x,
                y,
                delta,
                modifiers,
            } => self.on_wheel(x, y, delta, modifiers),
            InputEvent::Key { key, modifiers } => self.on_key(key, modifiers),
        }
    }

    /// Polls the lookup worker. Returns whether the highlighted point
    /// changed, in which case the overlay needs a redraw.
    pub fn on_timer(&mut self) -> bool {
        let changed = match self.annotator.get_highlighted_point() {
            Some(found) => self.highlight.set_highlight(found.point_ref(), self.traces),
            None => self.highlight.clear_highlight(self.traces),
        };
        if changed {
            debug!(highlighted = ?self.highlight.highlighted(), "highlight changed");
        }
        changed
    }

    fn data_position(&self, x: i32, y: i32) -> PlotResult<(f64, f64)> {
        let projector = self.projector()?;
        Ok((projector.unproj_x(x), projector.unproj_y(y)))
    }

    fn on_pointer_down(&mut self, x: i32, y: i32, button: PointerButton) -> PlotResult<bool> {
        let (data_x, data_y) = self.data_position(x, y)?;
        match button {
            PointerButton::Primary => {
                self.interaction.on_pan_start(data_x, data_y);
                Ok(false)
            }
            PointerButton::Secondary => {
                self.interaction.on_zoom_select_start(data_x, data_y);
                Ok(true)
            }
        }
    }

    fn on_pointer_up(&mut self, x: i32, y: i32, button: PointerButton) -> PlotResult<bool> {
        match button {
            PointerButton::Primary => {
                self.interaction.on_pan_end();
                Ok(false)
            }
            PointerButton::Secondary => {
                let (data_x, data_y) = self.data_position(x, y)?;
                let Some([ax, ay, bx, by]) = self.interaction.on_zoom_select_end(data_x, data_y)
                else {
                    return Ok(false);
                };
                self.view.zoom_to_rect(ax, ay, bx, by)?;
                // the selection rectangle disappears either way
                Ok(true)
            }
        }
    }

    fn on_pointer_move(&mut self, x: i32, y: i32) -> PlotResult<bool> {
        if !self.interaction.on_pointer_move(x, y) {
            return Ok(false);
        }

        let mut redraw = false;
        let (data_x, data_y) = self.data_position(x, y)?;
        if let Some((dx, dy)) = self.interaction.pan_delta(data_x, data_y) {
            self.view.pan(dx, dy)?;
            redraw = true;
        }
        redraw |= self.interaction.on_zoom_select_move(data_x, data_y);

        // lookups run against the view the pointer now sits in
        let projector = self.projector()?;
        let (data_x, data_y) = (projector.unproj_x(x), projector.unproj_y(y));
        self.annotator.notify_cursor_change(data_x, data_y, projector);
        self.highlight.notify_cursor_change(data_x, data_y, self.traces);
        Ok(redraw || self.cursor_visible)
    }

    fn on_wheel(&mut self, x: i32, y: i32, delta: i32, modifiers: Modifiers) -> PlotResult<bool> {
        let factor = match delta.signum() {
            1 => self.config.wheel_zoom_factor,
            -1 => 1.0 / self.config.wheel_zoom_factor,
            _ => return Ok(false),
        };
        let axes = ZoomAxes {
            x: !modifiers.ctrl,
            y: !modifiers.shift,
        };
        if !(axes.x || axes.y) {
            return Ok(false);
        }
        let (data_x, data_y) = self.data_position(x, y)?;
        self.view.zoom_at(data_x, data_y, factor, axes)?;
        Ok(true)
    }

    fn on_key(&mut self, key: char, modifiers: Modifiers) -> PlotResult<bool> {
        match key {
            'a' => {
                let (x_bounds, y_bounds) = match (modifiers.shift, modifiers.ctrl) {
                    (true, false) => (AutoscaleBounds::BOTH, AutoscaleBounds::NONE),
                    (false, true) => (AutoscaleBounds::NONE, AutoscaleBounds::BOTH),
                    _ => (AutoscaleBounds::BOTH, AutoscaleBounds::BOTH),
                };
                let margin = self.config.autoscale_margin;
                self.view.autoscale_x(self.traces, x_bounds, margin)?;
                self.view.autoscale_y(self.traces, y_bounds, margin)?;
                self.force_full_redraw = true;
                debug!(?x_bounds, ?y_bounds, "autoscale requested");
                Ok(true)
            }
            'm' => {
                self.toggle_cursor();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
