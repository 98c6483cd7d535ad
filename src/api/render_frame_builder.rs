use tracing::trace;

use crate::core::{Projector, ScreenRect};
use crate::error::PlotResult;
use crate::render::{
    Color, LayerPrimitives, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

use super::axis_decorations::draw_axis_decorations;
use super::engine::CachedScene;
use super::PlotEngine;

const SHADOW_OFFSETS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

impl<R: Renderer> PlotEngine<'_, R> {
    /// Assembles the frame for the current state.
    ///
    /// The scene (background, decorations, traces) is rebuilt only when the
    /// viewport or widget changed or a full redraw was requested; otherwise
    /// the cached scene is reused and only the overlay is regenerated.
    pub fn build_frame(&mut self) -> PlotResult<RenderFrame> {
        let projector = self.projector()?;
        if self.labels_revision != self.view.axes_revision() {
            self.x_labels.reset();
            self.y_labels.reset();
            self.labels_revision = self.view.axes_revision();
        }

        let scene = match self.reusable_scene() {
            Some(scene) => {
                self.stats.cached_redraws += 1;
                trace!(revision = self.view.revision(), "reusing cached scene");
                scene
            }
            None => {
                let scene = self.build_scene(&projector)?;
                self.cache = Some(CachedScene {
                    revision: self.view.revision(),
                    widget: self.widget,
                    scene: scene.clone(),
                });
                self.force_full_redraw = false;
                self.stats.full_redraws += 1;
                scene
            }
        };

        let overlay = self.build_overlay(&projector);
        let frame = RenderFrame::new(self.widget)
            .with_scene(scene)
            .with_overlay(overlay);
        frame.validate()?;
        Ok(frame)
    }

    fn reusable_scene(&self) -> Option<LayerPrimitives> {
        if self.force_full_redraw {
            return None;
        }
        self.cache
            .as_ref()
            .filter(|cached| cached.revision == self.view.revision() && cached.widget == self.widget)
            .map(|cached| cached.scene.clone())
    }

    fn build_scene(&mut self, projector: &Projector) -> PlotResult<LayerPrimitives> {
        let mut scene = LayerPrimitives::new();
        scene.rects.push(RectPrimitive::filled(
            f64::from(self.widget.x),
            f64::from(self.widget.y),
            f64::from(self.widget.width),
            f64::from(self.widget.height),
            self.config.style.background,
        ));
        draw_axis_decorations(
            projector,
            &self.config,
            &mut self.x_labels,
            &mut self.y_labels,
            &mut scene,
        )?;
        self.traces.draw(projector, &mut scene)?;
        Ok(scene)
    }

    fn build_overlay(&self, projector: &Projector) -> LayerPrimitives {
        let mut overlay = LayerPrimitives::new();
        let style = self.config.style;

        if let Some([ax, ay, bx, by]) = self.interaction.zoom_rect() {
            let (x0, y0) = (projector.proj_x(ax), projector.proj_y(ay));
            let (x1, y1) = (projector.proj_x(bx), projector.proj_y(by));
            overlay.rects.push(RectPrimitive::outline(
                f64::from(x0.min(x1)),
                f64::from(y0.min(y1)),
                f64::from((x1 - x0).abs()),
                f64::from((y1 - y0).abs()),
                style.zoom_rect,
            ));
        }

        if !self.cursor_visible {
            return overlay;
        }

        if let Some((x, y)) = self
            .highlight
            .highlighted()
            .and_then(|point| self.traces.point(point))
            .filter(|&(x, y)| projector.contains_data(x, y))
        {
            let (sx, sy) = (f64::from(projector.proj_x(x)), f64::from(projector.proj_y(y)));
            let d = self.config.highlight_size_px;
            let area = projector.screen_rect();
            if let Some(line) = clip_line(sx - d, sy - d, sx + d, sy + d, area) {
                overlay.lines.push(line.with_color(style.highlight_primary));
            }
            if let Some(line) = clip_line(sx - d, sy + d, sx + d, sy - d, area) {
                overlay.lines.push(line.with_color(style.highlight_secondary));
            }
        }

        self.push_annotation_text(projector.screen_rect(), &mut overlay);
        overlay
    }

    fn push_annotation_text(&self, area: ScreenRect, overlay: &mut LayerPrimitives) {
        let lines = self.highlight.annotation_lines();
        let font = self.config.font_size_px;
        let style = self.config.style;
        let x = f64::from(area.x) + font / 2.0;
        let mut y = f64::from(area.bottom()) - lines.len() as f64 * font - font / 2.0;

        for line in lines {
            if !line.is_empty() {
                for (dx, dy) in SHADOW_OFFSETS {
                    overlay.texts.push(TextPrimitive::new(
                        line.clone(),
                        x + dx,
                        y + dy,
                        font,
                        style.annotation_shadow,
                        TextHAlign::Left,
                    ));
                }
                overlay.texts.push(TextPrimitive::new(
                    line.clone(),
                    x,
                    y,
                    font,
                    style.annotation_text,
                    TextHAlign::Left,
                ));
            }
            y += font;
        }
    }
}

/// Segment endpoints pulled inside `area` along the segment (Liang-Barsky).
struct ClippedLine {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl ClippedLine {
    fn with_color(self, color: Color) -> LinePrimitive {
        LinePrimitive::new(self.x1, self.y1, self.x2, self.y2, color)
    }
}

fn clip_line(x1: f64, y1: f64, x2: f64, y2: f64, area: ScreenRect) -> Option<ClippedLine> {
    let (left, right) = (f64::from(area.x), f64::from(area.right()));
    let (top, bottom) = (f64::from(area.y), f64::from(area.bottom()));
    let (dx, dy) = (x2 - x1, y2 - y1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, x1 - left),
        (dx, right - x1),
        (-dy, y1 - top),
        (dy, bottom - y1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some(ClippedLine {
        x1: x1 + t0 * dx,
        y1: y1 + t0 * dy,
        x2: x1 + t1 * dx,
        y2: y1 + t1 * dy,
    })
}
