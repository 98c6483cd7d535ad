//! Title, axis labels, axis lines, tic marks, grid lines and tic labels.

use crate::api::PlotConfig;
use crate::core::{
    LabelBox, LabelCandidate, LabelPlacer, Projector, ScreenRect, format_tic_values, tic_spacing,
    tic_values,
};
use crate::error::PlotResult;
use crate::render::{LayerPrimitives, LinePrimitive, TextHAlign, TextPrimitive};

/// Plot area inside the widget after reserving room for title, tic labels
/// and axis labels.
pub fn plot_area(widget: ScreenRect, config: &PlotConfig) -> PlotResult<ScreenRect> {
    let top = if config.title.is_empty() {
        0.0
    } else {
        config.title_font_size_px
    };
    let axis_label = |label: &str| {
        if label.is_empty() {
            0.0
        } else {
            config.axis_label_font_size_px
        }
    };
    let left = config.font_size_px + axis_label(&config.y_label);
    let bottom = config.font_size_px + axis_label(&config.x_label);

    let (top, left, bottom) = (top as i64, left as i64, bottom as i64);
    let width = i64::from(widget.width) - left;
    let height = i64::from(widget.height) - top - bottom;
    ScreenRect::new(
        widget.x.saturating_add(left as i32),
        widget.y.saturating_add(top as i32),
        width.max(0) as u32,
        height.max(0) as u32,
    )
    .validate()
}

/// Approximate rendered width of `text`.
#[must_use]
pub fn text_width(text: &str, font_size_px: f64, char_width_ratio: f64) -> f64 {
    text.chars().count() as f64 * font_size_px * char_width_ratio
}

/// Draws every decoration of the plot into `layer`.
///
/// Tic label history lives in `x_labels`/`y_labels` so consecutive frames
/// keep their labels stable.
pub fn draw_axis_decorations(
    projector: &Projector,
    config: &PlotConfig,
    x_labels: &mut LabelPlacer,
    y_labels: &mut LabelPlacer,
    layer: &mut LayerPrimitives,
) -> PlotResult<()> {
    let area = projector.screen_rect();
    draw_titles(area, config, layer);

    let (left, right) = (f64::from(area.x), f64::from(area.right()));
    let (top, bottom) = (f64::from(area.y), f64::from(area.bottom()));
    let style = config.style;
    layer.lines.push(LinePrimitive::new(left, top, left, bottom, style.axis));
    layer.lines.push(LinePrimitive::new(left, bottom, right, bottom, style.axis));

    draw_x_axis(projector, config, x_labels, layer)?;
    draw_y_axis(projector, config, y_labels, layer)?;
    Ok(())
}

fn draw_titles(area: ScreenRect, config: &PlotConfig, layer: &mut LayerPrimitives) {
    let center_x = f64::from(area.x) + f64::from(area.width) / 2.0;
    let center_y = f64::from(area.y) + f64::from(area.height) / 2.0;
    let color = config.style.text;

    if !config.title.is_empty() {
        layer.texts.push(TextPrimitive::new(
            config.title.clone(),
            center_x,
            f64::from(area.y) - config.title_font_size_px,
            config.title_font_size_px,
            color,
            TextHAlign::Center,
        ));
    }
    if !config.x_label.is_empty() {
        layer.texts.push(TextPrimitive::new(
            config.x_label.clone(),
            center_x,
            f64::from(area.bottom()) + config.font_size_px,
            config.axis_label_font_size_px,
            color,
            TextHAlign::Center,
        ));
    }
    if !config.y_label.is_empty() {
        layer.texts.push(
            TextPrimitive::new(
                config.y_label.clone(),
                f64::from(area.x) - config.font_size_px - config.axis_label_font_size_px,
                center_y,
                config.axis_label_font_size_px,
                color,
                TextHAlign::Center,
            )
            .vertical(),
        );
    }
}

fn draw_x_axis(
    projector: &Projector,
    config: &PlotConfig,
    placer: &mut LabelPlacer,
    layer: &mut LayerPrimitives,
) -> PlotResult<()> {
    let viewport = projector.viewport()?;
    let area = projector.screen_rect();
    let (top, bottom) = (f64::from(area.y), f64::from(area.bottom()));
    let font = config.font_size_px;
    let style = config.style;

    let spacing = tic_spacing(viewport.x0(), viewport.x1());
    for tic in tic_values(viewport.x0(), viewport.x1(), spacing.minor)? {
        let px = f64::from(projector.proj_x(tic.value));
        layer.lines.push(LinePrimitive::new(
            px,
            bottom,
            px,
            bottom - config.minor_tic_length_px,
            style.axis,
        ));
    }

    let majors = tic_values(viewport.x0(), viewport.x1(), spacing.major)?;
    let texts = format_tic_values(&majors, spacing.major);
    let mut candidates = Vec::with_capacity(majors.len());
    for (tic, text) in majors.iter().zip(texts) {
        let px = f64::from(projector.proj_x(tic.value));
        layer.lines.push(LinePrimitive::new(px, bottom, px, top, style.grid));
        layer.lines.push(LinePrimitive::new(
            px,
            bottom,
            px,
            bottom - config.major_tic_length_px,
            style.axis,
        ));

        let half_width = text_width(&text, font, config.char_width_ratio) / 2.0;
        let bounds = LabelBox::new(px - half_width, bottom, px + half_width, bottom + font)
            .expanded(font * config.char_width_ratio, 0.0);
        candidates.push(LabelCandidate {
            bounds,
            decimation_level: tic.decimation_level,
            quant: tic.quant,
            payload: TextPrimitive::new(text, px, bottom, font, style.text, TextHAlign::Center),
        });
    }

    layer
        .texts
        .extend(placer.place(candidates).into_iter().map(|label| label.payload));
    Ok(())
}

fn draw_y_axis(
    projector: &Projector,
    config: &PlotConfig,
    placer: &mut LabelPlacer,
    layer: &mut LayerPrimitives,
) -> PlotResult<()> {
    let viewport = projector.viewport()?;
    let area = projector.screen_rect();
    let (left, right) = (f64::from(area.x), f64::from(area.right()));
    let font = config.font_size_px;
    let style = config.style;

    let spacing = tic_spacing(viewport.y0(), viewport.y1());
    for tic in tic_values(viewport.y0(), viewport.y1(), spacing.minor)? {
        let py = f64::from(projector.proj_y(tic.value));
        layer.lines.push(LinePrimitive::new(
            left,
            py,
            left + config.minor_tic_length_px,
            py,
            style.axis,
        ));
    }

    let majors = tic_values(viewport.y0(), viewport.y1(), spacing.major)?;
    let texts = format_tic_values(&majors, spacing.major);
    let mut candidates = Vec::with_capacity(majors.len());
    for (tic, text) in majors.iter().zip(texts) {
        let py = f64::from(projector.proj_y(tic.value));
        layer.lines.push(LinePrimitive::new(left, py, right, py, style.grid));
        layer.lines.push(LinePrimitive::new(
            left,
            py,
            left + config.major_tic_length_px,
            py,
            style.axis,
        ));

        // rotated label left of the axis, centered on the tic
        let half_height = text_width(&text, font, config.char_width_ratio) / 2.0;
        let bounds = LabelBox::new(left - font, py - half_height, left, py + half_height)
            .expanded(0.0, font);
        candidates.push(LabelCandidate {
            bounds,
            decimation_level: tic.decimation_level,
            quant: tic.quant,
            payload: TextPrimitive::new(text, left - font, py, font, style.text, TextHAlign::Center)
                .vertical(),
        });
    }

    layer
        .texts
        .extend(placer.place(candidates).into_iter().map(|label| label.payload));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{draw_axis_decorations, plot_area, text_width};
    use crate::api::PlotConfig;
    use crate::core::{LabelPlacer, Projector, ScreenRect, Viewport};
    use crate::render::{LayerPrimitives, TextOrientation};

    #[test]
    fn margins_depend_on_labels() {
        let widget = ScreenRect::new(0, 0, 800, 600);
        let bare = plot_area(widget, &PlotConfig::default()).expect("area");
        assert_eq!(bare, ScreenRect::new(14, 0, 786, 586));

        let labelled = PlotConfig::default()
            .with_title("t")
            .with_x_label("x")
            .with_y_label("y");
        let area = plot_area(widget, &labelled).expect("area");
        assert_eq!(area, ScreenRect::new(28, 18, 772, 554));
    }

    #[test]
    fn tiny_widget_has_no_plot_area() {
        assert!(plot_area(ScreenRect::new(0, 0, 10, 10), &PlotConfig::default()).is_err());
    }

    #[test]
    fn text_width_scales_with_length() {
        assert_eq!(text_width("100", 10.0, 0.5), 15.0);
    }

    #[test]
    fn decorations_contain_both_axes() {
        let config = PlotConfig::default().with_title("demo");
        let area = plot_area(ScreenRect::new(0, 0, 800, 600), &config).expect("area");
        let viewport = Viewport::new(0.0, 0.0, 100.0, 1.0).expect("viewport");
        let projector = Projector::for_plot_area(viewport, area).expect("projector");
        let (mut xs, mut ys) = (LabelPlacer::new(), LabelPlacer::new());
        let mut layer = LayerPrimitives::new();

        draw_axis_decorations(&projector, &config, &mut xs, &mut ys, &mut layer).expect("draw");
        layer.validate().expect("valid layer");
        assert!(layer.texts.iter().any(|text| text.text == "demo"));
        assert!(layer.texts.iter().any(|text| text.text == "20"));
        assert!(
            layer
                .texts
                .iter()
                .any(|text| text.text == "0.2" && text.orientation == TextOrientation::Vertical)
        );
        assert!(xs.drawn_quants().contains(&0));
        assert!(ys.drawn_quants().contains(&0));
    }
}
