use plot2d::api::{AxisLimits, PlotConfig, PlotStyle};
use plot2d::render::Color;
use plot2d::{PlotError, PlotResult};

#[test]
fn defaults_match_the_classic_look() {
    let config = PlotConfig::default();
    assert_eq!(config.font_size_px, 14.0);
    assert_eq!(config.title_font_size_px, 18.0);
    assert_eq!(config.axis_label_font_size_px, config.font_size_px);
    assert_eq!(config.wheel_zoom_factor, 1.3);
    assert_eq!(config.autoscale_margin, 0.03);
    assert_eq!(config.style.background, Color::BLACK);
    assert_eq!(config.x_limits, AxisLimits::default());
    config.validate().expect("valid defaults");
}

#[test]
fn json_round_trip_preserves_config() -> PlotResult<()> {
    let config = PlotConfig::default()
        .with_title("noise")
        .with_x_label("sample")
        .with_y_limits(Some(-1.0), None)
        .with_style(PlotStyle {
            background: Color::WHITE,
            ..PlotStyle::default()
        });
    let json = config.to_json_pretty()?;
    assert_eq!(PlotConfig::from_json_str(&json)?, config);
    Ok(())
}

#[test]
fn missing_fields_take_defaults() -> PlotResult<()> {
    let config = PlotConfig::from_json_str(r#"{ "title": "t", "wheel_zoom_factor": 2.0 }"#)?;
    assert_eq!(config.title, "t");
    assert_eq!(config.wheel_zoom_factor, 2.0);
    assert_eq!(config.font_size_px, 14.0);
    Ok(())
}

#[test]
fn invalid_values_are_rejected() {
    let err = PlotConfig::from_json_str(r#"{ "wheel_zoom_factor": 1.0 }"#).expect_err("factor");
    assert!(matches!(err, PlotError::InvalidData(_)));

    let err = PlotConfig::from_json_str("{ not json").expect_err("syntax");
    assert!(matches!(err, PlotError::Config(_)));

    assert!(PlotConfig::default().with_font_size_px(0.0).validate().is_err());
}
