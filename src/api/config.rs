use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Colors of the plot decorations and cursor overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub background: Color,
    pub axis: Color,
    pub grid: Color,
    pub text: Color,
    pub zoom_rect: Color,
    pub annotation_text: Color,
    pub annotation_shadow: Color,
    pub highlight_primary: Color,
    pub highlight_secondary: Color,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            axis: Color::GREEN,
            grid: Color::DARK_GREEN,
            text: Color::GREEN,
            zoom_rect: Color::WHITE,
            annotation_text: Color::GREEN,
            annotation_shadow: Color::BLACK,
            highlight_primary: Color::RED,
            highlight_secondary: Color::BLUE,
        }
    }
}

/// Fixed start-up limits of one axis. Missing bounds are autoscaled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisLimits {
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
}

impl AxisLimits {
    #[must_use]
    pub const fn new(low: Option<f64>, high: Option<f64>) -> Self {
        Self { low, high }
    }
}

/// Plot setup: labels, typography, interaction tuning and colors.
///
/// Serializable so hosts can persist plot setup alongside their data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_title_font_size_px")]
    pub title_font_size_px: f64,
    #[serde(default = "default_font_size_px")]
    pub axis_label_font_size_px: f64,
    /// Glyph advance as a fraction of the font size, used for label boxes.
    #[serde(default = "default_char_width_ratio")]
    pub char_width_ratio: f64,
    #[serde(default = "default_wheel_zoom_factor")]
    pub wheel_zoom_factor: f64,
    /// Fraction of the span added beyond each autoscaled bound.
    #[serde(default = "default_autoscale_margin")]
    pub autoscale_margin: f64,
    #[serde(default = "default_minor_tic_length_px")]
    pub minor_tic_length_px: f64,
    #[serde(default = "default_major_tic_length_px")]
    pub major_tic_length_px: f64,
    #[serde(default = "default_highlight_size_px")]
    pub highlight_size_px: f64,
    #[serde(default)]
    pub x_limits: AxisLimits,
    #[serde(default)]
    pub y_limits: AxisLimits,
    #[serde(default)]
    pub style: PlotStyle,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            font_size_px: default_font_size_px(),
            title_font_size_px: default_title_font_size_px(),
            axis_label_font_size_px: default_font_size_px(),
            char_width_ratio: default_char_width_ratio(),
            wheel_zoom_factor: default_wheel_zoom_factor(),
            autoscale_margin: default_autoscale_margin(),
            minor_tic_length_px: default_minor_tic_length_px(),
            major_tic_length_px: default_major_tic_length_px(),
            highlight_size_px: default_highlight_size_px(),
            x_limits: AxisLimits::default(),
            y_limits: AxisLimits::default(),
            style: PlotStyle::default(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        self.font_size_px = font_size_px;
        self
    }

    #[must_use]
    pub fn with_wheel_zoom_factor(mut self, factor: f64) -> Self {
        self.wheel_zoom_factor = factor;
        self
    }

    #[must_use]
    pub fn with_autoscale_margin(mut self, margin: f64) -> Self {
        self.autoscale_margin = margin;
        self
    }

    #[must_use]
    pub fn with_x_limits(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.x_limits = AxisLimits::new(low, high);
        self
    }

    #[must_use]
    pub fn with_y_limits(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.y_limits = AxisLimits::new(low, high);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        for (name, value) in [
            ("font_size_px", self.font_size_px),
            ("title_font_size_px", self.title_font_size_px),
            ("axis_label_font_size_px", self.axis_label_font_size_px),
            ("char_width_ratio", self.char_width_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlotError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.wheel_zoom_factor.is_finite() || self.wheel_zoom_factor <= 1.0 {
            return Err(PlotError::InvalidData(
                "wheel_zoom_factor must be finite and > 1".to_owned(),
            ));
        }
        if !self.autoscale_margin.is_finite() || self.autoscale_margin < 0.0 {
            return Err(PlotError::InvalidData(
                "autoscale_margin must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("minor_tic_length_px", self.minor_tic_length_px),
            ("major_tic_length_px", self.major_tic_length_px),
            ("highlight_size_px", self.highlight_size_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for limits in [self.x_limits, self.y_limits] {
            if limits.low.into_iter().chain(limits.high).any(|v| !v.is_finite()) {
                return Err(PlotError::InvalidData(
                    "axis limits must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_font_size_px() -> f64 {
    14.0
}

fn default_title_font_size_px() -> f64 {
    18.0
}

fn default_char_width_ratio() -> f64 {
    0.6
}

fn default_wheel_zoom_factor() -> f64 {
    1.3
}

fn default_autoscale_margin() -> f64 {
    0.03
}

fn default_minor_tic_length_px() -> f64 {
    3.0
}

fn default_major_tic_length_px() -> f64 {
    7.0
}

fn default_highlight_size_px() -> f64 {
    10.0
}
