use crate::core::types::{ScreenRect, Viewport};
use crate::error::{PlotError, PlotResult};

/// Affine map between a data rectangle and a pixel rectangle.
///
/// `data (x0, y0)` lands on `screen (x0, y0)` and `data (x1, y1)` on
/// `screen (x1, y1)`. Corners may run in either direction on both sides,
/// which is how the Y axis gets inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    data_x0: f64,
    data_y0: f64,
    data_x1: f64,
    data_y1: f64,
    screen_x0: i32,
    screen_y0: i32,
    screen_x1: i32,
    screen_y1: i32,
    slope_x: f64,
    intercept_x: f64,
    intercept_x_rounding: f64,
    slope_y: f64,
    intercept_y: f64,
    intercept_y_rounding: f64,
}

impl Projector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data_x0: f64,
        data_y0: f64,
        data_x1: f64,
        data_y1: f64,
        screen_x0: i32,
        screen_y0: i32,
        screen_x1: i32,
        screen_y1: i32,
    ) -> PlotResult<Self> {
        if !data_x0.is_finite() || !data_x1.is_finite() || data_x0 == data_x1 {
            return Err(PlotError::InvalidData(
                "projector x domain must be finite and non-zero".to_owned(),
            ));
        }
        if !data_y0.is_finite() || !data_y1.is_finite() || data_y0 == data_y1 {
            return Err(PlotError::InvalidData(
                "projector y domain must be finite and non-zero".to_owned(),
            ));
        }

        let slope_x = f64::from(screen_x1 - screen_x0) / (data_x1 - data_x0);
        let intercept_x = f64::from(screen_x0) - data_x0 * slope_x;
        let slope_y = f64::from(screen_y1 - screen_y0) / (data_y1 - data_y0);
        let intercept_y = f64::from(screen_y0) - data_y0 * slope_y;

        Ok(Self {
            data_x0,
            data_y0,
            data_x1,
            data_y1,
            screen_x0,
            screen_y0,
            screen_x1,
            screen_y1,
            slope_x,
            intercept_x,
            intercept_x_rounding: intercept_x + 0.5,
            slope_y,
            intercept_y,
            intercept_y_rounding: intercept_y + 0.5,
        })
    }

    /// Maps the viewport onto a plot area with data `y1` at the top edge.
    pub fn for_plot_area(viewport: Viewport, area: ScreenRect) -> PlotResult<Self> {
        let area = area.validate()?;
        Self::new(
            viewport.x0(),
            viewport.y0(),
            viewport.x1(),
            viewport.y1(),
            area.x,
            area.bottom(),
            area.right(),
            area.y,
        )
    }

    /// Maps the viewport onto a stencil whose origin is its top-left pixel.
    pub fn for_stencil(viewport: Viewport, width: u32, height: u32) -> PlotResult<Self> {
        ScreenRect::new(0, 0, width, height).validate()?;
        Self::new(
            viewport.x0(),
            viewport.y1(),
            viewport.x1(),
            viewport.y0(),
            0,
            0,
            width as i32,
            height as i32,
        )
    }

    /// Data X to pixel column (`floor(x * slope + intercept + 0.5)`).
    #[inline]
    #[must_use]
    pub fn proj_x(&self, x: f64) -> i32 {
        (x * self.slope_x + self.intercept_x_rounding).floor() as i32
    }

    /// Data Y to pixel row (`floor(y * slope + intercept + 0.5)`).
    #[inline]
    #[must_use]
    pub fn proj_y(&self, y: f64) -> i32 {
        (y * self.slope_y + self.intercept_y_rounding).floor() as i32
    }

    /// Pixel column to data X. The pixel is clamped to the screen rectangle first.
    #[must_use]
    pub fn unproj_x(&self, pixel: i32) -> f64 {
        let pixel = pixel.clamp(
            self.screen_x0.min(self.screen_x1),
            self.screen_x0.max(self.screen_x1),
        );
        (f64::from(pixel) - self.intercept_x) / self.slope_x
    }

    /// Pixel row to data Y. The pixel is clamped to the screen rectangle first.
    #[must_use]
    pub fn unproj_y(&self, pixel: i32) -> f64 {
        let pixel = pixel.clamp(
            self.screen_y0.min(self.screen_y1),
            self.screen_y0.max(self.screen_y1),
        );
        (f64::from(pixel) - self.intercept_y) / self.slope_y
    }

    /// Cheap reject test against the data rectangle, inclusive on all edges.
    #[inline]
    #[must_use]
    pub fn contains_data(&self, x: f64, y: f64) -> bool {
        x >= self.data_x0.min(self.data_x1)
            && x <= self.data_x0.max(self.data_x1)
            && y >= self.data_y0.min(self.data_y1)
            && y <= self.data_y0.max(self.data_y1)
    }

    /// Data size of one pixel step along X.
    #[must_use]
    pub fn data_per_pixel_x(&self) -> f64 {
        1.0 / self.slope_x.abs()
    }

    /// Data size of one pixel step along Y.
    #[must_use]
    pub fn data_per_pixel_y(&self) -> f64 {
        1.0 / self.slope_y.abs()
    }

    #[must_use]
    pub fn screen_width(&self) -> u32 {
        self.screen_x1.abs_diff(self.screen_x0)
    }

    #[must_use]
    pub fn screen_height(&self) -> u32 {
        self.screen_y1.abs_diff(self.screen_y0)
    }

    /// Screen rectangle covered by the projection, normalized to top-left origin.
    #[must_use]
    pub fn screen_rect(&self) -> ScreenRect {
        ScreenRect::new(
            self.screen_x0.min(self.screen_x1),
            self.screen_y0.min(self.screen_y1),
            self.screen_width(),
            self.screen_height(),
        )
    }

    #[must_use]
    pub fn screen_x0(&self) -> i32 {
        self.screen_x0
    }

    #[must_use]
    pub fn screen_y0(&self) -> i32 {
        self.screen_y0
    }

    #[must_use]
    pub fn screen_x1(&self) -> i32 {
        self.screen_x1
    }

    #[must_use]
    pub fn screen_y1(&self) -> i32 {
        self.screen_y1
    }

    #[must_use]
    pub fn screen_center(&self) -> (i32, i32) {
        (
            (self.screen_x0 + self.screen_x1) / 2,
            (self.screen_y0 + self.screen_y1) / 2,
        )
    }

    /// The data rectangle as a normalized viewport.
    pub fn viewport(&self) -> PlotResult<Viewport> {
        Viewport::new(self.data_x0, self.data_y0, self.data_x1, self.data_y1)
    }
}
