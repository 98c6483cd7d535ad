mod frame;
mod null_renderer;
mod primitives;

pub use frame::{LayerPrimitives, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, ImagePrimitive, LinePrimitive, RectPrimitive, RgbaImage, TextHAlign, TextOrientation,
    TextPrimitive,
};

use crate::error::PlotResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`, blit its images and
/// rasterize its glyphs. Plot logic never touches the display surface.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}
