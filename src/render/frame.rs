use crate::core::ScreenRect;
use crate::error::{PlotError, PlotResult};
use crate::render::{ImagePrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Primitives of one paint layer.
///
/// Backends paint rects, then lines, then images, then texts, each list in
/// push order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPrimitives {
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub images: Vec<ImagePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> PlotResult<()> {
        for rect in &self.rects {
            rect.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for image in &self.images {
            image.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.lines.is_empty()
            && self.images.is_empty()
            && self.texts.is_empty()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len() + self.lines.len() + self.images.len() + self.texts.len()
    }
}

/// Backend-agnostic scene for one plot draw pass.
///
/// `scene` holds background, decorations and traces and may be reused
/// between frames; `overlay` holds cursor-driven content painted on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub screen: ScreenRect,
    pub scene: LayerPrimitives,
    pub overlay: LayerPrimitives,
}

impl RenderFrame {
    #[must_use]
    pub fn new(screen: ScreenRect) -> Self {
        Self {
            screen,
            scene: LayerPrimitives::new(),
            overlay: LayerPrimitives::new(),
        }
    }

    #[must_use]
    pub fn with_scene(mut self, scene: LayerPrimitives) -> Self {
        self.scene = scene;
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: LayerPrimitives) -> Self {
        self.overlay = overlay;
        self
    }

    /// Layers in paint order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerPrimitives> {
        [&self.scene, &self.overlay].into_iter()
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.screen.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.screen.width,
                height: self.screen.height,
            });
        }
        self.scene.validate()?;
        self.overlay.validate()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scene.is_empty() && self.overlay.is_empty()
    }
}
