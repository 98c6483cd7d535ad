use crate::error::PlotResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests catch invalid geometry without
/// a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_line_count: usize,
    pub last_image_count: usize,
    pub last_texts: Vec<String>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_count = frame.layers().map(|layer| layer.lines.len()).sum();
        self.last_image_count = frame.layers().map(|layer| layer.images.len()).sum();
        self.last_texts = frame
            .layers()
            .flat_map(|layer| layer.texts.iter().map(|text| text.text.clone()))
            .collect();
        Ok(())
    }
}
