mod annotator;
mod axis_decorations;
mod config;
mod engine;
mod highlight;
mod interaction_controller;
mod render_frame_builder;

pub use annotator::{Annotator, ResolvedCallback};
pub use axis_decorations::{draw_axis_decorations, plot_area, text_width};
pub use config::{AxisLimits, PlotConfig, PlotStyle};
pub use engine::{PlotEngine, RedrawStats};
pub use highlight::{CursorHighlight, short_number};
