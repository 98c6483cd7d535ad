//! plot2d: interactive 2D scatter and line plotting engine.
//!
//! Traces borrow caller-owned `f32` sample arrays and are rasterized through
//! a shared occupancy stencil that is dilated with each trace's marker shape.
//! Axis tics keep their labels stable across frames, and a background worker
//! resolves the data point nearest to the cursor. Drawing goes through the
//! [`render::Renderer`] trait so any toolkit can host the plot.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{PlotConfig, PlotEngine};
pub use error::{PlotError, PlotResult};
