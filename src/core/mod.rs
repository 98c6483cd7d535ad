pub mod axis_tics;
pub mod label_placement;
pub mod marker;
pub mod projector;
pub mod stencil;
pub mod sync_file;
pub mod trace;
pub mod trace_collection;
pub mod types;
pub mod view;

pub use axis_tics::{
    MAX_TICS_PER_AXIS, Tic, TicSpacing, decimation_level, format_tic_values, tic_precision,
    tic_spacing, tic_values,
};
pub use label_placement::{LabelBox, LabelCandidate, LabelPlacer};
pub use marker::{Marker, MarkerSet};
pub use projector::Projector;
pub use stencil::{Stencil, mask_to_rgba};
pub use sync_file::SyncFile;
pub use trace::{AnnotationSet, RASTER_CHUNK_LEN, Trace};
pub use trace_collection::{ClosestPoint, TraceCollection};
pub use types::{AxisRange, MIN_VIEW_SPAN, PointRef, ScreenRect, Viewport};
pub use view::{AutoscaleBounds, PlotView, ZoomAxes};
