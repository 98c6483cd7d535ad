use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid screen rectangle: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid marker pattern: {0}")]
    InvalidMarker(String),

    #[error("unknown marker code `{0}`")]
    UnknownMarker(String),

    #[error("trace {field} length mismatch: expected {expected}, got {actual}")]
    TraceLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("requesting excessive number of linear axis tics ({count})")]
    ExcessiveTicCount { count: i64 },

    #[error("annotator is already shut down")]
    AnnotatorAlreadyShutdown,

    #[error("failed to spawn annotator worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("annotator worker panicked")]
    WorkerPanicked,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
