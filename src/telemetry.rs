//! Optional log output for hosts that have no subscriber of their own.
//!
//! Cursor lookups run on the `plot2d-annotator` thread while frames are built
//! on the host thread, so the default format tags every event with its
//! thread name to keep the two interleaved streams apart.

/// Installs a compact subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` without the `telemetry` feature or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .with_thread_names(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
