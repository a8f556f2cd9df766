//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! workflow / submitter / client produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//! ```
//!
//! No metrics exporter is installed here; an embedding binary may install a
//! recorder, otherwise counter updates are no-ops.

pub mod logging;
pub mod metrics;
