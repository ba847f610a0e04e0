//! Reports Module
//!
//! Everything a bill page shows that is derived rather than stored:
//! - Temperature trend (is activity heating up or cooling down?)
//! - Progress bar ordered by the canonical legislative phases
//! - Condensed proceedings and the committees a stage went through
//! - Current status of a stage

pub mod proceedings;
pub mod progress;
pub mod status;
pub mod temperature;

pub use proceedings::{committees_visited, summarize_proceedings, ProceedingsSummaryRow};
pub use progress::{summarize_progress, ProgressSummaryRow, CANONICAL_PHASES};
pub use status::{resolve_status, EventSource};
pub use temperature::TrendEstimator;
