//! Progress bar of a bill
//!
//! Phases are ranked by a fixed table of (global phase, venue) checkpoints,
//! never by insertion order or dates. A stored pair missing from the table
//! is bad data and fails the whole summary.

use crate::error::{AppError, AppResult};
use crate::models::ProgressPhase;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The eight checkpoints of a bill's life, in display order
pub const CANONICAL_PHASES: [(&str, &str); 8] = [
    ("Construção", "Comissões"),
    ("Construção", "Plenário"),
    ("Revisão I", "Comissões"),
    ("Revisão I", "Plenário"),
    ("Revisão II", "Comissões"),
    ("Revisão II", "Plenário"),
    ("Sanção/Veto", "Presidência da República"),
    ("Avaliação dos Vetos", "Congresso"),
];

/// Phases whose label contains this (any case) are preliminary and hidden
pub const PRELIMINARY_MARKER: &str = "pré";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummaryRow {
    pub global_phase: String,
    pub venue: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
    pub venue_chamber: Option<String>,
    pub skipped: Option<bool>,
}

impl From<&ProgressPhase> for ProgressSummaryRow {
    fn from(phase: &ProgressPhase) -> Self {
        Self {
            global_phase: phase.global_phase.clone(),
            venue: phase.venue.clone(),
            started_on: phase.started_on,
            ended_on: phase.ended_on,
            venue_chamber: phase.venue_chamber.clone(),
            skipped: phase.skipped,
        }
    }
}

/// Position of a (phase, venue) pair in [`CANONICAL_PHASES`]
pub fn canonical_rank(global_phase: &str, venue: Option<&str>) -> AppResult<usize> {
    venue
        .and_then(|venue| {
            CANONICAL_PHASES
                .iter()
                .position(|(p, v)| *p == global_phase && *v == venue)
        })
        .ok_or_else(|| {
            AppError::Integrity(format!(
                "Progress phase ({}, {}) is not a canonical phase",
                global_phase,
                venue.unwrap_or("<none>")
            ))
        })
}

pub fn is_preliminary(global_phase: &str) -> bool {
    global_phase.to_lowercase().contains(PRELIMINARY_MARKER)
}

/// Display rows for a bill's progress, in canonical order
pub fn summarize_progress(phases: &[ProgressPhase]) -> AppResult<Vec<ProgressSummaryRow>> {
    let mut ranked = phases
        .iter()
        .filter(|p| !is_preliminary(&p.global_phase))
        .map(|p| {
            let rank = canonical_rank(&p.global_phase, p.venue.as_deref())?;
            Ok((rank, ProgressSummaryRow::from(p)))
        })
        .collect::<AppResult<Vec<_>>>()?;

    ranked.sort_by_key(|(rank, _)| *rank);
    Ok(ranked.into_iter().map(|(_, row)| row).collect())
}
