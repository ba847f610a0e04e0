//! Bill and progress-phase models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A bill tracked across both chambers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i32,
    pub nickname: String,
    pub theme: String,
}

/// Insert payload for a bill
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub theme: String,
}

impl NewBill {
    pub fn new(nickname: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            theme: theme.into(),
        }
    }
}

/// One (global phase, venue) checkpoint of a bill's progress bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPhase {
    pub id: i32,
    pub bill_id: i32,
    /// Chamber where the phase happened
    pub venue_chamber: Option<String>,
    pub global_phase: String,
    pub venue: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
    /// The bill jumped over this phase
    pub skipped: Option<bool>,
}

/// Insert payload for a progress phase
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressPhase {
    pub bill_id: i32,
    #[validate(length(max = 30, message = "Venue chamber must be at most 30 characters"))]
    pub venue_chamber: Option<String>,
    #[serde(default)]
    pub global_phase: String,
    pub venue: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
    pub skipped: Option<bool>,
}

impl NewProgressPhase {
    pub fn new(bill_id: i32, global_phase: impl Into<String>, venue: impl Into<String>) -> Self {
        Self {
            bill_id,
            venue_chamber: None,
            global_phase: global_phase.into(),
            venue: Some(venue.into()),
            started_on: None,
            ended_on: None,
            skipped: None,
        }
    }

    pub fn into_phase(self, id: i32) -> ProgressPhase {
        ProgressPhase {
            id,
            bill_id: self.bill_id,
            venue_chamber: self.venue_chamber,
            global_phase: self.global_phase,
            venue: self.venue,
            started_on: self.started_on,
            ended_on: self.ended_on,
            skipped: self.skipped,
        }
    }
}
