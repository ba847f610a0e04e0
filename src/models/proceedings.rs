//! Proceedings (tramitação) events

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Venue label shared by every committee event
pub const COMMITTEES_VENUE: &str = "Comissões";

/// A dated procedural action within a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProceedingsEvent {
    pub id: i32,
    pub stage_id: i32,
    pub date: NaiveDate,
    /// Position of the event in the chamber's proceedings list
    pub sequence: i32,
    pub event: String,
    /// Short code of the venue (CCJC, PLEN, CD-MESA-PLEN...)
    pub venue_code: String,
    /// Venue group ("Comissões", "Plenário"...)
    pub venue: String,
    pub situation: String,
    pub text: String,
    pub status: String,
    pub full_text_link: Option<String>,
    /// Importance level used for notifications
    pub level: Option<i32>,
}

impl ProceedingsEvent {
    pub fn is_committee(&self) -> bool {
        self.venue == COMMITTEES_VENUE
    }

    /// Natural order of events inside a stage: date, then sequence
    pub fn chronological(a: &Self, b: &Self) -> Ordering {
        (a.date, a.sequence).cmp(&(b.date, b.sequence))
    }
}

/// Insert payload for a proceedings event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProceedingsEvent {
    pub stage_id: i32,
    pub date: NaiveDate,
    pub sequence: i32,
    pub event: String,
    #[serde(default)]
    pub venue_code: String,
    pub venue: String,
    pub situation: String,
    pub text: String,
    pub status: String,
    pub full_text_link: Option<String>,
    pub level: Option<i32>,
}

impl NewProceedingsEvent {
    pub fn new(
        stage_id: i32,
        date: NaiveDate,
        sequence: i32,
        venue: impl Into<String>,
        venue_code: impl Into<String>,
    ) -> Self {
        Self {
            stage_id,
            date,
            sequence,
            event: String::new(),
            venue_code: venue_code.into(),
            venue: venue.into(),
            situation: String::new(),
            text: String::new(),
            status: String::new(),
            full_text_link: None,
            level: None,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn into_event(self, id: i32) -> ProceedingsEvent {
        ProceedingsEvent {
            id,
            stage_id: self.stage_id,
            date: self.date,
            sequence: self.sequence,
            event: self.event,
            venue_code: self.venue_code,
            venue: self.venue,
            situation: self.situation,
            text: self.text,
            status: self.status,
            full_text_link: self.full_text_link,
            level: self.level,
        }
    }
}
