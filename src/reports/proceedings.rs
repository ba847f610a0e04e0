//! Condensed proceedings of a stage
//!
//! The full tramitação of a bill easily runs into hundreds of events, most
//! of them repeated floor entries. The summary keeps every committee stop
//! and only the first event of each run of floor (non-committee) venues.

use crate::models::{Chamber, ProceedingsEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Floor code that starts like a committee code but is not one
pub const FLOOR_SENTINEL: &str = "CD-MESA-PLEN";

/// Committee codes all start with this letter (CCJC, CMADS, CAE...)
pub const COMMITTEE_PREFIX: char = 'C';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProceedingsSummaryRow {
    pub date: NaiveDate,
    pub chamber: Chamber,
    /// Short venue code of the event
    pub venue_code: String,
    pub event: String,
    pub text: String,
    pub full_text_link: Option<String>,
}

impl ProceedingsSummaryRow {
    fn from_event(chamber: Chamber, event: &ProceedingsEvent) -> Self {
        Self {
            date: event.date,
            chamber,
            venue_code: event.venue_code.clone(),
            event: event.event.clone(),
            text: event.text.clone(),
            full_text_link: event.full_text_link.clone(),
        }
    }
}

/// Summarize events already in `(date, sequence)` order.
///
/// Committee events are always kept. Other events are kept only when their
/// venue differs from the previous non-committee venue, which starts out
/// empty. The result is re-sorted by date, keeping input order for equal
/// dates.
pub fn summarize_proceedings(
    chamber: Chamber,
    events: &[ProceedingsEvent],
) -> Vec<ProceedingsSummaryRow> {
    let mut rows = Vec::new();
    let mut last_floor_venue: &str = "";

    for event in events {
        if event.is_committee() {
            rows.push(ProceedingsSummaryRow::from_event(chamber, event));
        } else if last_floor_venue != event.venue {
            last_floor_venue = event.venue.as_str();
            rows.push(ProceedingsSummaryRow::from_event(chamber, event));
        }
    }

    rows.sort_by_key(|row| row.date);
    rows
}

/// Committees a stage went through, by code
pub fn committees_visited(events: &[ProceedingsEvent]) -> BTreeSet<String> {
    events
        .iter()
        .map(|e| e.venue_code.as_str())
        .filter(|code| is_committee_code(code))
        .map(str::to_string)
        .collect()
}

pub fn is_committee_code(code: &str) -> bool {
    code != FLOOR_SENTINEL && code.starts_with(COMMITTEE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::COMMITTEES_VENUE;
    use pretty_assertions::assert_eq;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, m, d).unwrap()
    }

    fn event(day: NaiveDate, seq: i32, venue: &str, code: &str) -> ProceedingsEvent {
        ProceedingsEvent {
            id: seq,
            stage_id: 1,
            date: day,
            sequence: seq,
            event: format!("evento {}", seq),
            venue_code: code.to_string(),
            venue: venue.to_string(),
            situation: String::new(),
            text: format!("texto {}", seq),
            status: String::new(),
            full_text_link: None,
            level: None,
        }
    }

    fn codes(rows: &[ProceedingsSummaryRow]) -> Vec<&str> {
        rows.iter().map(|r| r.venue_code.as_str()).collect()
    }

    #[test]
    fn test_consecutive_floor_events_collapse() {
        let events = vec![
            event(date(3, 1), 1, "Plenário", "PLEN"),
            event(date(3, 2), 2, "Plenário", "PLEN"),
            event(date(3, 3), 3, "Plenário", "PLEN"),
            event(date(3, 4), 4, "Mesa Diretora", "MESA"),
        ];
        let rows = summarize_proceedings(Chamber::Camara, &events);
        assert_eq!(codes(&rows), vec!["PLEN", "MESA"]);
        assert_eq!(rows[0].date, date(3, 1));
    }

    #[test]
    fn test_committee_events_never_merge() {
        let events = vec![
            event(date(3, 1), 1, COMMITTEES_VENUE, "CCJC"),
            event(date(3, 2), 2, COMMITTEES_VENUE, "CCJC"),
            event(date(3, 3), 3, COMMITTEES_VENUE, "CMADS"),
        ];
        let rows = summarize_proceedings(Chamber::Camara, &events);
        assert_eq!(codes(&rows), vec!["CCJC", "CCJC", "CMADS"]);
    }

    #[test]
    fn test_committee_stop_does_not_reset_floor_run() {
        // the floor venue is compared to the last floor venue, not to the
        // previous event, so a committee in between does not re-emit PLEN
        let events = vec![
            event(date(3, 1), 1, "Plenário", "PLEN"),
            event(date(3, 2), 2, COMMITTEES_VENUE, "CCJC"),
            event(date(3, 3), 3, "Plenário", "PLEN"),
            event(date(3, 4), 4, "Senado", "SF"),
            event(date(3, 5), 5, "Plenário", "PLEN"),
        ];
        let rows = summarize_proceedings(Chamber::Camara, &events);
        assert_eq!(codes(&rows), vec!["PLEN", "CCJC", "SF", "PLEN"]);
    }

    #[test]
    fn test_no_two_consecutive_floor_rows_share_a_venue() {
        let venues = ["Plenário", "Plenário", "Mesa", "Mesa", "Plenário", "Plenário"];
        let events: Vec<ProceedingsEvent> = venues
            .iter()
            .enumerate()
            .map(|(i, v)| event(date(4, i as u32 + 1), i as i32, v, "X"))
            .collect();
        let rows = summarize_proceedings(Chamber::Senado, &events);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.chamber == Chamber::Senado));
    }

    #[test]
    fn test_output_sorted_by_date_and_stable() {
        // input ordered by (date, sequence); same-day rows keep that order
        let events = vec![
            event(date(5, 1), 1, COMMITTEES_VENUE, "CCJC"),
            event(date(5, 1), 2, "Plenário", "PLEN"),
            event(date(5, 2), 3, COMMITTEES_VENUE, "CFT"),
        ];
        let rows = summarize_proceedings(Chamber::Camara, &events);
        assert_eq!(codes(&rows), vec!["CCJC", "PLEN", "CFT"]);
        assert_eq!(rows[1].event, "evento 2");
        assert_eq!(rows[1].text, "texto 2");
    }

    #[test]
    fn test_leading_event_without_venue_is_dropped() {
        let events = vec![
            event(date(3, 1), 1, "", ""),
            event(date(3, 2), 2, "", ""),
            event(date(3, 3), 3, "Plenário", "PLEN"),
        ];
        let rows = summarize_proceedings(Chamber::Camara, &events);
        assert_eq!(codes(&rows), vec!["PLEN"]);

        let only_blank = summarize_proceedings(Chamber::Senado, &events[..1]);
        assert!(only_blank.is_empty());
    }

    #[test]
    fn test_empty_proceedings() {
        assert!(summarize_proceedings(Chamber::Camara, &[]).is_empty());
        assert!(committees_visited(&[]).is_empty());
    }

    #[test]
    fn test_committees_visited_skips_floor_sentinel() {
        let events = vec![
            event(date(6, 1), 1, COMMITTEES_VENUE, "CCJC"),
            event(date(6, 2), 2, "Plenário", FLOOR_SENTINEL),
            event(date(6, 3), 3, COMMITTEES_VENUE, "CMADS"),
            event(date(6, 4), 4, COMMITTEES_VENUE, "CCJC"),
            event(date(6, 5), 5, "Plenário", "PLEN"),
            event(date(6, 6), 6, "Plenário", ""),
        ];
        let visited: Vec<String> = committees_visited(&events).into_iter().collect();
        assert_eq!(visited, vec!["CCJC".to_string(), "CMADS".to_string()]);
    }
}
