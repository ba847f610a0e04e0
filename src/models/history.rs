//! Weekly history of a stage: temperature samples and agenda flags

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weekly temperature snapshot, newest first when listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureRecord {
    pub id: i32,
    pub stage_id: i32,
    /// First day of the week
    pub period: NaiveDate,
    /// Number of events in the week
    pub period_events: i32,
    /// Accumulated temperature with exponential decay
    pub recent_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemperatureRecord {
    pub stage_id: i32,
    pub period: NaiveDate,
    pub period_events: i32,
    pub recent_temperature: f64,
}

impl NewTemperatureRecord {
    pub fn into_record(self, id: i32) -> TemperatureRecord {
        TemperatureRecord {
            id,
            stage_id: self.stage_id,
            period: self.period,
            period_events: self.period_events,
            recent_temperature: self.recent_temperature,
        }
    }
}

/// Whether a stage was on the agenda in a given week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaRecord {
    pub id: i32,
    pub stage_id: i32,
    pub date: NaiveDate,
    pub week: i32,
    pub venue: String,
    pub on_agenda: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgendaRecord {
    pub stage_id: i32,
    pub date: NaiveDate,
    pub week: i32,
    #[serde(default)]
    pub venue: String,
    pub on_agenda: Option<bool>,
}

impl NewAgendaRecord {
    pub fn into_record(self, id: i32) -> AgendaRecord {
        AgendaRecord {
            id,
            stage_id: self.stage_id,
            date: self.date,
            week: self.week,
            venue: self.venue,
            on_agenda: self.on_agenda,
        }
    }
}
