//! Record storage
//!
//! The reports only ever need primary-key reads and foreign-key traversals,
//! so storage sits behind [`RecordStore`]. [`crate::db::PgStore`] is the
//! PostgreSQL implementation; [`MemoryStore`] keeps everything in process
//! for tests and dry runs.
//!
//! Listing methods return records in the order the reports rely on:
//! events by `(date, sequence)`, temperature samples newest first, agenda
//! entries and amendments newest first, stages by presentation date.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::{validation_error, AppResult};
use crate::models::*;
use async_trait::async_trait;
use validator::Validate;

#[async_trait]
pub trait RecordStore: Send + Sync {
    // -- bills ---------------------------------------------------------------

    async fn insert_bill(&self, bill: NewBill) -> AppResult<Bill>;

    async fn get_bill(&self, id: i32) -> AppResult<Option<Bill>>;

    /// Delete a bill together with its stages, their events, temperature
    /// and agenda history, amendments, and the bill's progress phases.
    /// Returns `false` when the bill did not exist.
    async fn delete_bill(&self, id: i32) -> AppResult<bool>;

    // -- stages --------------------------------------------------------------

    async fn insert_stage(&self, stage: NewStage) -> AppResult<Stage>;

    async fn get_stage(&self, id: i32) -> AppResult<Option<Stage>>;

    /// Lookup by the chamber's own id
    async fn find_stage(&self, chamber: Chamber, external_id: i32) -> AppResult<Option<Stage>>;

    async fn stages_for_bill(&self, bill_id: i32) -> AppResult<Vec<Stage>>;

    /// Refresh the cached temperature of a stage
    async fn set_stage_temperature(&self, stage_id: i32, temperature: Option<f64>) -> AppResult<()>;

    // -- proceedings ---------------------------------------------------------

    async fn insert_event(&self, event: NewProceedingsEvent) -> AppResult<ProceedingsEvent>;

    async fn events_for_stage(&self, stage_id: i32) -> AppResult<Vec<ProceedingsEvent>>;

    /// Last event in `(date, sequence)` order, fetched on its own
    async fn latest_event(&self, stage_id: i32) -> AppResult<Option<ProceedingsEvent>>;

    // -- weekly history ------------------------------------------------------

    async fn insert_temperature(
        &self,
        record: NewTemperatureRecord,
    ) -> AppResult<TemperatureRecord>;

    /// At most `limit` samples, newest period first
    async fn temperature_history(
        &self,
        stage_id: i32,
        limit: usize,
    ) -> AppResult<Vec<TemperatureRecord>>;

    async fn insert_agenda(&self, record: NewAgendaRecord) -> AppResult<AgendaRecord>;

    async fn agenda_history(&self, stage_id: i32) -> AppResult<Vec<AgendaRecord>>;

    // -- progress ------------------------------------------------------------

    async fn insert_progress(&self, phase: NewProgressPhase) -> AppResult<ProgressPhase>;

    async fn progress_for_bill(&self, bill_id: i32) -> AppResult<Vec<ProgressPhase>>;

    // -- amendments ----------------------------------------------------------

    async fn insert_amendment(&self, amendment: NewAmendment) -> AppResult<Amendment>;

    async fn get_amendment(&self, id: i32) -> AppResult<Option<Amendment>>;

    async fn amendments_for_stage(&self, stage_id: i32) -> AppResult<Vec<Amendment>>;

    // -- committees ----------------------------------------------------------

    async fn insert_committee_member(
        &self,
        member: NewCommitteeMember,
    ) -> AppResult<CommitteeMember>;

    async fn committee_members(
        &self,
        chamber: &str,
        committee_code: &str,
    ) -> AppResult<Vec<CommitteeMember>>;

    // -- general info --------------------------------------------------------

    /// Insert or replace a named value
    async fn put_info(&self, name: &str, value: serde_json::Value) -> AppResult<GeneralInfo>;

    async fn get_info(&self, name: &str) -> AppResult<Option<GeneralInfo>>;
}

/// Run the payload's field validators, mapping failures to a validation error
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|e| validation_error(e.to_string()))
}
