//! PostgreSQL record store
//!
//! Row mapping for every record plus the [`RecordStore`] implementation.
//! Cascades are left to the schema's `ON DELETE CASCADE`.

use crate::db::queries;
use crate::error::{validation_error, AppError, AppResult};
use crate::models::*;
use crate::store::{validate_payload, RecordStore};
use async_trait::async_trait;
use deadpool_postgres::{Object, Pool};
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;
use tracing::{debug, info};

/// Store backed by a deadpool-managed PostgreSQL pool
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn client(&self) -> AppResult<Object> {
        Ok(self.pool.get().await?)
    }
}

/// Turn foreign-key violations into validation errors, keep the rest
fn map_write_error(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        validation_error(format!("Referenced record does not exist: {}", e))
    } else {
        AppError::Database(e)
    }
}

fn optional_code<T>(raw: Option<String>) -> AppResult<Option<T>>
where
    T: std::str::FromStr<Err = AppError>,
{
    raw.map(|code| code.parse()).transpose()
}

fn bill_from_row(row: &Row) -> Bill {
    Bill {
        id: row.get("id"),
        nickname: row.get("nickname"),
        theme: row.get("theme"),
    }
}

fn stage_from_row(row: &Row) -> AppResult<Stage> {
    let chamber: String = row.get("chamber");
    Ok(Stage {
        id: row.get("id"),
        external_id: row.get("external_id"),
        bill_id: row.get("bill_id"),
        number: row.get("number"),
        type_code: row.get("type_code"),
        presented_on: row.get("presented_on"),
        chamber: chamber.parse()?,
        regime: optional_code(row.get("regime"))?,
        appreciation: optional_code(row.get("appreciation"))?,
        summary: row.get("summary"),
        justification: row.get("justification"),
        keywords: row.get("keywords"),
        author_name: row.get("author_name"),
        rapporteur_name: row.get("rapporteur_name"),
        origin_chamber: row.get("origin_chamber"),
        temperature: row.get("temperature"),
        on_agenda: row.get("on_agenda"),
        nickname: row.get("nickname"),
        theme: row.get("theme"),
    })
}

fn event_from_row(row: &Row) -> ProceedingsEvent {
    ProceedingsEvent {
        id: row.get("id"),
        stage_id: row.get("stage_id"),
        date: row.get("date"),
        sequence: row.get("sequence"),
        event: row.get("event"),
        venue_code: row.get("venue_code"),
        venue: row.get("venue"),
        situation: row.get("situation"),
        text: row.get("text"),
        status: row.get("status"),
        full_text_link: row.get("full_text_link"),
        level: row.get("level"),
    }
}

fn temperature_from_row(row: &Row) -> TemperatureRecord {
    TemperatureRecord {
        id: row.get("id"),
        stage_id: row.get("stage_id"),
        period: row.get("period"),
        period_events: row.get("period_events"),
        recent_temperature: row.get("recent_temperature"),
    }
}

fn agenda_from_row(row: &Row) -> AgendaRecord {
    AgendaRecord {
        id: row.get("id"),
        stage_id: row.get("stage_id"),
        date: row.get("date"),
        week: row.get("week"),
        venue: row.get("venue"),
        on_agenda: row.get("on_agenda"),
    }
}

fn progress_from_row(row: &Row) -> ProgressPhase {
    ProgressPhase {
        id: row.get("id"),
        bill_id: row.get("bill_id"),
        venue_chamber: row.get("venue_chamber"),
        global_phase: row.get("global_phase"),
        venue: row.get("venue"),
        started_on: row.get("started_on"),
        ended_on: row.get("ended_on"),
        skipped: row.get("skipped"),
    }
}

fn amendment_from_row(row: &Row) -> Amendment {
    Amendment {
        id: row.get("id"),
        stage_id: row.get("stage_id"),
        presented_on: row.get("presented_on"),
        venue: row.get("venue"),
        author: row.get("author"),
        full_text_link: row.get("full_text_link"),
    }
}

fn member_from_row(row: &Row) -> CommitteeMember {
    CommitteeMember {
        id: row.get("id"),
        role: row.get("role"),
        parliamentarian_id: row.get("parliamentarian_id"),
        party: row.get("party"),
        state: row.get("state"),
        seat: row.get("seat"),
        name: row.get("name"),
        photo: row.get("photo"),
        committee_code: row.get("committee_code"),
        chamber: row.get("chamber"),
    }
}

fn info_from_row(row: &Row) -> GeneralInfo {
    GeneralInfo {
        id: row.get("id"),
        name: row.get("name"),
        value: row.get("value"),
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_bill(&self, bill: NewBill) -> AppResult<Bill> {
        let client = self.client().await?;
        let row = client
            .query_one(queries::INSERT_BILL, &[&bill.nickname, &bill.theme])
            .await?;
        Ok(bill_from_row(&row))
    }

    async fn get_bill(&self, id: i32) -> AppResult<Option<Bill>> {
        let client = self.client().await?;
        let row = client.query_opt(queries::GET_BILL, &[&id]).await?;
        Ok(row.as_ref().map(bill_from_row))
    }

    async fn delete_bill(&self, id: i32) -> AppResult<bool> {
        let client = self.client().await?;
        let deleted = client.execute(queries::DELETE_BILL, &[&id]).await?;
        if deleted > 0 {
            info!("Deleted bill {} (cascade)", id);
        }
        Ok(deleted > 0)
    }

    async fn insert_stage(&self, stage: NewStage) -> AppResult<Stage> {
        validate_payload(&stage)?;
        let client = self.client().await?;
        let regime = stage.regime.map(|r| r.as_str());
        let appreciation = stage.appreciation.map(|a| a.as_str());
        let row = client
            .query_one(
                queries::insert_stage().as_str(),
                &[
                    &stage.external_id,
                    &stage.bill_id,
                    &stage.number,
                    &stage.type_code,
                    &stage.presented_on,
                    &stage.chamber.as_str(),
                    &regime,
                    &appreciation,
                    &stage.summary,
                    &stage.justification,
                    &stage.keywords,
                    &stage.author_name,
                    &stage.rapporteur_name,
                    &stage.origin_chamber,
                    &stage.temperature,
                    &stage.on_agenda,
                    &stage.nickname,
                    &stage.theme,
                ],
            )
            .await
            .map_err(map_write_error)?;
        let stored = stage_from_row(&row)?;
        debug!("Stored stage {} ({})", stored.id, stored.label());
        Ok(stored)
    }

    async fn get_stage(&self, id: i32) -> AppResult<Option<Stage>> {
        let client = self.client().await?;
        let row = client.query_opt(queries::get_stage().as_str(), &[&id]).await?;
        row.as_ref().map(stage_from_row).transpose()
    }

    async fn find_stage(&self, chamber: Chamber, external_id: i32) -> AppResult<Option<Stage>> {
        let client = self.client().await?;
        let row = client
            .query_opt(queries::find_stage().as_str(), &[&chamber.as_str(), &external_id])
            .await?;
        row.as_ref().map(stage_from_row).transpose()
    }

    async fn stages_for_bill(&self, bill_id: i32) -> AppResult<Vec<Stage>> {
        let client = self.client().await?;
        let rows = client
            .query(queries::stages_for_bill().as_str(), &[&bill_id])
            .await?;
        rows.iter().map(stage_from_row).collect()
    }

    async fn set_stage_temperature(
        &self,
        stage_id: i32,
        temperature: Option<f64>,
    ) -> AppResult<()> {
        let client = self.client().await?;
        let updated = client
            .execute(queries::SET_STAGE_TEMPERATURE, &[&stage_id, &temperature])
            .await?;
        if updated == 0 {
            return Err(validation_error(format!("Stage {} does not exist", stage_id)));
        }
        Ok(())
    }

    async fn insert_event(&self, event: NewProceedingsEvent) -> AppResult<ProceedingsEvent> {
        let client = self.client().await?;
        let row = client
            .query_one(
                queries::insert_event().as_str(),
                &[
                    &event.stage_id,
                    &event.date,
                    &event.sequence,
                    &event.event,
                    &event.venue_code,
                    &event.venue,
                    &event.situation,
                    &event.text,
                    &event.status,
                    &event.full_text_link,
                    &event.level,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(event_from_row(&row))
    }

    async fn events_for_stage(&self, stage_id: i32) -> AppResult<Vec<ProceedingsEvent>> {
        let client = self.client().await?;
        let rows = client
            .query(queries::events_for_stage().as_str(), &[&stage_id])
            .await?;
        Ok(rows.iter().map(event_from_row).collect())
    }

    async fn latest_event(&self, stage_id: i32) -> AppResult<Option<ProceedingsEvent>> {
        let client = self.client().await?;
        let row = client
            .query_opt(queries::latest_event().as_str(), &[&stage_id])
            .await?;
        Ok(row.as_ref().map(event_from_row))
    }

    async fn insert_temperature(
        &self,
        record: NewTemperatureRecord,
    ) -> AppResult<TemperatureRecord> {
        let client = self.client().await?;
        let row = client
            .query_one(
                queries::INSERT_TEMPERATURE,
                &[
                    &record.stage_id,
                    &record.period,
                    &record.period_events,
                    &record.recent_temperature,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(temperature_from_row(&row))
    }

    async fn temperature_history(
        &self,
        stage_id: i32,
        limit: usize,
    ) -> AppResult<Vec<TemperatureRecord>> {
        let client = self.client().await?;
        let limit = limit as i64;
        let rows = client
            .query(queries::TEMPERATURE_HISTORY, &[&stage_id, &limit])
            .await?;
        Ok(rows.iter().map(temperature_from_row).collect())
    }

    async fn insert_agenda(&self, record: NewAgendaRecord) -> AppResult<AgendaRecord> {
        let client = self.client().await?;
        let row = client
            .query_one(
                queries::INSERT_AGENDA,
                &[
                    &record.stage_id,
                    &record.date,
                    &record.week,
                    &record.venue,
                    &record.on_agenda,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(agenda_from_row(&row))
    }

    async fn agenda_history(&self, stage_id: i32) -> AppResult<Vec<AgendaRecord>> {
        let client = self.client().await?;
        let rows = client.query(queries::AGENDA_HISTORY, &[&stage_id]).await?;
        Ok(rows.iter().map(agenda_from_row).collect())
    }

    async fn insert_progress(&self, phase: NewProgressPhase) -> AppResult<ProgressPhase> {
        validate_payload(&phase)?;
        let client = self.client().await?;
        let row = client
            .query_one(
                queries::INSERT_PROGRESS,
                &[
                    &phase.bill_id,
                    &phase.venue_chamber,
                    &phase.global_phase,
                    &phase.venue,
                    &phase.started_on,
                    &phase.ended_on,
                    &phase.skipped,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(progress_from_row(&row))
    }

    async fn progress_for_bill(&self, bill_id: i32) -> AppResult<Vec<ProgressPhase>> {
        let client = self.client().await?;
        let rows = client.query(queries::PROGRESS_FOR_BILL, &[&bill_id]).await?;
        Ok(rows.iter().map(progress_from_row).collect())
    }

    async fn insert_amendment(&self, amendment: NewAmendment) -> AppResult<Amendment> {
        let client = self.client().await?;
        let row = client
            .query_one(
                queries::insert_amendment().as_str(),
                &[
                    &amendment.stage_id,
                    &amendment.presented_on,
                    &amendment.venue,
                    &amendment.author,
                    &amendment.full_text_link,
                ],
            )
            .await
            .map_err(map_write_error)?;
        Ok(amendment_from_row(&row))
    }

    async fn get_amendment(&self, id: i32) -> AppResult<Option<Amendment>> {
        let client = self.client().await?;
        let row = client
            .query_opt(queries::get_amendment().as_str(), &[&id])
            .await?;
        Ok(row.as_ref().map(amendment_from_row))
    }

    async fn amendments_for_stage(&self, stage_id: i32) -> AppResult<Vec<Amendment>> {
        let client = self.client().await?;
        let rows = client
            .query(queries::amendments_for_stage().as_str(), &[&stage_id])
            .await?;
        Ok(rows.iter().map(amendment_from_row).collect())
    }

    async fn insert_committee_member(
        &self,
        member: NewCommitteeMember,
    ) -> AppResult<CommitteeMember> {
        validate_payload(&member)?;
        let client = self.client().await?;
        let row = client
            .query_one(
                queries::INSERT_COMMITTEE_MEMBER,
                &[
                    &member.role,
                    &member.parliamentarian_id,
                    &member.party,
                    &member.state,
                    &member.seat,
                    &member.name,
                    &member.photo,
                    &member.committee_code,
                    &member.chamber,
                ],
            )
            .await?;
        Ok(member_from_row(&row))
    }

    async fn committee_members(
        &self,
        chamber: &str,
        committee_code: &str,
    ) -> AppResult<Vec<CommitteeMember>> {
        let client = self.client().await?;
        let rows = client
            .query(queries::COMMITTEE_MEMBERS, &[&chamber, &committee_code])
            .await?;
        Ok(rows.iter().map(member_from_row).collect())
    }

    async fn put_info(&self, name: &str, value: serde_json::Value) -> AppResult<GeneralInfo> {
        let client = self.client().await?;
        let row = client.query_one(queries::UPSERT_INFO, &[&name, &value]).await?;
        Ok(info_from_row(&row))
    }

    async fn get_info(&self, name: &str) -> AppResult<Option<GeneralInfo>> {
        let client = self.client().await?;
        let row = client.query_opt(queries::GET_INFO, &[&name]).await?;
        Ok(row.as_ref().map(info_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_code_parsing() {
        let regime: Option<Regime> = optional_code(Some("urgencia".to_string())).unwrap();
        assert_eq!(regime, Some(Regime::Urgencia));

        let missing: Option<Regime> = optional_code(None).unwrap();
        assert_eq!(missing, None);

        let bad: AppResult<Option<AppreciationForm>> = optional_code(Some("mista".to_string()));
        assert!(bad.is_err());
    }
}
