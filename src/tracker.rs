//! Bill tracker
//!
//! Loads related records from the store and assembles what a bill page
//! shows: stage overviews, progress bar, condensed proceedings, trends.

use crate::config::ReportConfig;
use crate::documents::DocumentClient;
use crate::error::{not_found_error, AppResult};
use crate::models::*;
use crate::reports::{
    committees_visited, resolve_status, summarize_progress, summarize_proceedings,
    EventSource, ProceedingsSummaryRow, ProgressSummaryRow, TrendEstimator,
};
use crate::store::RecordStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything shown for one stage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOverview {
    pub id: i32,
    pub label: String,
    pub chamber: Chamber,
    pub url: String,
    pub temperature: Option<f64>,
    pub trend: f64,
    pub status: Option<String>,
    pub on_agenda: Option<bool>,
    pub latest_agenda: Option<AgendaRecord>,
    pub committees: BTreeSet<String>,
    pub proceedings: Vec<ProceedingsSummaryRow>,
    pub amendment_count: usize,
}

/// Everything shown for one bill
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOverview {
    pub bill: Bill,
    pub progress: Vec<ProgressSummaryRow>,
    pub stages: Vec<StageOverview>,
}

/// Outcome of downloading one amendment's full text
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendmentDocument {
    pub amendment_id: i32,
    pub link: Option<String>,
    pub size: Option<u64>,
    pub error: Option<String>,
}

pub struct Tracker {
    store: Arc<dyn RecordStore>,
    documents: DocumentClient,
    reports: ReportConfig,
}

impl Tracker {
    pub fn new(
        store: Arc<dyn RecordStore>,
        documents: DocumentClient,
        reports: ReportConfig,
    ) -> Self {
        Self {
            store,
            documents,
            reports,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    async fn require_stage(&self, stage_id: i32) -> AppResult<Stage> {
        self.store
            .get_stage(stage_id)
            .await?
            .ok_or_else(|| not_found_error(format!("Stage {} not found", stage_id)))
    }

    async fn require_bill(&self, bill_id: i32) -> AppResult<Bill> {
        self.store
            .get_bill(bill_id)
            .await?
            .ok_or_else(|| not_found_error(format!("Bill {} not found", bill_id)))
    }

    /// Slope of the stage's recent temperature samples
    pub async fn trend(&self, stage_id: i32) -> AppResult<f64> {
        let history = self
            .store
            .temperature_history(stage_id, self.reports.trend_window)
            .await?;
        Ok(TrendEstimator::coefficient(&history, self.reports.trend_window))
    }

    /// Status of the latest event, fetched on its own
    pub async fn status(&self, stage_id: i32) -> AppResult<Option<String>> {
        resolve_status(stage_id, EventSource::Store(self.store.as_ref())).await
    }

    pub async fn progress_summary(&self, bill_id: i32) -> AppResult<Vec<ProgressSummaryRow>> {
        let phases = self.store.progress_for_bill(bill_id).await?;
        summarize_progress(&phases)
    }

    pub async fn proceedings_summary(
        &self,
        stage_id: i32,
    ) -> AppResult<Vec<ProceedingsSummaryRow>> {
        let stage = self.require_stage(stage_id).await?;
        let events = self.store.events_for_stage(stage_id).await?;
        Ok(summarize_proceedings(stage.chamber, &events))
    }

    pub async fn committees_visited(&self, stage_id: i32) -> AppResult<BTreeSet<String>> {
        let events = self.store.events_for_stage(stage_id).await?;
        Ok(committees_visited(&events))
    }

    /// Members of a committee in a chamber
    pub async fn committee_composition(
        &self,
        chamber: Chamber,
        committee_code: &str,
    ) -> AppResult<Vec<CommitteeMember>> {
        self.store
            .committee_members(chamber.as_str(), committee_code)
            .await
    }

    pub async fn stage_overview(&self, stage_id: i32) -> AppResult<StageOverview> {
        let stage = self.require_stage(stage_id).await?;
        self.overview_of(stage).await
    }

    async fn overview_of(&self, stage: Stage) -> AppResult<StageOverview> {
        // one fetch of the events feeds the summary, committees and status
        let events = self.store.events_for_stage(stage.id).await?;
        let status = resolve_status(stage.id, EventSource::Preloaded(&events)).await?;
        let trend = self.trend(stage.id).await?;
        let latest_agenda = self.store.agenda_history(stage.id).await?.into_iter().next();
        let amendment_count = self.store.amendments_for_stage(stage.id).await?.len();

        debug!(
            "Overview of stage {}: {} events, trend {}",
            stage.id,
            events.len(),
            trend
        );

        Ok(StageOverview {
            id: stage.id,
            label: stage.label(),
            chamber: stage.chamber,
            url: stage.url(),
            temperature: stage.temperature,
            trend,
            status,
            on_agenda: stage.on_agenda,
            latest_agenda,
            committees: committees_visited(&events),
            proceedings: summarize_proceedings(stage.chamber, &events),
            amendment_count,
        })
    }

    pub async fn bill_overview(&self, bill_id: i32) -> AppResult<BillOverview> {
        let bill = self.require_bill(bill_id).await?;
        let progress = self.progress_summary(bill_id).await?;

        let mut stages = Vec::new();
        for stage in self.store.stages_for_bill(bill_id).await? {
            stages.push(self.overview_of(stage).await?);
        }

        Ok(BillOverview {
            bill,
            progress,
            stages,
        })
    }

    /// Store the weekly temperature sample starting at `period` and refresh
    /// the stage's cached temperature
    pub async fn record_week(
        &self,
        stage_id: i32,
        period: NaiveDate,
    ) -> AppResult<TemperatureRecord> {
        self.require_stage(stage_id).await?;
        let events = self.store.events_for_stage(stage_id).await?;
        let previous = self.store.temperature_history(stage_id, 1).await?;

        let sample = TrendEstimator::weekly_sample(
            stage_id,
            period,
            &events,
            previous.first(),
            self.reports.temperature_decay,
        );
        let record = self.store.insert_temperature(sample).await?;
        self.store
            .set_stage_temperature(stage_id, Some(record.recent_temperature))
            .await?;

        info!(
            "Stage {} week {}: {} events, temperature {:.2}",
            stage_id, period, record.period_events, record.recent_temperature
        );
        Ok(record)
    }

    /// Full-text size of one amendment; fetch failures are errors
    pub async fn amendment_size(&self, amendment_id: i32) -> AppResult<u64> {
        let amendment = self
            .store
            .get_amendment(amendment_id)
            .await?
            .ok_or_else(|| not_found_error(format!("Amendment {} not found", amendment_id)))?;
        Ok(self.documents.document_size(&amendment).await?)
    }

    /// Full-text sizes of every amendment of a stage, one failure per row
    pub async fn amendment_documents(&self, stage_id: i32) -> AppResult<Vec<AmendmentDocument>> {
        let amendments = self.store.amendments_for_stage(stage_id).await?;
        let mut documents = Vec::with_capacity(amendments.len());

        for amendment in amendments {
            let outcome = self.documents.document_size(&amendment).await;
            let (size, error) = match outcome {
                Ok(size) => (Some(size), None),
                Err(e) => (None, Some(e.to_string())),
            };
            documents.push(AmendmentDocument {
                amendment_id: amendment.id,
                link: amendment.full_text_link,
                size,
                error,
            });
        }

        Ok(documents)
    }
}
