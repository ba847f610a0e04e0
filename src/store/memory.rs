//! In-memory record store
//!
//! Same contract as the PostgreSQL store, including cascade deletes and
//! foreign-key checks on insert. All tables live behind a single lock so a
//! cascade is never observed half done.

use crate::error::{validation_error, AppResult};
use crate::models::*;
use crate::store::{validate_payload, RecordStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Tables {
    /// Shared id sequence; ids are unique across tables
    last_id: i32,
    bills: HashMap<i32, Bill>,
    stages: HashMap<i32, Stage>,
    events: HashMap<i32, ProceedingsEvent>,
    temperatures: HashMap<i32, TemperatureRecord>,
    agenda: HashMap<i32, AgendaRecord>,
    progress: HashMap<i32, ProgressPhase>,
    amendments: HashMap<i32, Amendment>,
    committee_members: HashMap<i32, CommitteeMember>,
    info: HashMap<String, GeneralInfo>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn require_bill(&self, bill_id: i32) -> AppResult<()> {
        if self.bills.contains_key(&bill_id) {
            Ok(())
        } else {
            Err(validation_error(format!("Bill {} does not exist", bill_id)))
        }
    }

    fn require_stage(&self, stage_id: i32) -> AppResult<()> {
        if self.stages.contains_key(&stage_id) {
            Ok(())
        } else {
            Err(validation_error(format!("Stage {} does not exist", stage_id)))
        }
    }
}

/// Thread-safe in-memory store
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_bill(&self, bill: NewBill) -> AppResult<Bill> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let bill = Bill {
            id,
            nickname: bill.nickname,
            theme: bill.theme,
        };
        tables.bills.insert(id, bill.clone());
        Ok(bill)
    }

    async fn get_bill(&self, id: i32) -> AppResult<Option<Bill>> {
        Ok(self.tables.read().await.bills.get(&id).cloned())
    }

    async fn delete_bill(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.bills.remove(&id).is_none() {
            return Ok(false);
        }

        let stage_ids: HashSet<i32> = tables
            .stages
            .values()
            .filter(|s| s.bill_id == Some(id))
            .map(|s| s.id)
            .collect();

        tables.stages.retain(|_, s| !stage_ids.contains(&s.id));
        tables.events.retain(|_, e| !stage_ids.contains(&e.stage_id));
        tables.temperatures.retain(|_, t| !stage_ids.contains(&t.stage_id));
        tables.agenda.retain(|_, a| !stage_ids.contains(&a.stage_id));
        tables.amendments.retain(|_, a| !stage_ids.contains(&a.stage_id));
        tables.progress.retain(|_, p| p.bill_id != id);

        info!("Deleted bill {} and {} stage(s)", id, stage_ids.len());
        Ok(true)
    }

    async fn insert_stage(&self, stage: NewStage) -> AppResult<Stage> {
        validate_payload(&stage)?;
        let mut tables = self.tables.write().await;
        if let Some(bill_id) = stage.bill_id {
            tables.require_bill(bill_id)?;
        }
        let id = tables.next_id();
        let stage = stage.into_stage(id);
        debug!("Stored stage {} ({})", stage.id, stage.label());
        tables.stages.insert(id, stage.clone());
        Ok(stage)
    }

    async fn get_stage(&self, id: i32) -> AppResult<Option<Stage>> {
        Ok(self.tables.read().await.stages.get(&id).cloned())
    }

    async fn find_stage(&self, chamber: Chamber, external_id: i32) -> AppResult<Option<Stage>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stages
            .values()
            .filter(|s| s.chamber == chamber && s.external_id == external_id)
            .min_by_key(|s| (s.presented_on, s.id))
            .cloned())
    }

    async fn stages_for_bill(&self, bill_id: i32) -> AppResult<Vec<Stage>> {
        let tables = self.tables.read().await;
        let mut stages: Vec<Stage> = tables
            .stages
            .values()
            .filter(|s| s.bill_id == Some(bill_id))
            .cloned()
            .collect();
        stages.sort_by_key(|s| (s.presented_on, s.id));
        Ok(stages)
    }

    async fn set_stage_temperature(
        &self,
        stage_id: i32,
        temperature: Option<f64>,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stage = tables
            .stages
            .get_mut(&stage_id)
            .ok_or_else(|| validation_error(format!("Stage {} does not exist", stage_id)))?;
        stage.temperature = temperature;
        Ok(())
    }

    async fn insert_event(&self, event: NewProceedingsEvent) -> AppResult<ProceedingsEvent> {
        let mut tables = self.tables.write().await;
        tables.require_stage(event.stage_id)?;
        let id = tables.next_id();
        let event = event.into_event(id);
        tables.events.insert(id, event.clone());
        Ok(event)
    }

    async fn events_for_stage(&self, stage_id: i32) -> AppResult<Vec<ProceedingsEvent>> {
        let tables = self.tables.read().await;
        let mut events: Vec<ProceedingsEvent> = tables
            .events
            .values()
            .filter(|e| e.stage_id == stage_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| ProceedingsEvent::chronological(a, b).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn latest_event(&self, stage_id: i32) -> AppResult<Option<ProceedingsEvent>> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .values()
            .filter(|e| e.stage_id == stage_id)
            .max_by(|a, b| ProceedingsEvent::chronological(a, b).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn insert_temperature(
        &self,
        record: NewTemperatureRecord,
    ) -> AppResult<TemperatureRecord> {
        let mut tables = self.tables.write().await;
        tables.require_stage(record.stage_id)?;
        let id = tables.next_id();
        let record = record.into_record(id);
        tables.temperatures.insert(id, record.clone());
        Ok(record)
    }

    async fn temperature_history(
        &self,
        stage_id: i32,
        limit: usize,
    ) -> AppResult<Vec<TemperatureRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<TemperatureRecord> = tables
            .temperatures
            .values()
            .filter(|t| t.stage_id == stage_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.period.cmp(&a.period).then(a.id.cmp(&b.id)));
        records.truncate(limit);
        Ok(records)
    }

    async fn insert_agenda(&self, record: NewAgendaRecord) -> AppResult<AgendaRecord> {
        let mut tables = self.tables.write().await;
        tables.require_stage(record.stage_id)?;
        let id = tables.next_id();
        let record = record.into_record(id);
        tables.agenda.insert(id, record.clone());
        Ok(record)
    }

    async fn agenda_history(&self, stage_id: i32) -> AppResult<Vec<AgendaRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<AgendaRecord> = tables
            .agenda
            .values()
            .filter(|a| a.stage_id == stage_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn insert_progress(&self, phase: NewProgressPhase) -> AppResult<ProgressPhase> {
        validate_payload(&phase)?;
        let mut tables = self.tables.write().await;
        tables.require_bill(phase.bill_id)?;
        let id = tables.next_id();
        let phase = phase.into_phase(id);
        tables.progress.insert(id, phase.clone());
        Ok(phase)
    }

    async fn progress_for_bill(&self, bill_id: i32) -> AppResult<Vec<ProgressPhase>> {
        let tables = self.tables.read().await;
        let mut phases: Vec<ProgressPhase> = tables
            .progress
            .values()
            .filter(|p| p.bill_id == bill_id)
            .cloned()
            .collect();
        phases.sort_by_key(|p| p.id);
        Ok(phases)
    }

    async fn insert_amendment(&self, amendment: NewAmendment) -> AppResult<Amendment> {
        let mut tables = self.tables.write().await;
        tables.require_stage(amendment.stage_id)?;
        let id = tables.next_id();
        let amendment = amendment.into_amendment(id);
        tables.amendments.insert(id, amendment.clone());
        Ok(amendment)
    }

    async fn get_amendment(&self, id: i32) -> AppResult<Option<Amendment>> {
        Ok(self.tables.read().await.amendments.get(&id).cloned())
    }

    async fn amendments_for_stage(&self, stage_id: i32) -> AppResult<Vec<Amendment>> {
        let tables = self.tables.read().await;
        let mut amendments: Vec<Amendment> = tables
            .amendments
            .values()
            .filter(|a| a.stage_id == stage_id)
            .cloned()
            .collect();
        amendments.sort_by(|a, b| b.presented_on.cmp(&a.presented_on).then(a.id.cmp(&b.id)));
        Ok(amendments)
    }

    async fn insert_committee_member(
        &self,
        member: NewCommitteeMember,
    ) -> AppResult<CommitteeMember> {
        validate_payload(&member)?;
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let member = member.into_member(id);
        tables.committee_members.insert(id, member.clone());
        Ok(member)
    }

    async fn committee_members(
        &self,
        chamber: &str,
        committee_code: &str,
    ) -> AppResult<Vec<CommitteeMember>> {
        let tables = self.tables.read().await;
        let mut members: Vec<CommitteeMember> = tables
            .committee_members
            .values()
            .filter(|m| m.chamber == chamber && m.committee_code == committee_code)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }

    async fn put_info(&self, name: &str, value: serde_json::Value) -> AppResult<GeneralInfo> {
        let mut tables = self.tables.write().await;
        let id = match tables.info.get(name) {
            Some(existing) => existing.id,
            None => tables.next_id(),
        };
        let info = GeneralInfo {
            id,
            name: name.to_string(),
            value,
        };
        tables.info.insert(name.to_string(), info.clone());
        Ok(info)
    }

    async fn get_info(&self, name: &str) -> AppResult<Option<GeneralInfo>> {
        Ok(self.tables.read().await.info.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_stage(store: &MemoryStore, bill_id: i32, external_id: i32) -> Stage {
        store
            .insert_stage(
                NewStage::new(external_id, Chamber::Camara, "PL", 6299, date(2002, 3, 13))
                    .for_bill(bill_id),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_events_come_back_in_date_sequence_order() {
        let store = MemoryStore::new();
        let bill = store.insert_bill(NewBill::new("Agrotóxicos", "Meio Ambiente")).await.unwrap();
        let stage = seed_stage(&store, bill.id, 46249).await;

        for (day, seq) in [(5, 2), (3, 9), (5, 1)] {
            store
                .insert_event(NewProceedingsEvent::new(
                    stage.id,
                    date(2018, 6, day),
                    seq,
                    "Plenário",
                    "PLEN",
                ))
                .await
                .unwrap();
        }

        let order: Vec<(u32, i32)> = store
            .events_for_stage(stage.id)
            .await
            .unwrap()
            .iter()
            .map(|e| (chrono::Datelike::day(&e.date), e.sequence))
            .collect();
        assert_eq!(order, vec![(3, 9), (5, 1), (5, 2)]);

        let latest = store.latest_event(stage.id).await.unwrap().unwrap();
        assert_eq!((latest.date, latest.sequence), (date(2018, 6, 5), 2));
    }

    #[tokio::test]
    async fn test_delete_bill_cascades() {
        let store = MemoryStore::new();
        let bill = store.insert_bill(NewBill::new("Licenciamento", "Meio Ambiente")).await.unwrap();
        let other = store.insert_bill(NewBill::new("Outra", "Agenda Nacional")).await.unwrap();
        let stage = seed_stage(&store, bill.id, 257161).await;
        let kept = seed_stage(&store, other.id, 999).await;

        store
            .insert_event(NewProceedingsEvent::new(
                stage.id,
                date(2019, 1, 1),
                1,
                "Plenário",
                "PLEN",
            ))
            .await
            .unwrap();
        store
            .insert_temperature(NewTemperatureRecord {
                stage_id: stage.id,
                period: date(2019, 1, 7),
                period_events: 3,
                recent_temperature: 3.0,
            })
            .await
            .unwrap();
        store
            .insert_agenda(NewAgendaRecord {
                stage_id: stage.id,
                date: date(2019, 1, 7),
                week: 2,
                venue: "PLEN".to_string(),
                on_agenda: Some(true),
            })
            .await
            .unwrap();
        store
            .insert_amendment(NewAmendment {
                stage_id: stage.id,
                presented_on: date(2019, 1, 8),
                venue: "CCJC".to_string(),
                author: "Dep. Fulano".to_string(),
                full_text_link: None,
            })
            .await
            .unwrap();
        store
            .insert_progress(NewProgressPhase::new(bill.id, "Construção", "Comissões"))
            .await
            .unwrap();
        store
            .insert_event(NewProceedingsEvent::new(
                kept.id,
                date(2019, 1, 1),
                1,
                "Plenário",
                "PLEN",
            ))
            .await
            .unwrap();

        assert!(store.delete_bill(bill.id).await.unwrap());

        assert!(store.get_bill(bill.id).await.unwrap().is_none());
        assert!(store.get_stage(stage.id).await.unwrap().is_none());
        assert!(store.events_for_stage(stage.id).await.unwrap().is_empty());
        assert!(store.temperature_history(stage.id, 6).await.unwrap().is_empty());
        assert!(store.agenda_history(stage.id).await.unwrap().is_empty());
        assert!(store.amendments_for_stage(stage.id).await.unwrap().is_empty());
        assert!(store.progress_for_bill(bill.id).await.unwrap().is_empty());

        // unrelated bill untouched
        assert_eq!(store.events_for_stage(kept.id).await.unwrap().len(), 1);
        assert!(!store.delete_bill(bill.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_requires_parent() {
        let store = MemoryStore::new();
        let err = store
            .insert_event(NewProceedingsEvent::new(42, date(2019, 1, 1), 1, "Plenário", "PLEN"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = store
            .insert_stage(NewStage::new(1, Chamber::Senado, "PLS", 1, date(2019, 1, 1)).for_bill(7))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_temperature_history_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        let bill = store.insert_bill(NewBill::default()).await.unwrap();
        let stage = seed_stage(&store, bill.id, 1).await;
        for week in 1..=8 {
            store
                .insert_temperature(NewTemperatureRecord {
                    stage_id: stage.id,
                    period: date(2019, 1, 1) + chrono::Duration::weeks(week),
                    period_events: week as i32,
                    recent_temperature: week as f64,
                })
                .await
                .unwrap();
        }

        let history = store.temperature_history(stage.id, 6).await.unwrap();
        let events: Vec<i32> = history.iter().map(|t| t.period_events).collect();
        assert_eq!(events, vec![8, 7, 6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn test_find_stage_by_chamber_and_external_id() {
        let store = MemoryStore::new();
        let bill = store.insert_bill(NewBill::default()).await.unwrap();
        let stage = seed_stage(&store, bill.id, 2121442).await;

        let found = store.find_stage(Chamber::Camara, 2121442).await.unwrap();
        assert_eq!(found, Some(stage));
        assert!(store.find_stage(Chamber::Senado, 2121442).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_info_replaces_value() {
        let store = MemoryStore::new();
        let first = store
            .put_info("last_update", serde_json::json!("2019-05-01"))
            .await
            .unwrap();
        let second = store
            .put_info("last_update", serde_json::json!("2019-05-08"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            store.get_info("last_update").await.unwrap().unwrap().value,
            serde_json::json!("2019-05-08")
        );
    }

    #[test]
    fn test_committee_member_requires_code() {
        let store = MemoryStore::new();
        let result = tokio_test::block_on(store.insert_committee_member(NewCommitteeMember {
            chamber: "camara".to_string(),
            ..Default::default()
        }));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
