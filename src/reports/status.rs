//! Current status of a stage
//!
//! The status is the one of the stage's latest proceedings event. Callers
//! that already loaded the events pass them in; otherwise only the latest
//! event is fetched from the store.

use crate::error::AppResult;
use crate::models::ProceedingsEvent;
use crate::store::RecordStore;

/// Where the resolver reads events from
pub enum EventSource<'a> {
    /// Events already loaded, in `(date, sequence)` order
    Preloaded(&'a [ProceedingsEvent]),
    /// Fetch the latest event from storage
    Store(&'a dyn RecordStore),
}

/// Status of the most recent event of `stage_id`, `None` without events
pub async fn resolve_status(stage_id: i32, source: EventSource<'_>) -> AppResult<Option<String>> {
    match source {
        EventSource::Preloaded(events) => Ok(events.last().map(|e| e.status.clone())),
        EventSource::Store(store) => Ok(store.latest_event(stage_id).await?.map(|e| e.status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chamber, NewBill, NewProceedingsEvent, NewStage};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 7, d).unwrap()
    }

    #[tokio::test]
    async fn test_preloaded_and_store_paths_agree() {
        let store = MemoryStore::new();
        let bill = store.insert_bill(NewBill::new("Reforma", "Agenda Nacional")).await.unwrap();
        let stage = store
            .insert_stage(
                NewStage::new(2192459, Chamber::Camara, "PEC", 6, date(1)).for_bill(bill.id),
            )
            .await
            .unwrap();

        let entries = [
            (10, 2, "Aguardando Parecer"),
            (12, 1, "Pronta para Pauta"),
            (10, 7, "Em tramitação"),
        ];
        for (d, seq, status) in entries {
            store
                .insert_event(
                    NewProceedingsEvent::new(stage.id, date(d), seq, "Plenário", "PLEN")
                        .with_status(status),
                )
                .await
                .unwrap();
        }

        let events = store.events_for_stage(stage.id).await.unwrap();
        let preloaded = resolve_status(stage.id, EventSource::Preloaded(&events)).await.unwrap();
        let fetched = resolve_status(stage.id, EventSource::Store(&store)).await.unwrap();

        assert_eq!(preloaded.as_deref(), Some("Pronta para Pauta"));
        assert_eq!(preloaded, fetched);
    }

    #[tokio::test]
    async fn test_no_events_means_no_status() {
        let store = MemoryStore::new();
        let stage = store
            .insert_stage(NewStage::new(1, Chamber::Senado, "PLS", 1, date(1)))
            .await
            .unwrap();

        assert_eq!(resolve_status(stage.id, EventSource::Preloaded(&[])).await.unwrap(), None);
        assert_eq!(resolve_status(stage.id, EventSource::Store(&store)).await.unwrap(), None);
    }
}
