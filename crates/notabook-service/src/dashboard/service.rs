//! Dashboard aggregates for any signed-in user.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use notabook_core::result::AppResult;
use notabook_core::types::PageRequest;
use notabook_database::filter::NoteFilter;
use notabook_database::{ClientStore, NoteStore};
use notabook_entity::client::Client;
use notabook_entity::note::NoteSummary;

/// How many recent notes and clients the dashboard shows.
const RECENT_LIMIT: u64 = 5;

/// Counts and recent activity shown after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of clients.
    pub total_clients: i64,
    /// Number of notes.
    pub total_notes: i64,
    /// Notes still `pendiente`.
    pub pending_notes: i64,
    /// Sum of `pagada` totals for notes created this calendar month (UTC).
    pub paid_this_month: Decimal,
    /// Newest notes.
    pub recent_notes: Vec<NoteSummary>,
    /// Newest clients.
    pub recent_clients: Vec<Client>,
}

/// Computes dashboard figures.
#[derive(Debug, Clone)]
pub struct DashboardService {
    clients: Arc<dyn ClientStore>,
    notes: Arc<dyn NoteStore>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(clients: Arc<dyn ClientStore>, notes: Arc<dyn NoteStore>) -> Self {
        Self { clients, notes }
    }

    /// Current figures.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let note_stats = self.notes.stats(start_of_month(Utc::now())).await?;
        let recent_notes = self
            .notes
            .list(&NoteFilter::default(), &PageRequest::new(1, RECENT_LIMIT))
            .await?
            .items;

        Ok(DashboardStats {
            total_clients: self.clients.count().await?,
            total_notes: note_stats.total_notes,
            pending_notes: note_stats.pending_notes,
            paid_this_month: note_stats.paid_total_since,
            recent_notes,
            recent_clients: self.clients.recent(RECENT_LIMIT).await?,
        })
    }
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .unwrap_or(now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use notabook_entity::note::NoteStatus;

    use super::*;
    use crate::testing::{Harness, item, note_input};

    #[test]
    fn test_start_of_month() {
        let now = Utc.with_ymd_and_hms(2026, 3, 17, 15, 4, 5).unwrap();
        assert_eq!(
            start_of_month(now),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let h = Harness::new().await;
        let mut paid = note_input(h.acme.id, vec![item(dec!(2.5), dec!(10))]);
        paid.status = NoteStatus::Paid;
        h.notes.create_note(&h.secretary, &paid).await.unwrap();
        for _ in 0..6 {
            h.notes
                .create_note(&h.secretary, &note_input(h.globex.id, vec![item(dec!(1), dec!(1))]))
                .await
                .unwrap();
        }

        let stats = h.dashboard.stats().await.unwrap();
        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.total_notes, 7);
        assert_eq!(stats.pending_notes, 6);
        assert_eq!(stats.paid_this_month, dec!(25.00));
        assert_eq!(stats.recent_notes.len(), 5);
        assert_eq!(stats.recent_notes[0].folio.to_string(), "000007");
        assert_eq!(stats.recent_clients.len(), 2);
    }
}
