use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;

use notabook_core::result::AppResult;
use notabook_core::types::{PageRequest, PageResponse};
use notabook_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry, EntityType};

use super::MemoryStore;
use crate::filter::{AuditFilter, CountBy};
use crate::traits::AuditStore;

/// Count keys, most frequent first, ties broken by key text.
fn ranked<K: Copy + Eq + Hash + ToString>(keys: impl Iterator<Item = K>) -> Vec<CountBy<K>> {
    let mut counts: HashMap<K, i64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut ranked: Vec<CountBy<K>> = counts
        .into_iter()
        .map(|(key, count)| CountBy { key, count })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.key.to_string().cmp(&b.key.to_string()))
    });
    ranked
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let mut state = self.lock().await?;
        let row = self.stage_audit(entry)?;
        state.audit_log.push(row.clone());
        Ok(row)
    }

    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let state = self.lock().await?;
        let entries: Vec<AuditLogEntry> = state
            .audit_log
            .iter()
            .rev()
            .filter(|e| filter.matches(e.actor_id, e.action, e.entity_type, e.created_at))
            .map(|e| {
                let mut entry = e.clone();
                entry.actor_name = state
                    .users
                    .iter()
                    .find(|u| u.id == e.actor_id)
                    .map(|u| u.name.clone());
                entry
            })
            .collect();
        Ok(PageResponse::from_all(entries, page))
    }

    async fn count_by_action(&self, since: DateTime<Utc>) -> AppResult<Vec<CountBy<AuditAction>>> {
        let state = self.lock().await?;
        Ok(ranked(
            state
                .audit_log
                .iter()
                .filter(|e| e.created_at >= since)
                .map(|e| e.action),
        ))
    }

    async fn top_entity_types(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<CountBy<EntityType>>> {
        let state = self.lock().await?;
        let mut ranked = ranked(
            state
                .audit_log
                .iter()
                .filter(|e| e.created_at >= since)
                .map(|e| e.entity_type),
        );
        ranked.truncate(limit as usize);
        Ok(ranked)
    }
}
