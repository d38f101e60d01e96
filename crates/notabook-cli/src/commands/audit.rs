//! Audit log CLI commands.

use chrono::{Duration, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notabook_core::error::AppError;
use notabook_core::types::{PageRequest, UserId};
use notabook_database::filter::AuditFilter;
use notabook_entity::audit::{AuditAction, AuditLogEntry, EntityType};

use crate::output::{self, OutputFormat};

/// Page size used when exporting.
const EXPORT_PAGE_SIZE: u64 = 100;

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Search the audit log, newest first
    #[command(alias = "list")]
    Search {
        /// Filter by action (e.g. create, mark_paid)
        #[arg(short, long)]
        action: Option<AuditAction>,
        /// Filter by entity type (user, client, note)
        #[arg(short, long)]
        entity: Option<EntityType>,
        /// Filter by actor (user ID)
        #[arg(long)]
        actor: Option<UserId>,
        /// Number of results
        #[arg(short, long, default_value = "50")]
        limit: u64,
    },
    /// Export recent audit entries to a JSON file
    Export {
        /// Output file path
        #[arg(short, long, default_value = "audit_export.json")]
        output: String,
        /// Days of history to export
        #[arg(short, long, default_value = "30")]
        days: i64,
    },
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    /// Time
    time: String,
    /// Actor
    actor: String,
    /// Action
    action: String,
    /// Entity
    entity: String,
    /// Entity ID
    entity_id: String,
}

impl From<&AuditLogEntry> for AuditRow {
    fn from(entry: &AuditLogEntry) -> Self {
        Self {
            time: entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            actor: entry
                .actor_name
                .clone()
                .unwrap_or_else(|| entry.actor_id.to_string()),
            action: entry.action.to_string(),
            entity: entry.entity_type.to_string(),
            entity_id: entry
                .entity_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Execute audit commands
pub async fn execute(
    args: &AuditArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = super::open_stores(&config).await?;

    match &args.command {
        AuditCommand::Search {
            action,
            entity,
            actor,
            limit,
        } => {
            let filter = AuditFilter {
                actor_id: *actor,
                action: *action,
                entity_type: *entity,
                ..AuditFilter::default()
            };
            let response = stores
                .audit
                .search(&filter, &PageRequest::new(1, *limit))
                .await?;
            let rows: Vec<AuditRow> = response.items.iter().map(AuditRow::from).collect();
            output::print_list(&rows, format);
        }
        AuditCommand::Export {
            output: out_path,
            days,
        } => {
            let filter = AuditFilter {
                from: Some(Utc::now() - Duration::days(*days)),
                ..AuditFilter::default()
            };

            let mut entries = Vec::new();
            let mut page = PageRequest::new(1, EXPORT_PAGE_SIZE);
            loop {
                let response = stores.audit.search(&filter, &page).await?;
                let last = page.page >= response.total_pages;
                entries.extend(response.items);
                if last {
                    break;
                }
                page = PageRequest::new(page.page + 1, EXPORT_PAGE_SIZE);
            }

            let json = serde_json::to_string_pretty(&entries)?;
            tokio::fs::write(out_path, json)
                .await
                .map_err(|e| AppError::internal(format!("Failed to write file: {e}")))?;

            output::print_success(&format!(
                "Exported {} audit entries to '{}'",
                entries.len(),
                out_path
            ));
        }
    }

    Ok(())
}
