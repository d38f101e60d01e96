//! CLI command definitions and dispatch.

pub mod audit;
pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use notabook_core::config::AppConfig;
use notabook_core::error::AppError;
use notabook_database::Stores;

use crate::output::{self, OutputFormat};

/// Notabook: sales notes, clients and share links
#[derive(Debug, Parser)]
#[command(name = "notabook", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Notabook server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Staff user management
    User(user::UserArgs),
    /// Audit log
    Audit(audit::AuditArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::User(args) => user::execute(args, &self.config, self.format).await,
            Commands::Audit(args) => audit::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: open the configured stores
pub async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    if config.database.provider == notabook_core::config::StoreProvider::Memory {
        output::print_warning("database.provider is \"memory\"; changes will not persist");
    }
    Stores::connect(&config.database).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use notabook_entity::audit::AuditAction;
    use notabook_entity::user::UserRole;

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "notabook",
            "user",
            "create",
            "--name",
            "Admin",
            "--email",
            "admin@example.com",
            "--role",
            "secretario",
        ])
        .unwrap();
        match cli.command {
            Commands::User(user::UserArgs {
                command: user::UserCommand::Create { role, password, .. },
            }) => {
                assert_eq!(role, UserRole::Secretary);
                assert!(password.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_audit_search() {
        let cli = Cli::try_parse_from([
            "notabook", "-f", "json", "audit", "search", "-a", "mark_paid",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Audit(audit::AuditArgs {
                command: audit::AuditCommand::Search { action, limit, .. },
            }) => {
                assert_eq!(action, Some(AuditAction::MarkPaid));
                assert_eq!(limit, 50);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(
            Cli::try_parse_from(["notabook", "user", "create", "--role", "viewer"]).is_err()
        );
    }
}
