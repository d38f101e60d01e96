//! Staff user management commands.
//!
//! These act directly on the store, bypassing the session layer, so they
//! are the way to bootstrap the first administrator.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notabook_auth::{PasswordHasher, PasswordValidator};
use notabook_core::error::AppError;
use notabook_core::result::OptionExt;
use notabook_core::types::PageRequest;
use notabook_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user (prompts for anything not given)
    #[command(alias = "create-admin")]
    Create {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Login email
        #[arg(short, long)]
        email: Option<String>,
        /// Role: admin or secretary
        #[arg(short, long, default_value = "admin")]
        role: UserRole,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// List users
    List {
        /// Page number
        #[arg(long, default_value = "1")]
        page: u64,
        /// Users per page
        #[arg(long, default_value = "50")]
        per_page: u64,
    },
    /// Reset a user's password
    ResetPassword {
        /// Login email of the user
        #[arg(short, long)]
        email: String,
        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Allow a user to log in again
    Activate {
        /// Login email of the user
        #[arg(short, long)]
        email: String,
    },
    /// Block new logins for a user
    Deactivate {
        /// Login email of the user
        #[arg(short, long)]
        email: String,
    },
}

/// User display row
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// ID
    id: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Active
    active: bool,
    /// Created
    created: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            active: user.active,
            created: user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = super::open_stores(&config).await?;
    let validator = PasswordValidator::new(&config.auth);
    let hasher = PasswordHasher::new();

    match &args.command {
        UserCommand::Create {
            name,
            email,
            role,
            password,
        } => {
            let name = match name {
                Some(n) => n.clone(),
                None => prompt_text("Display name")?,
            };
            let email = match email {
                Some(e) => e.clone(),
                None => prompt_text("Email")?,
            };
            let password = match password {
                Some(p) => p.clone(),
                None => prompt_password("Password")?,
            };
            validator.validate(&password)?;

            if stores.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict(format!("User '{email}' already exists")));
            }

            let user = stores
                .users
                .create(&CreateUser {
                    name: name.trim().to_string(),
                    email: email.trim().to_lowercase(),
                    password_hash: hasher.hash_password(&password)?,
                    role: *role,
                    active: true,
                })
                .await?;

            output::print_success(&format!("User '{}' created", user.email));
            output::print_kv("ID", &user.id.to_string());
            output::print_kv("Role", user.role.as_str());
        }
        UserCommand::List { page, per_page } => {
            let response = stores
                .users
                .list(&PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<UserRow> = response.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::ResetPassword { email, password } => {
            let user = find_user(&stores, email).await?;
            let password = match password {
                Some(p) => p.clone(),
                None => prompt_password("New password")?,
            };
            validator.validate(&password)?;

            stores
                .users
                .update(&UpdateUser {
                    id: user.id,
                    name: user.name,
                    email: user.email.clone(),
                    role: user.role,
                    active: user.active,
                    password_hash: Some(hasher.hash_password(&password)?),
                })
                .await?;
            output::print_success(&format!("Password reset for '{}'", user.email));
        }
        UserCommand::Activate { email } => {
            let user = find_user(&stores, email).await?;
            stores.users.set_active(user.id, true).await?;
            output::print_success(&format!("User '{}' activated", user.email));
        }
        UserCommand::Deactivate { email } => {
            let user = find_user(&stores, email).await?;
            stores.users.set_active(user.id, false).await?;
            output::print_success(&format!("User '{}' deactivated", user.email));
        }
    }

    Ok(())
}

async fn find_user(stores: &notabook_database::Stores, email: &str) -> Result<User, AppError> {
    stores
        .users
        .find_by_email(email)
        .await?
        .or_not_found("User")
}

fn prompt_text(prompt: &str) -> Result<String, AppError> {
    dialoguer::Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

fn prompt_password(prompt: &str) -> Result<String, AppError> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
