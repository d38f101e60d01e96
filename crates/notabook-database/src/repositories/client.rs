//! Client repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notabook_core::error::AppError;
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{ClientId, PageRequest, PageResponse};
use notabook_entity::client::{Client, ClientInput};

use super::{storage_error, violated_constraint};
use crate::filter::like_pattern;
use crate::traits::ClientStore;

/// Repository for clients and their share tokens.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    /// Create a new client repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match violated_constraint(&e) {
        Some("clients_email_key") => AppError::conflict("A client with this email already exists"),
        Some("clients_share_token_key") => AppError::conflict("Share token collision"),
        _ => storage_error(message)(e),
    }
}

#[async_trait]
impl ClientStore for ClientRepository {
    async fn find_by_id(&self, id: ClientId) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find client"))
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to resolve share token"))
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Client>> {
        let pattern = like_pattern(search);
        let where_clause = if pattern.is_some() {
            "WHERE name ILIKE $1 OR email ILIKE $1 OR rfc ILIKE $1"
        } else {
            ""
        };
        let (limit_idx, offset_idx) = if pattern.is_some() { (2, 3) } else { (1, 2) };

        let count_sql = format!("SELECT COUNT(*) FROM clients {where_clause}");
        let select_sql = format!(
            "SELECT * FROM clients {where_clause} ORDER BY name ASC, created_at ASC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Client>(&select_sql);
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern);
            select_query = select_query.bind(pattern);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count clients"))?;

        let clients = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list clients"))?;

        Ok(PageResponse::new(clients, page, total as u64))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list recent clients"))
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count clients"))
    }

    async fn create(&self, data: &ClientInput) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients (id, name, email, phone, address, rfc, logo_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(ClientId::new())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.rfc)
        .bind(&data.logo_path)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error("Failed to create client"))
    }

    async fn update(&self, id: ClientId, data: &ClientInput) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET name = $2, email = $3, phone = $4, address = $5, rfc = $6, \
                                logo_path = COALESCE($7, logo_path), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.rfc)
        .bind(&data.logo_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error("Failed to update client"))?
        .or_not_found("Client")
    }

    async fn delete(&self, id: ClientId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("notes_client_id_fkey") => {
                    AppError::conflict("Client has notes and cannot be deleted")
                }
                _ => storage_error("Failed to delete client")(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Client not found"));
        }
        Ok(())
    }

    async fn set_share_token(&self, id: ClientId, token: &str) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET share_token = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error("Failed to store share token"))?
        .or_not_found("Client")
    }
}
