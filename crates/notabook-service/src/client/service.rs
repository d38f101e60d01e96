//! Client CRUD with best-effort auditing.

use std::sync::Arc;

use tracing::info;

use notabook_auth::{Capability, PermissionEvaluator};
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{ClientId, PageRequest, PageResponse};
use notabook_database::ClientStore;
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::client::{Client, ClientInput};
use notabook_entity::session::SessionIdentity;

use crate::audit::AuditLogger;
use crate::validation::{optional_text, required_email, required_text};

/// Manages billed clients.
#[derive(Debug, Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
    audit: AuditLogger,
    evaluator: PermissionEvaluator,
}

impl ClientService {
    /// Creates a new client service.
    pub fn new(clients: Arc<dyn ClientStore>, audit: AuditLogger) -> Self {
        Self {
            clients,
            audit,
            evaluator: PermissionEvaluator::new(),
        }
    }

    /// Register a client. Email must be unique.
    pub async fn create_client(
        &self,
        identity: &SessionIdentity,
        input: &ClientInput,
    ) -> AppResult<Client> {
        self.evaluator.require(identity, Capability::CreateNotes)?;
        let input = normalize(input)?;
        let client = self.clients.create(&input).await?;

        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::Create,
                EntityType::Client,
                Some(client.id.into()),
            )
            .await;
        info!(client_id = %client.id, user_id = %identity.user_id, "Client created");
        Ok(client)
    }

    /// Replace a client's writable fields.
    pub async fn update_client(
        &self,
        identity: &SessionIdentity,
        id: ClientId,
        input: &ClientInput,
    ) -> AppResult<Client> {
        self.evaluator.require(identity, Capability::CreateNotes)?;
        let input = normalize(input)?;
        let client = self.clients.update(id, &input).await?;

        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::Update,
                EntityType::Client,
                Some(id.into()),
            )
            .await;
        info!(client_id = %id, user_id = %identity.user_id, "Client updated");
        Ok(client)
    }

    /// Delete a client that has no notes. Admin only.
    pub async fn delete_client(&self, identity: &SessionIdentity, id: ClientId) -> AppResult<()> {
        self.evaluator.require(identity, Capability::DeleteRecords)?;
        self.clients.delete(id).await?;

        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::Delete,
                EntityType::Client,
                Some(id.into()),
            )
            .await;
        info!(client_id = %id, user_id = %identity.user_id, "Client deleted");
        Ok(())
    }

    /// Fetch one client.
    pub async fn get_client(&self, id: ClientId) -> AppResult<Client> {
        self.clients.find_by_id(id).await?.or_not_found("Client")
    }

    /// Clients by name, optionally filtered by name, email or RFC.
    pub async fn list_clients(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Client>> {
        let search = optional_text(search);
        self.clients.list(search.as_deref(), page).await
    }
}

fn normalize(input: &ClientInput) -> AppResult<ClientInput> {
    Ok(ClientInput {
        name: required_text(&input.name, "Name")?,
        email: required_email(&input.email)?,
        phone: optional_text(input.phone.as_deref()),
        address: optional_text(input.address.as_deref()),
        rfc: optional_text(input.rfc.as_deref()).map(|rfc| rfc.to_uppercase()),
        logo_path: optional_text(input.logo_path.as_deref()),
    })
}
