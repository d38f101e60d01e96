//! Share token issuance and token-scoped reads.
//!
//! Public reads never consult the permission evaluator; the token is the
//! only credential. Unknown tokens, malformed tokens, notes of another
//! client and missing notes all fail with the same `InvalidToken` error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use notabook_auth::{Capability, PermissionEvaluator, ShareTokenGenerator};
use notabook_core::config::ShareConfig;
use notabook_core::error::{AppError, ErrorKind};
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{ClientId, NoteId, PageRequest};
use notabook_database::filter::NoteFilter;
use notabook_database::{ClientStore, NoteStore};
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::client::Client;
use notabook_entity::note::{NoteDetail, NoteSummary};
use notabook_entity::session::SessionIdentity;

use crate::audit::AuditLogger;
use crate::note::service::load_detail;
use crate::render::{DocumentRenderer, RenderedDocument};

/// Attempts before giving up on a colliding token.
const ISSUE_ATTEMPTS: usize = 3;
/// Page size used when collecting every note of a client.
const SCAN_PAGE_SIZE: u64 = 100;

/// A freshly minted token and the public link built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedShareToken {
    /// The opaque token.
    pub token: String,
    /// Public URL listing the client's notes (the QR code target).
    pub url: String,
}

/// What a token holder sees: the client without its token, and its notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicNotes {
    /// The client the token is bound to.
    pub client: Client,
    /// Every note of that client, newest first.
    pub notes: Vec<NoteSummary>,
}

/// Issues share tokens and serves token-scoped reads.
#[derive(Debug, Clone)]
pub struct ShareTokenService {
    clients: Arc<dyn ClientStore>,
    notes: Arc<dyn NoteStore>,
    audit: AuditLogger,
    config: ShareConfig,
    generator: ShareTokenGenerator,
    evaluator: PermissionEvaluator,
}

impl ShareTokenService {
    /// Creates a new share token service.
    pub fn new(
        clients: Arc<dyn ClientStore>,
        notes: Arc<dyn NoteStore>,
        audit: AuditLogger,
        config: ShareConfig,
    ) -> Self {
        Self {
            clients,
            notes,
            audit,
            config,
            generator: ShareTokenGenerator::new(),
            evaluator: PermissionEvaluator::new(),
        }
    }

    /// Mint a new token for a client, replacing any previous one.
    pub async fn issue_token(
        &self,
        identity: &SessionIdentity,
        client_id: ClientId,
    ) -> AppResult<IssuedShareToken> {
        self.evaluator.require(identity, Capability::GenerateQr)?;
        self.clients
            .find_by_id(client_id)
            .await?
            .or_not_found("Client")?;

        let token = self.store_fresh_token(client_id).await?;
        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::GenerateQr,
                EntityType::Client,
                Some(client_id.into()),
            )
            .await;

        info!(client_id = %client_id, user_id = %identity.user_id, "Share token issued");
        Ok(IssuedShareToken {
            url: self.config.public_url(&token),
            token,
        })
    }

    async fn store_fresh_token(&self, client_id: ClientId) -> AppResult<String> {
        for attempt in 1..=ISSUE_ATTEMPTS {
            let token = self.generator.generate();
            match self.clients.set_share_token(client_id, &token).await {
                Ok(_) => return Ok(token),
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(client_id = %client_id, attempt, "Share token collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("Could not issue a unique share token"))
    }

    /// The client a token is bound to.
    pub async fn resolve_client(&self, token: &str) -> AppResult<Client> {
        if !ShareTokenGenerator::is_well_formed(token) {
            debug!("Rejected malformed share token");
            return Err(AppError::invalid_token());
        }
        self.clients
            .find_by_share_token(token)
            .await?
            .ok_or_else(AppError::invalid_token)
    }

    /// Every note of one client, newest first.
    pub async fn list_notes(&self, client_id: ClientId) -> AppResult<Vec<NoteSummary>> {
        let filter = NoteFilter::for_client(client_id);
        let mut page = PageRequest::new(1, SCAN_PAGE_SIZE);
        let mut notes = Vec::new();
        loop {
            let batch = self.notes.list(&filter, &page).await?;
            let more = batch.has_next();
            notes.extend(batch.items);
            if !more {
                return Ok(notes);
            }
            page = PageRequest::new(page.page + 1, SCAN_PAGE_SIZE);
        }
    }

    /// A note with its line items, only if it belongs to the token's client.
    pub async fn get_note(&self, token: &str, note_id: NoteId) -> AppResult<NoteDetail> {
        let client = self.resolve_client(token).await?;
        let detail = load_detail(self.notes.as_ref(), self.clients.as_ref(), note_id)
            .await?
            .filter(|d| d.note.client_id == client.id)
            .ok_or_else(AppError::invalid_token)?;
        Ok(NoteDetail {
            client: detail.client.without_token(),
            ..detail
        })
    }

    /// The public listing page: the client and all of its notes.
    pub async fn public_notes(&self, token: &str) -> AppResult<PublicNotes> {
        let client = self.resolve_client(token).await?;
        let notes = self.list_notes(client.id).await?;
        Ok(PublicNotes {
            client: client.without_token(),
            notes,
        })
    }

    /// Render one of the token client's notes.
    pub async fn public_document(
        &self,
        token: &str,
        note_id: NoteId,
        renderer: &dyn DocumentRenderer,
    ) -> AppResult<RenderedDocument> {
        let detail = self.get_note(token, note_id).await?;
        renderer.render(&detail)
    }
}
