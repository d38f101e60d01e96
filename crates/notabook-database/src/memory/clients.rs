use async_trait::async_trait;
use chrono::Utc;

use notabook_core::error::AppError;
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{ClientId, PageRequest, PageResponse};
use notabook_entity::client::{Client, ClientInput};

use super::{MemoryStore, State};
use crate::filter::contains_ci;
use crate::traits::ClientStore;

fn check_unique(state: &State, email: &str, except: Option<ClientId>) -> AppResult<()> {
    let taken = state
        .clients
        .iter()
        .any(|c| Some(c.id) != except && c.email.eq_ignore_ascii_case(email.trim()));
    if taken {
        return Err(AppError::conflict("A client with this email already exists"));
    }
    Ok(())
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn find_by_id(&self, id: ClientId) -> AppResult<Option<Client>> {
        let state = self.lock().await?;
        Ok(state.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<Client>> {
        let state = self.lock().await?;
        Ok(state
            .clients
            .iter()
            .find(|c| c.share_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Client>> {
        let state = self.lock().await?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let mut clients: Vec<Client> = state
            .clients
            .iter()
            .filter(|c| {
                search.is_none_or(|term| {
                    contains_ci(&c.name, term)
                        || contains_ci(&c.email, term)
                        || c.rfc.as_deref().is_some_and(|rfc| contains_ci(rfc, term))
                })
            })
            .cloned()
            .collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(PageResponse::from_all(clients, page))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Client>> {
        let state = self.lock().await?;
        let mut clients: Vec<Client> = state.clients.iter().rev().cloned().collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        clients.truncate(limit as usize);
        Ok(clients)
    }

    async fn count(&self) -> AppResult<i64> {
        let state = self.lock().await?;
        Ok(state.clients.len() as i64)
    }

    async fn create(&self, data: &ClientInput) -> AppResult<Client> {
        let mut state = self.lock().await?;
        check_unique(&state, &data.email, None)?;
        let now = Utc::now();
        let client = Client {
            id: ClientId::new(),
            name: data.name.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            address: data.address.clone(),
            rfc: data.rfc.clone(),
            logo_path: data.logo_path.clone(),
            share_token: None,
            created_at: now,
            updated_at: now,
        };
        state.clients.push(client.clone());
        Ok(client)
    }

    async fn update(&self, id: ClientId, data: &ClientInput) -> AppResult<Client> {
        let mut state = self.lock().await?;
        check_unique(&state, &data.email, Some(id))?;
        let client = state
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .or_not_found("Client")?;
        client.name = data.name.clone();
        client.email = data.email.clone();
        client.phone = data.phone.clone();
        client.address = data.address.clone();
        client.rfc = data.rfc.clone();
        if data.logo_path.is_some() {
            client.logo_path = data.logo_path.clone();
        }
        client.updated_at = Utc::now();
        Ok(client.clone())
    }

    async fn delete(&self, id: ClientId) -> AppResult<()> {
        let mut state = self.lock().await?;
        let position = state
            .clients
            .iter()
            .position(|c| c.id == id)
            .or_not_found("Client")?;
        if state.notes.iter().any(|n| n.client_id == id) {
            return Err(AppError::conflict("Client has notes and cannot be deleted"));
        }
        state.clients.remove(position);
        Ok(())
    }

    async fn set_share_token(&self, id: ClientId, token: &str) -> AppResult<Client> {
        let mut state = self.lock().await?;
        if state
            .clients
            .iter()
            .any(|c| c.id != id && c.share_token.as_deref() == Some(token))
        {
            return Err(AppError::conflict("Share token collision"));
        }
        let client = state
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .or_not_found("Client")?;
        client.share_token = Some(token.to_string());
        client.updated_at = Utc::now();
        Ok(client.clone())
    }
}
