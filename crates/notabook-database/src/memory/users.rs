use async_trait::async_trait;
use chrono::Utc;

use notabook_core::error::AppError;
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{PageRequest, PageResponse, UserId};
use notabook_entity::user::{CreateUser, UpdateUser, User};

use super::{MemoryStore, State};
use crate::traits::UserStore;

fn email_taken(state: &State, email: &str, except: Option<UserId>) -> bool {
    state
        .users
        .iter()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email.trim()))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let state = self.lock().await?;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.lock().await?;
        Ok(state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let state = self.lock().await?;
        let mut users: Vec<User> = state.users.iter().rev().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(PageResponse::from_all(users, page))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.lock().await?;
        if email_taken(&state, &data.email, None) {
            return Err(AppError::conflict("Email already in use"));
        }
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            active: data.active,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        let mut state = self.lock().await?;
        if email_taken(&state, &data.email, Some(data.id)) {
            return Err(AppError::conflict("Email already in use"));
        }
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == data.id)
            .or_not_found("User")?;
        user.name = data.name.clone();
        user.email = data.email.clone();
        user.role = data.role;
        user.active = data.active;
        if let Some(hash) = &data.password_hash {
            user.password_hash = hash.clone();
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_active(&self, id: UserId, active: bool) -> AppResult<User> {
        let mut state = self.lock().await?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .or_not_found("User")?;
        user.active = active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
