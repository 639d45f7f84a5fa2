/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: tokens: TokenService, users: UserStore, mailer: EmailDispatcher など
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{
    auth::{PasswordHasher, TokenService},
    mailer::EmailDispatcher,
    users::UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub mailer: Arc<dyn EmailDispatcher>,
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenService>,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn EmailDispatcher>,
    ) -> Self {
        Self {
            tokens,
            users,
            hasher,
            mailer,
        }
    }
}
