//! Outbound account emails (verification, password reset).
//!
//! Delivery is a collaborator concern; handlers only see `EmailDispatcher`.
use async_trait::async_trait;
use thiserror::Error;

pub mod log;

pub use log::LogEmailDispatcher;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    // Deliver the code the user must present to `/verify-email`.
    async fn send_verification(&self, email: &str, code: &str) -> Result<(), DispatchError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), DispatchError>;
}
