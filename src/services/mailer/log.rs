use async_trait::async_trait;
use tracing::{debug, info};

use crate::services::mailer::{DispatchError, EmailDispatcher};

/// Development dispatcher: "sends" mail by writing it to the log.
///
/// The verification code is a credential, so it only shows up at `debug`.
#[derive(Debug, Clone, Default)]
pub struct LogEmailDispatcher;

impl LogEmailDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailDispatcher for LogEmailDispatcher {
    async fn send_verification(&self, email: &str, code: &str) -> Result<(), DispatchError> {
        info!(to = %email, "verification email");
        debug!(to = %email, code = %code, "verification code");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), DispatchError> {
        info!(to = %email, "password reset email");
        Ok(())
    }
}
