/*
 * Responsibility
 * - register / verify-email / resend-verification / forget-password の request/response DTO
 * - validation (形式チェック) は validate() に持たせる
 */
use serde::{Deserialize, Serialize};

/// Trim + lowercase, the form emails are stored under.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("email is required");
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("email is invalid"),
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)?;
        if self.password.trim().chars().count() < MIN_PASSWORD_LEN {
            return Err("password must be at least 6 characters");
        }
        if self.role.trim().is_empty() {
            return Err("role is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
}

impl VerifyEmailRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)?;
        if self.code.trim().is_empty() {
            return Err("code is required");
        }
        Ok(())
    }
}

/// Body of `/resend-verification` and `/forget-password`.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

impl EmailRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    #[test]
    fn register_requires_role() {
        assert_eq!(
            register("a@example.com", "secret1", " ").validate(),
            Err("role is required")
        );
        assert!(register("a@example.com", "secret1", "organizer").validate().is_ok());
    }

    #[test]
    fn register_rejects_short_password_and_bad_email() {
        assert!(register("a@example.com", "12345", "user").validate().is_err());
        assert!(register("not-an-email", "secret1", "user").validate().is_err());
        assert!(register("@example.com", "secret1", "user").validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_then_fail_validation() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@example.com"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
