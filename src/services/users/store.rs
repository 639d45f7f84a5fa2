//! User store interface used by the account handlers (register, login, profile).
use std::{fmt, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,
    #[error("user already exists")]
    AlreadyExists,
    #[error("phone number belongs to another user")]
    PhoneTaken,
    #[error("user store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "others" => Ok(Self::Others),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Others => "others",
        };
        f.write_str(s)
    }
}

/// Optional details a user fills in after signing up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub city: Option<String>,
    pub child_dob: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub role: String,
    pub password_hash: String,
    // Stored together with the account so it never exists without one.
    pub verification_code: String,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
    pub password_hash: String,
    pub profile: UserProfile,
    // Last code mailed to the user; kept after verification.
    pub verification_code: Option<String>,
}

/// Backing store for user accounts.
///
/// Emails are expected to be normalized (trimmed, lowercase) by the caller.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns `AlreadyExists` when the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn get(&self, uid: &str) -> StoreResult<Option<UserRecord>>;

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Replace the profile of `uid`.
    ///
    /// Returns `PhoneTaken` when another user already holds the phone number;
    /// the check and the write happen atomically.
    async fn update_profile(&self, uid: &str, profile: UserProfile) -> StoreResult<()>;

    async fn set_verification_code(&self, uid: &str, code: &str) -> StoreResult<()>;

    async fn mark_email_verified(&self, uid: &str) -> StoreResult<()>;

    async fn delete(&self, uid: &str) -> StoreResult<()>;
}
