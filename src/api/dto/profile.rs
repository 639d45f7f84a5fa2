/*
 * Responsibility
 * - /user/profile, /user/enter_data の request/response DTO
 * - password hash / verification code は response に含めない
 */
use serde::{Deserialize, Serialize};

use crate::services::users::{Gender, UserProfile, UserRecord};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_dob: Option<String>,
}

impl From<UserRecord> for ProfileResponse {
    fn from(user: UserRecord) -> Self {
        let UserProfile {
            phone_number,
            name,
            gender,
            city,
            child_dob,
        } = user.profile;

        Self {
            user_id: user.uid,
            email: user.email,
            email_verified: user.email_verified,
            role: user.role,
            phone_number,
            name,
            gender,
            city,
            child_dob,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EnterDataRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub name: String,
    // 'male', 'female', 'others'
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub child_dob: String,
}

impl EnterDataRequest {
    /// Validate and convert into the stored profile shape.
    ///
    /// Blank optional fields are stored as absent.
    pub fn into_profile(self) -> Result<UserProfile, &'static str> {
        let gender: Gender = self.gender.parse().map_err(|_| "Invalid gender option")?;

        let phone_number = self.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err("phone_number is required");
        }

        Ok(UserProfile {
            phone_number: Some(phone_number),
            name: non_blank(self.name),
            gender: Some(gender),
            city: non_blank(self.city),
            child_dob: non_blank(self.child_dob),
        })
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
