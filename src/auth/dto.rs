use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::claims::CallerIdentity;
use crate::{time_utils::TimestampInput, users::User};

/// Request body for `/check_registration`.
#[derive(Debug, Deserialize)]
pub struct CheckRegistrationRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CheckRegistrationResponse {
    pub user_exists: bool,
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub interested_in: Vec<String>,
    pub birthday: TimestampInput,
    #[serde(default)]
    pub about_me: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub data: Profile,
    pub token: String,
}

/// The owner's view of their own record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub country: String,
    pub gender: String,
    pub interested_in: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub birthday: OffsetDateTime,
    pub about_me: String,
}

impl From<&User> for Profile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            image_url: u.image_url.clone(),
            country: u.country.clone(),
            gender: u.gender.clone(),
            interested_in: u.interests.tags().to_vec(),
            birthday: u.birthday,
            about_me: u.about_me.clone(),
        }
    }
}

/// Response of `/test`: the decoded session payload.
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub unique_data: CallerIdentity,
}
