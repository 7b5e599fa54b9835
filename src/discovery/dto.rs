use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{time_utils::TimestampInput, users::User};

/// Body of a discovery request. Every field is optional here so that a missing
/// field is reported as an invalid request rather than a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequest {
    pub interested_in: Option<Vec<String>>,
    pub country: Option<String>,
    pub birthday: Option<TimestampInput>,
}

/// Public projection of a user shown to other users.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: Uuid,
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

impl From<User> for Candidate {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            image_url: u.image_url,
            country: u.country,
            gender: u.gender,
            interested_in: u.interests.tags().to_vec(),
            birthday: u.birthday,
            about_me: u.about_me,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub data: Vec<Candidate>,
}
