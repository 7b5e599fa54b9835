use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub id: Uuid,       // user ID
    pub email: String,  // user email at mint time
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
}

/// The authenticated caller, as asserted by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for CallerIdentity {
    fn from(c: Claims) -> Self {
        Self {
            id: c.id,
            email: c.email,
        }
    }
}
