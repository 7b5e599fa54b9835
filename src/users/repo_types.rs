use sqlx::{postgres::PgRow, FromRow, Row};
use time::OffsetDateTime;
use uuid::Uuid;

/// A user's interest tags together with their upper-cased matching index.
///
/// The index is derived on construction and cannot be mutated on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Interests {
    tags: Vec<String>,
    normalized: Vec<String>,
}

impl Interests {
    pub fn new(tags: Vec<String>) -> Self {
        let normalized = tags.iter().map(|t| normalize_tag(t)).collect();
        Self { tags, normalized }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    pub fn shares_any(&self, normalized_wanted: &[String]) -> bool {
        self.normalized.iter().any(|t| normalized_wanted.contains(t))
    }
}

pub fn normalize_tag(tag: &str) -> String {
    tag.to_uppercase()
}

/// User record in the directory.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String, // argon2 PHC string, never serialized
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub country: String,
    pub gender: String,
    pub about_me: String,
    pub birthday: OffsetDateTime,
    pub interests: Interests,
    pub created_at: OffsetDateTime,
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            image_url: row.try_get("image_url")?,
            country: row.try_get("country")?,
            gender: row.try_get("gender")?,
            about_me: row.try_get("about_me")?,
            birthday: row.try_get("birthday")?,
            interests: Interests::new(row.try_get("interested_in")?),
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Fields needed to create a user; the directory assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub country: String,
    pub gender: String,
    pub about_me: String,
    pub birthday: OffsetDateTime,
    pub interests: Interests,
}

impl NewUser {
    pub(crate) fn into_user(self, id: Uuid, created_at: OffsetDateTime) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            image_url: self.image_url,
            country: self.country,
            gender: self.gender,
            about_me: self.about_me,
            birthday: self.birthday,
            interests: self.interests,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_index_is_uppercased_tags() {
        let interests = Interests::new(vec!["Music".into(), "Art".into()]);
        assert_eq!(interests.tags(), ["Music", "Art"]);
        assert_eq!(interests.normalized(), ["MUSIC", "ART"]);
    }

    #[test]
    fn shares_any_is_an_or_across_tags() {
        let interests = Interests::new(vec!["Hiking".into(), "chess".into()]);
        assert!(interests.shares_any(&["CHESS".into(), "GO".into()]));
        assert!(!interests.shares_any(&["GO".into()]));
        assert!(!interests.shares_any(&[]));
    }

    #[test]
    fn normalization_handles_non_ascii() {
        let interests = Interests::new(vec!["straße".into(), "émigré".into()]);
        assert_eq!(interests.normalized(), ["STRASSE", "ÉMIGRÉ"]);
    }
}
