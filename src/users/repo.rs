use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::filter::{CandidateFilter, Predicate};
use super::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for user records.
///
/// `find_candidates` returns at most `limit` users matching `filter`, in the
/// directory's retrieval order (ascending creation time, then id).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, DirectoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError>;
    async fn find_candidates(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<User>, DirectoryError>;
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, image_url, \
     country, gender, about_me, birthday, interested_in, created_at";

#[derive(Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Appends the `WHERE` clause for `filter` with every value bound as a parameter.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CandidateFilter) {
    qb.push(" WHERE TRUE");
    for predicate in filter.predicates() {
        match predicate {
            Predicate::SharesInterest(tags) => {
                qb.push(" AND interested_in_caps && ");
                qb.push_bind(tags.clone());
            }
            Predicate::Excludes(id) => {
                qb.push(" AND id <> ");
                qb.push_bind(*id);
            }
            Predicate::Country(country) => {
                qb.push(" AND country = ");
                qb.push_bind(country.clone());
            }
            Predicate::BornWithin { from, to } => {
                qb.push(" AND birthday BETWEEN ");
                qb.push_bind(*from);
                qb.push(" AND ");
                qb.push_bind(*to);
            }
        }
    }
}

/// Full candidate query: filter, then oldest accounts first with `id` breaking ties.
fn candidate_query(filter: &CandidateFilter, limit: usize) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY created_at, id LIMIT ");
    qb.push_bind(limit as i64);
    qb
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        let id = Uuid::new_v4();
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, image_url,
                               country, gender, about_me, birthday,
                               interested_in, interested_in_caps)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.image_url)
        .bind(&user.country)
        .bind(&user.gender)
        .bind(&user.about_me)
        .bind(user.birthday)
        .bind(user.interests.tags())
        .bind(user.interests.normalized())
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DirectoryError::DuplicateEmail
            }
            other => DirectoryError::Database(other),
        })?;
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_candidates(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<User>, DirectoryError> {
        let mut qb = candidate_query(filter, limit);
        let rows = qb.build_query_as::<User>().fetch_all(&self.db).await?;
        debug!(predicates = filter.predicates().len(), found = rows.len(), "candidate query");
        Ok(rows)
    }
}
