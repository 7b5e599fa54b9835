//! Cascading candidate search.
//!
//! Filters run from most to least specific. The first one that fills a page
//! wins; if none does, the last one's result is returned. Results from
//! different levels are never merged.

use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::dto::{Candidate, DiscoveryRequest};
use crate::{
    auth::CallerIdentity,
    error::AppError,
    users::{
        filter::Predicate, repo_types::normalize_tag, CandidateFilter, DirectoryError,
        UserDirectory,
    },
};

pub const PAGE_SIZE: usize = 30;

/// Ten years of 365 days, in milliseconds. Leap days are ignored.
pub const AGE_RADIUS_MS: i64 = 10 * 365 * 86_400_000;

pub const MAX_INTERESTS: usize = 100;

/// A validated discovery request.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryQuery {
    interests: Vec<String>,
    country: String,
    born_from: OffsetDateTime,
    born_to: OffsetDateTime,
}

impl DiscoveryQuery {
    fn age_window(&self) -> Predicate {
        Predicate::BornWithin {
            from: self.born_from,
            to: self.born_to,
        }
    }
}

impl TryFrom<DiscoveryRequest> for DiscoveryQuery {
    type Error = AppError;

    fn try_from(req: DiscoveryRequest) -> Result<Self, Self::Error> {
        let tags = req
            .interested_in
            .ok_or_else(|| AppError::InvalidRequest("interestedIn is required".into()))?;
        if tags.is_empty() {
            return Err(AppError::InvalidRequest("interestedIn must not be empty".into()));
        }
        if tags.len() > MAX_INTERESTS {
            return Err(AppError::InvalidRequest(format!(
                "interestedIn accepts at most {MAX_INTERESTS} tags"
            )));
        }
        if tags.iter().any(|t| t.trim().is_empty()) {
            return Err(AppError::InvalidRequest("interestedIn contains a blank tag".into()));
        }

        let country = req
            .country
            .ok_or_else(|| AppError::InvalidRequest("country is required".into()))?;

        let birthday = req
            .birthday
            .ok_or_else(|| AppError::InvalidRequest("birthday is required".into()))?
            .to_birthday()
            .ok_or_else(|| AppError::InvalidRequest("birthday is not a valid timestamp".into()))?;

        let radius = Duration::milliseconds(AGE_RADIUS_MS);
        let (Some(born_from), Some(born_to)) =
            (birthday.checked_sub(radius), birthday.checked_add(radius))
        else {
            return Err(AppError::InvalidRequest("birthday is out of range".into()));
        };

        Ok(Self {
            interests: tags.iter().map(|t| normalize_tag(t)).collect(),
            country,
            born_from,
            born_to,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    Strict,
    CountryRelaxed,
    Unfiltered,
}

/// The ordered filters tried for `caller`, most specific first.
pub fn cascade(caller: Uuid, query: &DiscoveryQuery) -> [(MatchLevel, CandidateFilter); 3] {
    let relaxed = CandidateFilter::any()
        .and(Predicate::SharesInterest(query.interests.clone()))
        .and(Predicate::Excludes(caller))
        .and(query.age_window());
    let strict = relaxed.clone().and(Predicate::Country(query.country.clone()));
    let unfiltered = CandidateFilter::any().and(Predicate::Excludes(caller));

    [
        (MatchLevel::Strict, strict),
        (MatchLevel::CountryRelaxed, relaxed),
        (MatchLevel::Unfiltered, unfiltered),
    ]
}

#[derive(Debug)]
pub struct CandidatePage {
    pub level: MatchLevel,
    pub candidates: Vec<Candidate>,
}

pub async fn discover(
    users: &dyn UserDirectory,
    caller: &CallerIdentity,
    query: &DiscoveryQuery,
) -> Result<CandidatePage, DirectoryError> {
    let mut page = CandidatePage {
        level: MatchLevel::Unfiltered,
        candidates: Vec::new(),
    };

    for (level, filter) in cascade(caller.id, query) {
        let mut found = users.find_candidates(&filter, PAGE_SIZE).await?;
        let full = found.len() >= PAGE_SIZE;
        found.truncate(PAGE_SIZE);
        debug!(user_id = %caller.id, ?level, found = found.len(), "cascade stage");

        page = CandidatePage {
            level,
            candidates: found.into_iter().map(Candidate::from).collect(),
        };
        if full {
            break;
        }
    }

    Ok(page)
}
