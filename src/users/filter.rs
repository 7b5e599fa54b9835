//! Structural candidate predicates.
//!
//! A [`CandidateFilter`] is a conjunction of [`Predicate`]s. Directories
//! translate it into their own query form; values are never spliced into
//! query text.

use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::User;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Candidate's normalized interests contain any of these (already normalized) tags.
    SharesInterest(Vec<String>),
    /// Candidate is not this user.
    Excludes(Uuid),
    /// Candidate's country equals this value exactly.
    Country(String),
    /// Candidate's birthday lies in `[from, to]`, both ends inclusive.
    BornWithin {
        from: OffsetDateTime,
        to: OffsetDateTime,
    },
}

impl Predicate {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Predicate::SharesInterest(tags) => user.interests.shares_any(tags),
            Predicate::Excludes(id) => user.id != *id,
            Predicate::Country(country) => user.country == *country,
            Predicate::BornWithin { from, to } => *from <= user.birthday && user.birthday <= *to,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    predicates: Vec<Predicate>,
}

impl CandidateFilter {
    /// A filter that matches every user.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, user: &User) -> bool {
        self.predicates.iter().all(|p| p.matches(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::Interests;
    use time::{macros::datetime, Duration};

    fn user(country: &str, birthday: OffsetDateTime, tags: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            first_name: "Some".into(),
            last_name: "One".into(),
            image_url: String::new(),
            country: country.into(),
            gender: String::new(),
            about_me: String::new(),
            birthday,
            interests: Interests::new(tags.iter().map(|t| t.to_string()).collect()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_filter_matches_everyone() {
        let u = user("NL", datetime!(1990-01-01 00:00 UTC), &[]);
        assert!(CandidateFilter::any().matches(&u));
    }

    #[test]
    fn birth_window_is_inclusive_at_both_ends() {
        let center = datetime!(1990-06-01 12:00 UTC);
        let radius = Duration::milliseconds(10 * 365 * 86_400_000);
        let filter = CandidateFilter::any().and(Predicate::BornWithin {
            from: center - radius,
            to: center + radius,
        });

        assert!(filter.matches(&user("NL", center - radius, &[])));
        assert!(filter.matches(&user("NL", center + radius, &[])));
        assert!(!filter.matches(&user("NL", center - radius - Duration::milliseconds(1), &[])));
        assert!(!filter.matches(&user("NL", center + radius + Duration::milliseconds(1), &[])));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let u = user("NL", datetime!(1990-01-01 00:00 UTC), &["Music"]);
        let matching = CandidateFilter::any()
            .and(Predicate::SharesInterest(vec!["MUSIC".into()]))
            .and(Predicate::Country("NL".into()));
        let wrong_country = matching.clone().and(Predicate::Country("BE".into()));

        assert!(matching.matches(&u));
        assert!(!wrong_country.matches(&u));
        assert!(!CandidateFilter::any().and(Predicate::Excludes(u.id)).matches(&u));
    }

    #[test]
    fn country_match_is_exact() {
        let u = user("Netherlands", datetime!(1990-01-01 00:00 UTC), &[]);
        assert!(!CandidateFilter::any()
            .and(Predicate::Country("netherlands".into()))
            .matches(&u));
    }
}
