//! Post filters: a role-derived scope plus optional keyword and date criteria.
//!
//! Criteria combine with AND. The keyword alone is an OR over description and
//! location. Stores translate a [`PostFilter`] into their own query language;
//! [`PostFilter::matches`] is the reference evaluation.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;

/// Base visibility predicate applied before any user-supplied criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every post of one owner, whatever its moderation state.
    Owner(Uuid),
    /// Public posts an admin approved.
    PublicApproved,
    /// Public posts waiting for an admin.
    PublicPending,
}

impl Scope {
    pub fn admits(&self, post: &Post) -> bool {
        match self {
            Self::Owner(owner) => post.user_id == *owner,
            Self::PublicApproved => post.is_public && post.is_approved,
            Self::PublicPending => post.is_public && !post.is_approved,
        }
    }
}

/// Constraint on the day a post was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Same day of month and month, any year.
    DayMonth { day: u32, month: u32 },
    /// Creation year within `start..=end`.
    YearRange { start: i32, end: i32 },
}

impl DateFilter {
    pub fn day_month(day: u32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation("Month must be between 1 and 12"));
        }
        if !(1..=31).contains(&day) {
            return Err(DomainError::validation("Day must be between 1 and 31"));
        }
        Ok(Self::DayMonth { day, month })
    }

    pub fn year_range(start: i32, end: i32) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::validation(
                "Start year must not be after end year",
            ));
        }
        let filter = Self::YearRange { start, end };
        if filter.year_bounds().is_none() {
            return Err(DomainError::validation("Year out of supported range"));
        }
        Ok(filter)
    }

    /// First and last calendar day covered by a year range.
    pub fn year_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::YearRange { start, end } => Some((
                NaiveDate::from_ymd_opt(start, 1, 1)?,
                NaiveDate::from_ymd_opt(end, 12, 31)?,
            )),
            Self::DayMonth { .. } => None,
        }
    }

    pub fn admits(&self, created_on: NaiveDate) -> bool {
        match *self {
            Self::DayMonth { day, month } => created_on.day() == day && created_on.month() == month,
            Self::YearRange { start, end } => (start..=end).contains(&created_on.year()),
        }
    }
}

/// Complete listing predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    scope: Scope,
    keyword: Option<String>,
    date: Option<DateFilter>,
}

impl PostFilter {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            keyword: None,
            date: None,
        }
    }

    /// Add a keyword. `None` or an empty string adds no constraint.
    pub fn with_keyword(mut self, keyword: Option<&str>) -> Self {
        self.keyword = keyword.filter(|k| !k.is_empty()).map(str::to_lowercase);
        self
    }

    pub fn with_date(mut self, date: DateFilter) -> Self {
        self.date = Some(date);
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Lower-cased keyword, if any.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn date(&self) -> Option<DateFilter> {
        self.date
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.scope.admits(post) && self.keyword_matches(post) && self.date_matches(post)
    }

    fn keyword_matches(&self, post: &Post) -> bool {
        let Some(keyword) = self.keyword.as_deref() else {
            return true;
        };
        post.description.to_lowercase().contains(keyword)
            || post
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(keyword))
    }

    fn date_matches(&self, post: &Post) -> bool {
        self.date.is_none_or(|d| d.admits(post.created_on))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::domain::NewPost;

    fn post(owner: Uuid, description: &str, location: Option<&str>) -> Post {
        Post::new(
            owner,
            NewPost {
                description: description.to_string(),
                location: location.map(String::from),
                mood: 5,
                temperature: 12.0,
                is_public: true,
            },
        )
        .unwrap()
    }

    fn post_on(y: i32, m: u32, d: u32) -> Post {
        let at = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        Post::new_at(
            Uuid::new_v4(),
            NewPost {
                description: "entry".to_string(),
                mood: 5,
                ..Default::default()
            },
            at,
        )
        .unwrap()
    }

    #[test]
    fn keyword_matches_location_case_insensitively() {
        let p = post(Uuid::new_v4(), "Museum day", Some("paris, France"));
        let filter = PostFilter::new(Scope::Owner(p.user_id)).with_keyword(Some("Paris"));
        assert!(filter.matches(&p));
    }

    #[test]
    fn keyword_matches_description_substring() {
        let p = post(Uuid::new_v4(), "Long HIKE in the hills", None);
        let filter = PostFilter::new(Scope::Owner(p.user_id)).with_keyword(Some("hike"));
        assert!(filter.matches(&p));

        let miss = PostFilter::new(Scope::Owner(p.user_id)).with_keyword(Some("beach"));
        assert!(!miss.matches(&p));
    }

    #[test]
    fn empty_keyword_adds_no_constraint() {
        let p = post(Uuid::new_v4(), "anything", None);
        let filter = PostFilter::new(Scope::Owner(p.user_id)).with_keyword(Some(""));
        assert_eq!(filter.keyword(), None);
        assert!(filter.matches(&p));
    }

    #[test]
    fn keyword_is_literal_not_a_pattern() {
        let p = post(Uuid::new_v4(), "plain text", None);
        let filter = PostFilter::new(Scope::Owner(p.user_id)).with_keyword(Some(".*"));
        assert!(!filter.matches(&p));
    }

    #[test]
    fn scope_is_anded_with_keyword() {
        let p = post(Uuid::new_v4(), "Paris", None);
        let other_owner = PostFilter::new(Scope::Owner(Uuid::new_v4())).with_keyword(Some("paris"));
        assert!(!other_owner.matches(&p));
    }

    #[test]
    fn private_posts_never_match_public_scopes() {
        let mut p = post(Uuid::new_v4(), "hidden", None);
        p.is_public = false;
        p.is_approved = true;
        assert!(!Scope::PublicApproved.admits(&p));
        assert!(!Scope::PublicPending.admits(&p));
        assert!(Scope::Owner(p.user_id).admits(&p));
    }

    #[test]
    fn pending_posts_only_match_pending_scope() {
        let p = post(Uuid::new_v4(), "waiting", None);
        assert!(Scope::PublicPending.admits(&p));
        assert!(!Scope::PublicApproved.admits(&p));
    }

    #[test]
    fn leap_day_matches_across_years() {
        let filter = DateFilter::day_month(29, 2).unwrap();
        assert!(filter.admits(post_on(2020, 2, 29).created_on));
        assert!(filter.admits(post_on(2024, 2, 29).created_on));
        assert!(!filter.admits(post_on(2023, 3, 1).created_on));
        assert!(!filter.admits(post_on(2024, 2, 28).created_on));
    }

    #[test]
    fn year_range_is_inclusive() {
        let filter = DateFilter::year_range(2021, 2022).unwrap();
        assert!(filter.admits(post_on(2021, 1, 1).created_on));
        assert!(filter.admits(post_on(2022, 12, 31).created_on));
        assert!(!filter.admits(post_on(2023, 1, 1).created_on));
        assert!(!filter.admits(post_on(2020, 12, 31).created_on));
    }

    #[test]
    fn invalid_date_filters_are_rejected() {
        assert!(DateFilter::day_month(0, 5).is_err());
        assert!(DateFilter::day_month(32, 5).is_err());
        assert!(DateFilter::day_month(10, 13).is_err());
        assert!(DateFilter::year_range(2024, 2020).is_err());
    }
}
