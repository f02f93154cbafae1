use std::ops::RangeInclusive;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::moderation::{ModerationState, TransitionError};
use crate::error::DomainError;

/// Accepted mood scores.
pub const MOOD_RANGE: RangeInclusive<i32> = 1..=10;

/// Post entity - a single day's journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub location: Option<String>,
    pub mood: i32,
    pub temperature: f64,
    /// Absolute URL handed back by the blob store, empty when no photo.
    pub photo_url: String,
    pub is_public: bool,
    pub is_approved: bool,
    /// Calendar day of creation in the server's local time zone.
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-supplied content for a new post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub description: String,
    pub location: Option<String>,
    pub mood: i32,
    pub temperature: f64,
    pub is_public: bool,
}

/// Partial owner edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostChanges {
    pub description: Option<String>,
    pub location: Option<String>,
    pub mood: Option<i32>,
    pub temperature: Option<f64>,
    pub is_public: Option<bool>,
}

impl Post {
    /// Create a new post stamped with the current local time.
    pub fn new(user_id: Uuid, draft: NewPost) -> Result<Self, DomainError> {
        Self::new_at(user_id, draft, Local::now())
    }

    /// Create a new post stamped with `at`.
    pub fn new_at(user_id: Uuid, draft: NewPost, at: DateTime<Local>) -> Result<Self, DomainError> {
        let description = validate_description(draft.description)?;
        validate_mood(draft.mood)?;
        validate_temperature(draft.temperature)?;

        let (is_public, is_approved) = ModerationState::initial(draft.is_public)
            .flags()
            .unwrap_or((false, false));
        let created_at = at.with_timezone(&Utc);

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            description,
            location: normalize_location(draft.location),
            mood: draft.mood,
            temperature: draft.temperature,
            photo_url: String::new(),
            is_public,
            is_approved,
            created_on: at.date_naive(),
            created_at,
            updated_at: created_at,
        })
    }

    pub fn moderation_state(&self) -> ModerationState {
        ModerationState::from_flags(self.is_public, self.is_approved)
    }

    /// Apply an owner edit. Every field is validated before anything changes.
    pub fn apply_changes(&mut self, changes: PostChanges) -> Result<(), DomainError> {
        let description = changes.description.map(validate_description).transpose()?;
        if let Some(mood) = changes.mood {
            validate_mood(mood)?;
        }
        if let Some(temperature) = changes.temperature {
            validate_temperature(temperature)?;
        }
        let state = match changes.is_public {
            Some(make_public) => Some(
                self.moderation_state()
                    .after_owner_edit(make_public)
                    .map_err(|e| DomainError::Validation(e.to_string()))?,
            ),
            None => None,
        };

        if let Some(description) = description {
            self.description = description;
        }
        if changes.location.is_some() {
            self.location = normalize_location(changes.location);
        }
        if let Some(mood) = changes.mood {
            self.mood = mood;
        }
        if let Some(temperature) = changes.temperature {
            self.temperature = temperature;
        }
        if let Some(state) = state {
            self.set_state(state);
        }
        self.touch();
        Ok(())
    }

    /// Admin approval of a pending post.
    pub fn approve(&mut self) -> Result<(), TransitionError> {
        let next = self.moderation_state().approve()?;
        self.set_state(next);
        self.touch();
        Ok(())
    }

    pub fn set_photo(&mut self, url: impl Into<String>) {
        self.photo_url = url.into();
        self.touch();
    }

    fn set_state(&mut self, state: ModerationState) {
        if let Some((is_public, is_approved)) = state.flags() {
            self.is_public = is_public;
            self.is_approved = is_approved;
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_description(description: String) -> Result<String, DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::validation("Description is required"));
    }
    Ok(description)
}

fn validate_mood(mood: i32) -> Result<(), DomainError> {
    if !MOOD_RANGE.contains(&mood) {
        return Err(DomainError::validation(format!(
            "Mood must be between {} and {}",
            MOOD_RANGE.start(),
            MOOD_RANGE.end()
        )));
    }
    Ok(())
}

fn validate_temperature(temperature: f64) -> Result<(), DomainError> {
    if !temperature.is_finite() {
        return Err(DomainError::validation("Temperature must be a number"));
    }
    Ok(())
}

fn normalize_location(location: Option<String>) -> Option<String> {
    location.filter(|l| !l.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(is_public: bool) -> NewPost {
        NewPost {
            description: "Sunny walk by the river".to_string(),
            location: Some("Lyon".to_string()),
            mood: 7,
            temperature: 21.5,
            is_public,
        }
    }

    #[test]
    fn new_post_starts_private_or_pending() {
        let private = Post::new(Uuid::new_v4(), draft(false)).unwrap();
        assert_eq!(private.moderation_state(), ModerationState::Private);
        assert!(private.photo_url.is_empty());

        let public = Post::new(Uuid::new_v4(), draft(true)).unwrap();
        assert_eq!(public.moderation_state(), ModerationState::PendingApproval);
        assert!(!public.is_approved);
    }

    #[test]
    fn mood_out_of_range_is_rejected() {
        for mood in [0, 11, -3] {
            let mut d = draft(false);
            d.mood = mood;
            let err = Post::new(Uuid::new_v4(), d).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut d = draft(false);
        d.description = "   ".to_string();
        assert!(matches!(
            Post::new(Uuid::new_v4(), d),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn created_on_uses_local_day() {
        let at = Local::now();
        let post = Post::new_at(Uuid::new_v4(), draft(false), at).unwrap();
        assert_eq!(post.created_on, at.date_naive());
    }

    #[test]
    fn failed_edit_leaves_post_untouched() {
        let mut post = Post::new(Uuid::new_v4(), draft(false)).unwrap();
        let before = post.clone();
        let err = post
            .apply_changes(PostChanges {
                description: Some("Rainy".to_string()),
                mood: Some(42),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(post, before);
    }

    #[test]
    fn publishing_clears_stale_approval() {
        let mut post = Post::new(Uuid::new_v4(), draft(false)).unwrap();
        post.is_approved = true;
        post.apply_changes(PostChanges {
            is_public: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert!(post.is_public);
        assert!(!post.is_approved);
    }

    #[test]
    fn approve_requires_pending() {
        let mut post = Post::new(Uuid::new_v4(), draft(true)).unwrap();
        post.approve().unwrap();
        assert_eq!(post.moderation_state(), ModerationState::Approved);
        assert!(post.approve().is_err());
    }
}
