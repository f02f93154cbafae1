//! Moderation state machine for post visibility.
//!
//! A post's persisted `is_public` / `is_approved` flags encode one of three
//! live states. `Denied` is terminal: the record is deleted as part of the
//! transition, so it is never read back from the store.
//!
//! ```text
//!            owner edit (public)          admin approve
//!  Private ─────────────────────▶ Pending ─────────────▶ Approved
//!     ▲                              │
//!     └──── owner edit (private) ────┤ admin deny
//!                                    ▼
//!                                  Denied (deleted)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationState {
    Private,
    PendingApproval,
    Approved,
    Denied,
}

/// Action attempted against a state that does not accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} a post in state {from:?}")]
pub struct TransitionError {
    pub from: ModerationState,
    pub action: &'static str,
}

impl ModerationState {
    /// Decode the persisted flag pair. `is_approved` is inert while private.
    pub fn from_flags(is_public: bool, is_approved: bool) -> Self {
        match (is_public, is_approved) {
            (false, _) => Self::Private,
            (true, false) => Self::PendingApproval,
            (true, true) => Self::Approved,
        }
    }

    /// State of a freshly created post.
    pub fn initial(is_public: bool) -> Self {
        if is_public {
            Self::PendingApproval
        } else {
            Self::Private
        }
    }

    /// Persisted `(is_public, is_approved)` pair, `None` for `Denied`.
    pub fn flags(self) -> Option<(bool, bool)> {
        match self {
            Self::Private => Some((false, false)),
            Self::PendingApproval => Some((true, false)),
            Self::Approved => Some((true, true)),
            Self::Denied => None,
        }
    }

    /// Owner edit that sets the public flag.
    ///
    /// An approved post that stays public keeps its approval. Any other move
    /// to public lands in the pending queue with a cleared approval flag, and
    /// any move to private clears it as well.
    pub fn after_owner_edit(self, make_public: bool) -> Result<Self, TransitionError> {
        match (self, make_public) {
            (Self::Denied, _) => Err(TransitionError {
                from: self,
                action: "edit",
            }),
            (Self::Approved, true) => Ok(Self::Approved),
            (_, true) => Ok(Self::PendingApproval),
            (_, false) => Ok(Self::Private),
        }
    }

    pub fn approve(self) -> Result<Self, TransitionError> {
        match self {
            Self::PendingApproval => Ok(Self::Approved),
            from => Err(TransitionError {
                from,
                action: "approve",
            }),
        }
    }

    pub fn deny(self) -> Result<Self, TransitionError> {
        match self {
            Self::PendingApproval => Ok(Self::Denied),
            from => Err(TransitionError {
                from,
                action: "deny",
            }),
        }
    }

    /// Whether guests may see a post in this state.
    pub fn is_publicly_visible(self) -> bool {
        self == Self::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_flag_makes_approval_inert() {
        assert_eq!(
            ModerationState::from_flags(false, true),
            ModerationState::Private
        );
        assert_eq!(
            ModerationState::from_flags(false, false),
            ModerationState::Private
        );
    }

    #[test]
    fn initial_state_follows_public_flag() {
        assert_eq!(ModerationState::initial(false), ModerationState::Private);
        assert_eq!(
            ModerationState::initial(true),
            ModerationState::PendingApproval
        );
    }

    #[test]
    fn approve_only_from_pending() {
        assert_eq!(
            ModerationState::PendingApproval.approve(),
            Ok(ModerationState::Approved)
        );
        for state in [
            ModerationState::Private,
            ModerationState::Approved,
            ModerationState::Denied,
        ] {
            let err = state.approve().unwrap_err();
            assert_eq!(err.from, state);
        }
    }

    #[test]
    fn deny_only_from_pending() {
        assert_eq!(
            ModerationState::PendingApproval.deny(),
            Ok(ModerationState::Denied)
        );
        assert!(ModerationState::Approved.deny().is_err());
        assert!(ModerationState::Private.deny().is_err());
    }

    #[test]
    fn publishing_a_private_post_enters_the_queue() {
        let next = ModerationState::Private.after_owner_edit(true).unwrap();
        assert_eq!(next, ModerationState::PendingApproval);
        assert_eq!(next.flags(), Some((true, false)));
    }

    #[test]
    fn approved_post_stays_approved_while_public() {
        assert_eq!(
            ModerationState::Approved.after_owner_edit(true),
            Ok(ModerationState::Approved)
        );
        assert_eq!(
            ModerationState::Approved.after_owner_edit(false),
            Ok(ModerationState::Private)
        );
    }

    #[test]
    fn denied_posts_cannot_be_edited() {
        assert!(ModerationState::Denied.after_owner_edit(true).is_err());
        assert_eq!(ModerationState::Denied.flags(), None);
    }

    #[test]
    fn only_approved_is_publicly_visible() {
        assert!(ModerationState::Approved.is_publicly_visible());
        assert!(!ModerationState::PendingApproval.is_publicly_visible());
        assert!(!ModerationState::Private.is_publicly_visible());
    }
}
