//! Caller roles and the admin capability.

use uuid::Uuid;

use super::User;
use crate::error::DomainError;

/// Who is calling a core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guest,
    Member(Uuid),
    Admin(Uuid),
}

/// Proof that the caller passed the admin gate.
///
/// Moderation operations take this by reference; it can only be obtained
/// through [`Role::admin_grant`].
#[derive(Debug, Clone, Copy)]
pub struct AdminGrant {
    admin_id: Uuid,
}

impl AdminGrant {
    pub fn admin_id(&self) -> Uuid {
        self.admin_id
    }
}

impl Role {
    /// Derive the role from the stored user record.
    pub fn from_user(user: &User) -> Self {
        if user.is_admin {
            Self::Admin(user.id)
        } else {
            Self::Member(user.id)
        }
    }

    /// Authenticated principal, if any.
    pub fn principal(&self) -> Result<Uuid, DomainError> {
        match self {
            Self::Guest => Err(DomainError::Unauthorized),
            Self::Member(id) | Self::Admin(id) => Ok(*id),
        }
    }

    pub fn admin_grant(&self) -> Result<AdminGrant, DomainError> {
        match self {
            Self::Admin(admin_id) => Ok(AdminGrant {
                admin_id: *admin_id,
            }),
            Self::Member(_) => Err(DomainError::Forbidden(
                "Only admin users are allowed.".to_string(),
            )),
            Self::Guest => Err(DomainError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_admin_flag_decides_the_role() {
        let mut user = User::new("a@b.io".to_string(), "hash".to_string());
        assert_eq!(Role::from_user(&user), Role::Member(user.id));
        user.is_admin = true;
        assert_eq!(Role::from_user(&user), Role::Admin(user.id));
    }

    #[test]
    fn only_admins_get_a_grant() {
        let id = Uuid::new_v4();
        assert_eq!(Role::Admin(id).admin_grant().unwrap().admin_id(), id);
        assert!(matches!(
            Role::Member(id).admin_grant(),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            Role::Guest.admin_grant(),
            Err(DomainError::Unauthorized)
        ));
    }

    #[test]
    fn guests_have_no_principal() {
        assert!(Role::Guest.principal().is_err());
    }
}
