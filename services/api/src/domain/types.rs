use chrono::{DateTime, Utc};

use lectio_auth::Identity;
use lectio_domain::id::{EntryId, UserId, UserTagId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub id: i32,
    pub code: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: i32,
    pub title: String,
}

/// A user profile. The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_on: DateTime<Utc>,
    pub version: Option<Version>,
    pub permissions: Vec<Permission>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            preferred_version_id: self.version.as_ref().map(|v| v.id),
            permissions: self.permissions.iter().map(|p| p.title.clone()).collect(),
        }
    }
}

/// Signup payload. `password` is plaintext; the repository hashes it before
/// it is persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update. Only the fields that are `Some` are written; a `Some`
/// password is rehashed before it is persisted.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub title: String,
    pub entry: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTag {
    pub id: UserTagId,
    pub tag: String,
}

/// How many entries a tag is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    pub tag: String,
    pub uses: u64,
}

/// Minimal syntactic check: one `@` with something on both sides and a dot
/// in the domain.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_plain_addresses() {
        assert!(validate_email("ruth@example.com"));
        assert!(validate_email("first.last@mail.example.org"));
    }

    #[test]
    fn should_reject_malformed_addresses() {
        let malformed = [
            "",
            "ruth",
            "@example.com",
            "ruth@",
            "ruth@example",
            "ru th@example.com",
            "a@b@c.com",
        ];
        for email in malformed {
            assert!(!validate_email(email), "{email}");
        }
    }

    #[test]
    fn password_needs_six_characters() {
        assert!(!validate_password("12345"));
        assert!(validate_password("123456"));
    }

    #[test]
    fn identity_carries_permission_titles() {
        let user = User {
            id: UserId(4),
            email: "ruth@example.com".into(),
            first_name: "Ruth".into(),
            last_name: "Moab".into(),
            joined_on: Utc::now(),
            version: Some(Version {
                id: 2,
                code: "NRSV".into(),
                title: None,
            }),
            permissions: vec![Permission {
                id: 1,
                title: "admin".into(),
            }],
        };
        let identity = user.identity();
        assert_eq!(identity.preferred_version_id, Some(2));
        assert_eq!(identity.permissions, vec!["admin".to_owned()]);
    }
}
