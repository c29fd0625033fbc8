//! User entity.

use atelier_core::types::{EntityId, Timestamp};
use serde::Serialize;

/// A registered account.
///
/// `password_hash` is an opaque credential string and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Build an active user with no id yet; the store assigns one on insert.
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: EntityId::nil(),
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            avatar: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new("a@example.com", "alice", "$argon2id$secret");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["is_active"], true);
    }
}
