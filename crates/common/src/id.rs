//! User identifier normalization.
//!
//! Stored group documents reference users either by a bare identifier or,
//! after population, by an embedded user object carrying `_id`. Every
//! comparison goes through [`to_id`] so the two shapes behave identically.

use serde::{Deserialize, Serialize};

/// A reference to a user as it appears inside a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    /// Bare identifier.
    Id(String),
    /// Expanded user object.
    Populated(PopulatedUser),
}

/// A populated user reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedUser {
    /// Nested identifier.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Username, when the population selected it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Display name, when the population selected it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Resolve a user reference to its canonical identifier.
///
/// Empty identifiers and populated objects without `_id` resolve to `None`.
#[must_use]
pub fn to_id(value: &UserRef) -> Option<&str> {
    let id = match value {
        UserRef::Id(id) => Some(id.as_str()),
        UserRef::Populated(user) => user.id.as_deref(),
    };
    id.filter(|id| !id.is_empty())
}

impl UserRef {
    /// Canonical identifier of this reference.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        to_id(self)
    }

    /// Whether this reference points at `user_id`.
    ///
    /// An empty `user_id` never matches.
    #[must_use]
    pub fn is(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.id() == Some(user_id)
    }
}

impl From<&str> for UserRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for UserRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_identifier() {
        let user: UserRef = serde_json::from_str(r#""u1""#).unwrap();
        assert_eq!(user, UserRef::from("u1"));
        assert_eq!(to_id(&user), Some("u1"));
        assert!(user.is("u1"));
        assert!(!user.is("u2"));
    }

    #[test]
    fn test_populated_object() {
        let user: UserRef =
            serde_json::from_str(r#"{"_id":"u1","username":"alice","displayName":"Alice"}"#)
                .unwrap();
        assert!(matches!(user, UserRef::Populated(_)));
        assert_eq!(user.id(), Some("u1"));
        assert!(user.is("u1"));
    }

    #[test]
    fn test_missing_or_empty_ids_never_match() {
        let user: UserRef = serde_json::from_str(r#"{"username":"ghost"}"#).unwrap();
        assert_eq!(user.id(), None);
        assert!(!user.is(""));

        let empty = UserRef::from("");
        assert_eq!(empty.id(), None);
        assert!(!empty.is(""));
    }
}
