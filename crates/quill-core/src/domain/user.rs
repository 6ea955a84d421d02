use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::post::Profile;

/// User identifier.
///
/// Local users carry string ids. Posts imported from the remote endpoint
/// reference numeric ids, which are accepted and kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => UserId(s),
            Raw::Number(n) => UserId::from(n),
        })
    }
}

/// User entity - the single active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    /// Mock token. Opaque and non-cryptographic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl User {
    /// Synthesize the user for a login. The id is derived from the email so
    /// repeated logins map to the same user.
    pub fn login(email: &str, issued_at: DateTime<Utc>) -> Self {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, email.to_lowercase().as_bytes());
        Self {
            id: UserId(format!("user-{}", id.simple())),
            email: email.to_string(),
            full_name: name_from_email(email),
            access_token: Some(mock_token(email, issued_at)),
        }
    }

    /// Create a freshly registered user with a new unique id.
    pub fn register(email: &str, full_name: Option<&str>, issued_at: DateTime<Utc>) -> Self {
        let full_name = full_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| name_from_email(email));

        Self {
            id: UserId(format!("user-{}", Uuid::new_v4().simple())),
            email: email.to_string(),
            full_name,
            access_token: Some(mock_token(email, issued_at)),
        }
    }

    /// Author details stamped onto posts.
    pub fn profile(&self) -> Profile {
        Profile {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

fn mock_token(email: &str, issued_at: DateTime<Utc>) -> String {
    URL_SAFE_NO_PAD.encode(format!("{email}:{}", issued_at.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_id_is_stable_per_email() {
        let now = Utc::now();
        let first = User::login("a@b.com", now);
        let second = User::login("A@B.com", now);
        assert_eq!(first.id, second.id);
        assert_eq!(first.full_name, "a");
    }

    #[test]
    fn test_register_ids_are_unique() {
        let now = Utc::now();
        let a = User::register("a@b.com", None, now);
        let b = User::register("a@b.com", None, now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_register_full_name_fallback() {
        let now = Utc::now();
        assert_eq!(User::register("jane@x.io", Some("  "), now).full_name, "jane");
        assert_eq!(
            User::register("jane@x.io", Some("Jane Doe"), now).full_name,
            "Jane Doe"
        );
    }

    #[test]
    fn test_mock_token_encodes_email_and_time() {
        let now = Utc::now();
        let user = User::login("a@b.com", now);
        let decoded = URL_SAFE_NO_PAD
            .decode(user.access_token.unwrap())
            .unwrap();
        let decoded = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded, format!("a@b.com:{}", now.timestamp_millis()));
    }

    #[test]
    fn test_user_id_accepts_numbers() {
        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id.as_str(), "7");
        let id: UserId = serde_json::from_str("\"user-1\"").unwrap();
        assert_eq!(id.as_str(), "user-1");
    }
}
