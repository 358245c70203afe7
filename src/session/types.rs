use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::ADMIN_USER_TYPE;

/// User profile as returned by the backend.
///
/// Kept as a raw JSON object so fields this client does not know about
/// survive a round trip through storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Profile(Map<String, Value>);

impl Profile {
    /// Only JSON objects are profiles
    pub(crate) fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Parse the serialized form kept in durable storage
    pub(crate) fn from_storage(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unparseable stored profile");
                None
            }
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub(crate) fn user_type(&self) -> Option<i64> {
        self.0.get("userType").and_then(Value::as_i64)
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.user_type() == Some(ADMIN_USER_TYPE)
    }

    /// Nickname when set, else username
    pub(crate) fn display_name(&self) -> Option<&str> {
        ["nickname", "username"]
            .iter()
            .filter_map(|k| self.0.get(*k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }

    /// Shallow merge, later keys win
    pub(crate) fn merge(&mut self, partial: &Map<String, Value>) {
        for (k, v) in partial {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub(crate) fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Session {
    pub(crate) token: String,
    pub(crate) profile: Option<Profile>,
}

impl Session {
    pub(crate) fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Registration {
    pub(crate) username: String,
    pub(crate) password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
}

/// `data` of a successful login or register call
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthPayload {
    pub(crate) token: String,
    #[serde(default)]
    pub(crate) user: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> Profile {
        Profile::from_value(value).unwrap()
    }

    #[test]
    fn admin_requires_integer_one() {
        assert!(profile(json!({"userType": 1})).is_admin());
        assert!(!profile(json!({"userType": 0})).is_admin());
        assert!(!profile(json!({"userType": "1"})).is_admin());
        assert!(!profile(json!({})).is_admin());
    }

    #[test]
    fn non_objects_are_not_profiles() {
        assert!(Profile::from_value(Value::Null).is_none());
        assert!(Profile::from_value(json!([1, 2])).is_none());
        assert!(Profile::from_storage("null").is_none());
        assert!(Profile::from_storage("{broken").is_none());
    }

    #[test]
    fn merge_overwrites_and_keeps_other_fields() {
        let mut p = profile(json!({"username": "a", "nickname": "old", "userType": 0}));
        let partial = json!({"nickname": "new", "email": "a@example.com"});
        p.merge(partial.as_object().unwrap());
        assert_eq!(
            p.as_value(),
            json!({"username": "a", "nickname": "new", "email": "a@example.com", "userType": 0})
        );
    }

    #[test]
    fn display_name_skips_empty_nickname() {
        let p = profile(json!({"username": "alice", "nickname": ""}));
        assert_eq!(p.display_name(), Some("alice"));
    }

    #[test]
    fn registration_omits_unset_fields() {
        let r = Registration {
            username: "a".to_string(),
            password: "b".to_string(),
            nickname: None,
            email: Some("a@example.com".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"username": "a", "password": "b", "email": "a@example.com"})
        );
    }
}
