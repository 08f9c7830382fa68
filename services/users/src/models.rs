//! User entity and the request/response messages of the user RPC service
//!
//! Messages follow the protobuf JSON mapping: lowerCamelCase field names,
//! 64-bit integers as strings, and missing fields decoding to zero values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire representation of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    #[serde(with = "int64")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserMessage {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
        }
    }
}

/// RFC3339 at second precision with an explicit offset, e.g. `2024-01-02T15:04:05Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub user: UserMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetUserRequest {
    #[serde(with = "int64")]
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetUserResponse {
    pub user: UserMessage,
}

/// Raw pagination parameters; defaults are applied by the service layer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListUsersRequest {
    #[serde(alias = "page_size")]
    pub page_size: i32,
    pub page: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserMessage>,
    pub total: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[serde(with = "int64")]
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserResponse {
    pub user: UserMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteUserRequest {
    #[serde(with = "int64")]
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
}

/// int64 fields are written as JSON strings and read from either strings or numbers
pub mod int64 {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_user() -> User {
        User {
            id: 9007199254740993,
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
                + chrono::Duration::milliseconds(750),
        }
    }

    #[test]
    fn test_user_message_formats_timestamps_at_second_precision() {
        let message = UserMessage::from(&sample_user());
        assert_eq!(message.created_at, "2024-01-02T15:04:05Z");
        assert_eq!(message.updated_at, "2024-03-04T08:00:00Z");
    }

    #[test]
    fn test_user_message_json_shape() {
        let value = serde_json::to_value(UserMessage::from(&sample_user())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "9007199254740993",
                "name": "Alice",
                "email": "a@x.com",
                "createdAt": "2024-01-02T15:04:05Z",
                "updatedAt": "2024-03-04T08:00:00Z",
            })
        );
    }

    #[test]
    fn test_id_accepts_string_or_number() {
        let from_text: GetUserRequest = serde_json::from_value(json!({ "id": "42" })).unwrap();
        let from_number: GetUserRequest = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(from_text.id, 42);
        assert_eq!(from_number.id, 42);

        let bad = serde_json::from_value::<GetUserRequest>(json!({ "id": "forty-two" }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_missing_fields_take_zero_values() {
        let list: ListUsersRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!((list.page_size, list.page), (0, 0));

        let update: UpdateUserRequest = serde_json::from_value(json!({ "name": "Bob" })).unwrap();
        assert_eq!(update.id, 0);
        assert_eq!(update.name, "Bob");
        assert_eq!(update.email, "");
    }

    #[test]
    fn test_list_request_accepts_both_field_spellings() {
        let camel: ListUsersRequest =
            serde_json::from_value(json!({ "pageSize": 5, "page": 2 })).unwrap();
        let snake: ListUsersRequest =
            serde_json::from_value(json!({ "page_size": 5, "page": 2 })).unwrap();
        assert_eq!((camel.page_size, camel.page), (5, 2));
        assert_eq!((snake.page_size, snake.page), (5, 2));
    }
}
