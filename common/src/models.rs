use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::DatabaseError;

// ============================================================================
// User Models
// ============================================================================

/// User profile as exposed over the API and returned by the external source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub company: Option<Company>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// Coordinates are kept as strings, matching the source payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

/// Row shape of the `users` table; nested objects live in JSON text columns
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub company: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            address: decode_json_column(row.address.as_deref())?,
            phone: row.phone,
            website: row.website,
            company: decode_json_column(row.company.as_deref())?,
        })
    }
}

impl TryFrom<&User> for UserRow {
    type Error = DatabaseError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            address: encode_json_column(user.address.as_ref())?,
            phone: user.phone.clone(),
            website: user.website.clone(),
            company: encode_json_column(user.company.as_ref())?,
        })
    }
}

/// Serialize an optional nested value into a JSON text column
pub fn encode_json_column<T: Serialize>(
    value: Option<&T>,
) -> Result<Option<String>, DatabaseError> {
    value
        .map(serde_json::to_string)
        .transpose()
        .map_err(DatabaseError::from)
}

/// Parse a JSON text column back into its nested value.
/// Empty strings and JSON `null` are treated as absent.
pub fn decode_json_column<T: for<'de> Deserialize<'de>>(
    raw: Option<&str>,
) -> Result<Option<T>, DatabaseError> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(text) => serde_json::from_str(text).map(Some).map_err(DatabaseError::from),
    }
}

/// Fields accepted when creating a user; `id` is assigned by the store if absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub company: Option<Company>,
}

/// Profile replacement; `address` and `company` are only overwritten when provided
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company: Option<Company>,
}

// ============================================================================
// Post Models
// ============================================================================

/// Board post. `userId` is not enforced as a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "userId", default)]
    #[sqlx(rename = "userId")]
    pub user_id: Option<i64>,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
    pub title: String,
    pub body: String,
}

// ============================================================================
// Bulk Models
// ============================================================================

/// Tables touched by bulk routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Users,
    Posts,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Posts => "posts",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub table: Table,
    pub rows: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_source_user() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        })
    }

    #[test]
    fn test_user_deserializes_source_payload() {
        let user: User = serde_json::from_value(sample_source_user()).unwrap();
        assert_eq!(user.username, "Bret");
        assert_eq!(user.address.as_ref().unwrap().geo.lat, "-37.3159");
        assert_eq!(
            user.company.as_ref().unwrap().catch_phrase,
            "Multi-layered client-server neural-net"
        );
    }

    #[test]
    fn test_user_survives_row_conversion() {
        let user: User = serde_json::from_value(sample_source_user()).unwrap();
        let row = UserRow::try_from(&user).unwrap();
        assert!(row.address.as_deref().unwrap().contains("Kulas Light"));
        let back = User::try_from(row).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_company_serializes_camel_case_key() {
        let user: User = serde_json::from_value(sample_source_user()).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert!(value["company"].get("catchPhrase").is_some());
    }

    #[test]
    fn test_decode_treats_blank_and_null_as_absent() {
        assert_eq!(decode_json_column::<Geo>(None).unwrap(), None);
        assert_eq!(decode_json_column::<Geo>(Some("")).unwrap(), None);
        assert_eq!(decode_json_column::<Geo>(Some("null")).unwrap(), None);
    }

    #[test]
    fn test_decode_rejects_malformed_column() {
        let err = decode_json_column::<Geo>(Some("{not json")).unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)));
    }

    #[test]
    fn test_post_uses_user_id_key() {
        let post: Post = serde_json::from_value(json!({
            "userId": 3, "id": 21, "title": "t", "body": "b"
        }))
        .unwrap();
        assert_eq!(post.user_id, Some(3));
        assert_eq!(serde_json::to_value(&post).unwrap()["userId"], 3);
    }
}
