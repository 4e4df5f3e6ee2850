use crate::services::UserServiceError;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user document as stored in the collection.
///
/// Fields other than `_id` are optional on read. A stored `age` that is not a
/// whole number in `i32` range (a string, a fraction) reads as `None`, so one
/// legacy document cannot break listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i32>,
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Bson::deserialize(deserializer)? {
        Bson::Int32(n) => Some(n),
        Bson::Int64(n) => i32::try_from(n).ok(),
        Bson::Double(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
            Some(n as i32)
        }
        _ => None,
    };
    Ok(age)
}

/// Insert payload. Carries no `_id`; the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
}

impl NewUser {
    pub fn into_user(self, id: ObjectId) -> User {
        User {
            id,
            name: Some(self.name),
            age: Some(self.age),
        }
    }
}

/// Fields submitted for a merge-update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none()
    }

    /// Body of the `$set` operator.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert("name", name.clone());
        }
        if let Some(age) = self.age {
            set.insert("age", age);
        }
        set
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(age) = self.age {
            user.age = Some(age);
        }
    }
}

/// A syntactically valid identifier parsed from a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(ObjectId);

impl UserId {
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for UserId {
    type Err = UserServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(UserId)
            .map_err(|_| UserServiceError::InvalidId(s.to_string()))
    }
}

impl From<ObjectId> for UserId {
    fn from(id: ObjectId) -> Self {
        UserId(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}
