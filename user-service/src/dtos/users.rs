use crate::models::{NewUser, User, UserChanges};
use crate::services::UserServiceError;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "Name and age are required"),
        length(min = 1, message = "Name must not be empty")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Name and age are required"),
        range(min = 0, max = 150, message = "Age must be between 0 and 150")
    )]
    pub age: Option<i32>,
}

impl CreateUserRequest {
    /// Convert a validated request into the insert payload.
    pub fn into_new_user(self) -> Result<NewUser, UserServiceError> {
        match (self.name, self.age) {
            (Some(name), Some(age)) => Ok(NewUser { name, age }),
            _ => Err(UserServiceError::Validation(
                "Name and age are required".to_string(),
            )),
        }
    }
}

/// Merge-update body. Unknown keys (including `id`/`_id`) are rejected.
///
/// An absent field is left unchanged; an explicit `null` is rejected like any
/// other wrongly typed value.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> Result<UserChanges, UserServiceError> {
        let changes = UserChanges {
            name: self.name,
            age: self.age,
        };
        if changes.is_empty() {
            return Err(UserServiceError::Validation(
                "At least one of name or age must be provided".to_string(),
            ));
        }
        Ok(changes)
    }
}

/// Public shape of a user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub age: Option<i32>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.unwrap_or_default(),
            age: user.age,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
