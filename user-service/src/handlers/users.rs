//! CRUD handlers for `/users`.
//!
//! Identifier syntax is checked before the body on routes that take both,
//! so a bad id is reported even when the body is also bad.

use crate::dtos::{
    CreateUserRequest, MessageResponse, UpdateUserRequest, UserListResponse, UserResponse,
};
use crate::models::UserId;
use crate::services::UserServiceError;
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use metrics::counter;
use service_core::error::AppError;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.store.list().await?;

    tracing::debug!(count = users.len(), "Listed users");

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id: UserId = user_id.parse()?;

    let user = state
        .store
        .get(id.object_id())
        .await?
        .ok_or(UserServiceError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let new_user = payload.into_new_user()?;

    let user = state.store.insert(new_user).await.map_err(|e| {
        tracing::error!("Failed to insert user: {}", e);
        e
    })?;

    tracing::info!(user_id = %user.id, "User created");
    counter!("user_operations_total", "operation" => "create").increment(1);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<ValidatedJson<UpdateUserRequest>, AppError>,
) -> Result<Json<UserResponse>, AppError> {
    let id: UserId = user_id.parse()?;
    let ValidatedJson(payload) = payload?;
    let changes = payload.into_changes()?;

    let user = state
        .store
        .update(id.object_id(), changes)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %id, "Failed to update user: {}", e);
            e
        })?
        .ok_or(UserServiceError::NotFound)?;

    tracing::info!(user_id = %id, "User updated");
    counter!("user_operations_total", "operation" => "update").increment(1);

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: UserId = user_id.parse()?;

    let deleted = state.store.delete(id.object_id()).await.map_err(|e| {
        tracing::error!(user_id = %id, "Failed to delete user: {}", e);
        e
    })?;

    if !deleted {
        return Err(UserServiceError::NotFound.into());
    }

    tracing::info!(user_id = %id, "User deleted");
    counter!("user_operations_total", "operation" => "delete").increment(1);

    Ok(Json(MessageResponse {
        message: format!("User with ID {} deleted successfully", id),
    }))
}
