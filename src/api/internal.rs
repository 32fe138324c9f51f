// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Internal service endpoints, gated by the shared internal API key.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::directory::AppUser;
use crate::error::ApiError;
use crate::state::AppState;

/// List all known users.
#[utoipa::path(
    get,
    path = "/internal/v1/users",
    tag = "Internal",
    security(("internal_key" = [])),
    responses(
        (status = 200, description = "All users ordered by username", body = [AppUser]),
        (status = 403, description = "Missing or wrong internal key"),
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<AppUser>>, ApiError> {
    Ok(Json(state.directory.list().await?))
}

/// Look up one user by username.
#[utoipa::path(
    get,
    path = "/internal/v1/users/{username}",
    tag = "Internal",
    security(("internal_key" = [])),
    params(("username" = String, Path, description = "Login name")),
    responses(
        (status = 200, description = "User record", body = AppUser),
        (status = 403, description = "Missing or wrong internal key"),
        (status = 404, description = "Unknown username"),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AppUser>, ApiError> {
    state
        .directory
        .find(&username)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
