// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::directory::AppUser;

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Application user ID
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified: bool,
}

impl From<AppUser> for UserMeResponse {
    fn from(user: AppUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            email_verified: user.email_verified,
        }
    }
}

/// Get the current session user.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 403, description = "Missing or invalid session cookie"),
    )
)]
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<UserMeResponse> {
    Json(user.into())
}
