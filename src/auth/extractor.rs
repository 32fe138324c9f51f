// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the session user.
//!
//! Use the `CurrentUser` extractor in handlers mounted behind
//! [`require_session`](super::require_session):
//!
//! ```rust,ignore
//! async fn my_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     // user is AppUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::AuthError;
use crate::directory::AppUser;

/// The application user resolved by the session gate.
///
/// Rejects with `403` when the request did not pass through the gate, so a
/// route accidentally mounted without the middleware stays closed.
pub struct CurrentUser(pub AppUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AppUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::MissingCredential)
    }
}
