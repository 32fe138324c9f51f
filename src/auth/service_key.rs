// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared-key gate for internal service-to-service endpoints.
//!
//! The raw `Authorization` header value must equal the configured internal
//! key. The comparison is constant-time in the key contents; only a length
//! mismatch short-circuits.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use super::AuthError;
use crate::config::ServiceSharedKey;
use crate::state::AppState;

pub struct ServiceKeyGate {
    key: ServiceSharedKey,
}

impl ServiceKeyGate {
    pub fn new(key: ServiceSharedKey) -> Self {
        Self { key }
    }

    /// Check the `Authorization` header against the shared key.
    pub fn verify(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = headers
            .get(AUTHORIZATION)
            .map(|value| value.as_bytes())
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        if bool::from(presented.ct_eq(self.key.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::KeyMismatch)
        }
    }
}

/// Service key middleware for internal routes.
pub async fn require_service_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(err) = state.service_gate.verify(request.headers()) {
        tracing::warn!(
            stage = err.stage(),
            path = %request.uri().path(),
            "Internal request rejected"
        );
        return err.into_response();
    }
    next.run(request).await
}
