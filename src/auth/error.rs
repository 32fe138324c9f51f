// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::{ClaimError, DecodeError, DecryptError, ParseError};

/// Why a gate rejected a request.
///
/// The distinction exists for logs only. Every variant renders as the same
/// `403 Forbidden` with an empty body so a caller probing the envelope
/// format cannot tell which stage failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session cookie or service header present (or present but empty)
    #[error("no credential presented")]
    MissingCredential,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Decrypt(#[from] DecryptError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Claims(#[from] ClaimError),
    /// `preferred_username` resolved to an empty string
    #[error("token identity has an empty username")]
    EmptyIdentity,
    /// Service key header does not match the configured key
    #[error("service key mismatch")]
    KeyMismatch,
}

impl AuthError {
    /// Pipeline stage that failed, for structured logs.
    pub fn stage(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::Decode(_) => "decode",
            AuthError::Decrypt(_) => "decrypt",
            AuthError::Parse(_) => "parse",
            AuthError::Claims(_) => "claims",
            AuthError::EmptyIdentity => "empty_identity",
            AuthError::KeyMismatch => "key_mismatch",
        }
    }

    /// HTTP status for this error. Always `403`.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}
