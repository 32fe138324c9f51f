// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session gate for user-facing endpoints.
//!
//! ## Pipeline
//!
//! ```text
//! cookie ─▶ decode ─▶ decrypt ─▶ parse ─▶ map ─▶ directory ─▶ handler
//!    │         │         │          │       │         │
//!    └─────────┴─────────┴──────────┴───────┴─▶ 403   └─▶ 500
//! ```
//!
//! Every stage is synchronous and fail-closed. The user directory is only
//! consulted once the identity is fully established, exactly once per
//! request.

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::cipher::CipherError;
use super::token::extract_claims;
use super::{envelope, AuthError, Identity, SessionCipher};
use crate::config::AuthConfig;
use crate::state::AppState;

/// Decides whether a request carries a valid session cookie.
pub struct SessionGate {
    cipher: SessionCipher,
    cookie_name: String,
}

impl SessionGate {
    pub fn new(config: &AuthConfig) -> Result<Self, CipherError> {
        Ok(Self {
            cipher: SessionCipher::new(&config.encryption_key)?,
            cookie_name: config.cookie_name.clone(),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Authenticate the session cookie in `headers`.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let envelope_text = session_cookie(headers, &self.cookie_name)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        self.authenticate_envelope(envelope_text)
    }

    /// Authenticate a raw cookie value.
    pub fn authenticate_envelope(&self, envelope_text: &str) -> Result<Identity, AuthError> {
        let sealed = envelope::decode(envelope_text)?;
        let token = self.cipher.open(&sealed)?;
        let claims = extract_claims(&token)?;
        let identity = Identity::try_from(&claims)?;

        if identity.username.is_empty() {
            return Err(AuthError::EmptyIdentity);
        }
        Ok(identity)
    }
}

/// Find a cookie value by name across all `Cookie` headers.
///
/// The first occurrence wins. A value wrapped in double quotes is unwrapped.
fn session_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
}

/// Session gate middleware.
///
/// On success the resolved [`AppUser`](crate::directory::AppUser) is stored
/// in the request extensions for [`CurrentUser`](super::CurrentUser).
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/users/me", get(get_current_user))
///     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_session));
/// ```
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match state.session_gate.authenticate(request.headers()) {
        Ok(identity) => identity,
        Err(err) => {
            match err {
                AuthError::MissingCredential => {
                    tracing::debug!(stage = err.stage(), "Session rejected: no cookie");
                }
                _ => {
                    tracing::warn!(stage = err.stage(), error = %err, "Session rejected");
                }
            }
            return err.into_response();
        }
    };

    let user = match state.directory.find_or_create(&identity).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!(
                username = %identity.username,
                error = %err,
                "User directory lookup failed"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::debug!(user_id = %user.id, username = %user.username, "Session authorized");
    request.extensions_mut().insert(user);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{
        sample_claims, seal_token, sealed_claims, test_auth_config, SCENARIO_ENVELOPE,
    };
    use crate::auth::{ClaimProblem, DecryptError, ParseError};
    use axum::http::HeaderValue;

    fn gate() -> SessionGate {
        SessionGate::new(&test_auth_config()).unwrap()
    }

    fn cookie_headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn known_envelope_yields_test_identity() {
        let identity = gate().authenticate_envelope(SCENARIO_ENVELOPE).unwrap();
        assert_eq!(
            identity,
            Identity {
                name: "Test Test".to_string(),
                username: "test".to_string(),
                email_verified: false,
                first_name: "Test".to_string(),
                last_name: "Test".to_string(),
                email: "test@test.com".to_string(),
            }
        );
    }

    #[test]
    fn reads_named_cookie_among_others() {
        let headers = cookie_headers(&[format!(
            "theme=dark; kc-access={SCENARIO_ENVELOPE}; lang=en"
        )
        .as_str()]);
        assert_eq!(gate().authenticate(&headers).unwrap().username, "test");
    }

    #[test]
    fn reads_cookie_from_second_header() {
        let headers = cookie_headers(&[
            "theme=dark",
            format!("kc-access={SCENARIO_ENVELOPE}").as_str(),
        ]);
        assert_eq!(gate().authenticate(&headers).unwrap().username, "test");
    }

    #[test]
    fn quoted_cookie_value_is_unwrapped() {
        let headers = cookie_headers(&[format!("kc-access=\"{SCENARIO_ENVELOPE}\"").as_str()]);
        assert!(gate().authenticate(&headers).is_ok());
    }

    #[test]
    fn similarly_named_cookie_is_ignored() {
        let headers = cookie_headers(&[format!("kc-access-old={SCENARIO_ENVELOPE}").as_str()]);
        assert!(matches!(
            gate().authenticate(&headers),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn missing_cookie_is_rejected() {
        assert!(matches!(
            gate().authenticate(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn empty_cookie_is_rejected() {
        let headers = cookie_headers(&["kc-access="]);
        assert!(matches!(
            gate().authenticate(&headers),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn malformed_base64_is_a_decode_error() {
        assert!(matches!(
            gate().authenticate_envelope("not base64!"),
            Err(AuthError::Decode(_))
        ));
    }

    #[test]
    fn short_envelope_is_a_decrypt_error() {
        // 6 bytes after decoding
        assert!(matches!(
            gate().authenticate_envelope("AAAAAAAA"),
            Err(AuthError::Decrypt(DecryptError::TooShort))
        ));
    }

    #[test]
    fn envelope_from_other_key_is_a_decrypt_error() {
        let mut config = test_auth_config();
        config.encryption_key =
            crate::config::EncryptionKey::new(b"ffffffffffffffffffffffffffffffff").unwrap();
        let other_gate = SessionGate::new(&config).unwrap();
        assert!(matches!(
            other_gate.authenticate_envelope(SCENARIO_ENVELOPE),
            Err(AuthError::Decrypt(DecryptError::Authentication))
        ));
    }

    #[test]
    fn sealed_garbage_is_a_parse_error() {
        let cookie = seal_token("definitely not a token");
        assert!(matches!(
            gate().authenticate_envelope(&cookie),
            Err(AuthError::Parse(ParseError::SegmentCount(1)))
        ));
    }

    #[test]
    fn string_email_verified_is_a_claim_error() {
        let mut claims = sample_claims();
        claims["email_verified"] = serde_json::json!("false");
        let err = gate()
            .authenticate_envelope(&sealed_claims(&claims))
            .unwrap_err();
        match err {
            AuthError::Claims(claim_err) => assert_eq!(
                claim_err.problems,
                vec![(
                    "email_verified",
                    ClaimProblem::WrongType { expected: "boolean" }
                )]
            ),
            other => panic!("expected claim error, got {other:?}"),
        }
    }

    #[test]
    fn empty_username_is_rejected() {
        let mut claims = sample_claims();
        claims["preferred_username"] = serde_json::json!("");
        assert!(matches!(
            gate().authenticate_envelope(&sealed_claims(&claims)),
            Err(AuthError::EmptyIdentity)
        ));
    }

    #[test]
    fn whitespace_username_is_passed_through() {
        let mut claims = sample_claims();
        claims["preferred_username"] = serde_json::json!("   ");
        let identity = gate()
            .authenticate_envelope(&sealed_claims(&claims))
            .unwrap();
        assert_eq!(identity.username, "   ");
    }
}
