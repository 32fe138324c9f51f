// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compact token payload extraction.
//!
//! The decrypted envelope holds a compact `header.payload.signature` token.
//! Only the payload segment is decoded. The signature segment is NOT
//! verified: the envelope was sealed by the upstream identity proxy, and
//! possession of the envelope key is what establishes trust.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims decoded from the token payload, keyed by claim name.
pub type ClaimSet = Map<String, Value>;

/// Number of dot-separated segments in a compact token.
const SEGMENT_COUNT: usize = 3;

/// The decrypted plaintext is not a usable compact token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("compact token has {0} segments, expected 3")]
    SegmentCount(usize),
    #[error("token payload is not valid base64url")]
    PayloadEncoding,
    #[error("token payload is not a JSON object: {0}")]
    PayloadJson(String),
}

/// Decode the payload segment of a compact token into a claim set.
pub fn extract_claims(token: &str) -> Result<ClaimSet, ParseError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(ParseError::SegmentCount(segments.len()));
    }

    let payload =
        Base64UrlUnpadded::decode_vec(segments[1]).map_err(|_| ParseError::PayloadEncoding)?;

    serde_json::from_slice::<ClaimSet>(&payload).map_err(|e| ParseError::PayloadJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{b64url, sample_claims, token_with_payload};

    #[test]
    fn extracts_payload_claims() {
        let token = token_with_payload(&sample_claims().to_string());
        let claims = extract_claims(&token).unwrap();
        assert_eq!(claims["preferred_username"], "test");
        assert_eq!(claims["email_verified"], false);
    }

    #[test]
    fn signature_segment_is_not_checked() {
        let payload = b64url(br#"{"preferred_username":"test"}"#);
        let token = format!("not-a-header.{payload}.%%% not a signature %%%");
        assert_eq!(extract_claims(&token).unwrap()["preferred_username"], "test");
    }

    #[test]
    fn wrong_segment_count_is_rejected() {
        assert_eq!(extract_claims("abc"), Err(ParseError::SegmentCount(1)));
        assert_eq!(extract_claims("a.b"), Err(ParseError::SegmentCount(2)));
        assert_eq!(extract_claims("a.b.c.d"), Err(ParseError::SegmentCount(4)));
        assert_eq!(extract_claims(""), Err(ParseError::SegmentCount(1)));
    }

    #[test]
    fn invalid_base64url_payload_is_rejected() {
        assert_eq!(
            extract_claims("h.e30=.s"),
            Err(ParseError::PayloadEncoding)
        );
        assert_eq!(
            extract_claims("h.+/+/.s"),
            Err(ParseError::PayloadEncoding)
        );
    }

    #[test]
    fn invalid_json_payload_is_rejected() {
        let token = token_with_payload("{not json");
        assert!(matches!(
            extract_claims(&token),
            Err(ParseError::PayloadJson(_))
        ));
    }

    #[test]
    fn non_object_json_payload_is_rejected() {
        let token = token_with_payload(r#"["preferred_username"]"#);
        assert!(matches!(
            extract_claims(&token),
            Err(ParseError::PayloadJson(_))
        ));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            extract_claims("h..s"),
            Err(ParseError::PayloadJson(_))
        ));
    }
}
