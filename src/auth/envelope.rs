// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Text form of the session envelope.
//!
//! Cookies carry the sealed bytes as standard-alphabet base64 without `=`
//! padding. Decoding is strict: padding, whitespace, characters outside the
//! alphabet and non-canonical trailing bits are all rejected.

use base64ct::{Base64Unpadded, Encoding};
use thiserror::Error;

/// The envelope text is not valid unpadded base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session envelope is not valid unpadded base64")]
pub struct DecodeError;

/// Decode the cookie text into the sealed envelope bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    Base64Unpadded::decode_vec(text).map_err(|_| DecodeError)
}

/// Encode sealed envelope bytes into cookie text.
pub fn encode(sealed: &[u8]) -> String {
    Base64Unpadded::encode_string(sealed)
}
