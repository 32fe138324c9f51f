// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module decides, for every request, whether the caller is an
//! authenticated end user or a trusted internal service.
//!
//! ## Session Flow
//!
//! 1. The upstream identity proxy validates the user's login and hands the
//!    browser a `kc-access` cookie holding
//!    `base64_unpadded(nonce[12] || AES-256-GCM(token))`
//! 2. The session gate:
//!    - decodes the unpadded base64 envelope (`envelope`)
//!    - opens it with the process encryption key (`cipher`)
//!    - reads the payload segment of the embedded compact token (`token`)
//!    - maps six claims into an [`Identity`] (`identity`)
//!    - resolves the durable [`AppUser`](crate::directory::AppUser) via the
//!      user directory and stores it in the request extensions
//! 3. Handlers read the user with the [`CurrentUser`] extractor
//!
//! ## Service Flow
//!
//! Internal routes compare the `Authorization` header against the shared
//! internal key in constant time (`service_key`).
//!
//! ## Security
//!
//! - Every rejection is `403 Forbidden` with an empty body, whatever stage failed
//! - The embedded token's own signature is never verified: trust is anchored
//!   in possession of the encryption key that sealed the envelope
//! - Token expiry is not enforced here

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod service_key;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use cipher::{CipherError, DecryptError, SessionCipher};
pub use envelope::DecodeError;
pub use error::AuthError;
pub use extractor::CurrentUser;
pub use identity::{ClaimError, ClaimProblem, Identity};
pub use service_key::{require_service_key, ServiceKeyGate};
pub use session::{require_session, SessionGate};
pub use token::{ClaimSet, ParseError};
