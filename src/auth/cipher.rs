// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-GCM session envelope cipher.
//!
//! ## Wire Layout
//!
//! ```text
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! No associated data is bound. The key is the raw 32-byte
//! [`EncryptionKey`]; there is no key-derivation step.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use crate::config::EncryptionKey;

/// Length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Failure to open a sealed envelope.
///
/// No plaintext is ever returned alongside one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptError {
    #[error("ciphertext too short")]
    TooShort,
    #[error("authentication tag mismatch")]
    Authentication,
    #[error("decrypted token is not valid UTF-8")]
    NotUtf8,
}

/// Failure to set up the cipher or to seal a plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("encryption key rejected by AES-256-GCM")]
    InvalidKey,
    #[error("failed to generate a nonce")]
    NonceGeneration,
    #[error("encryption failed")]
    Seal,
}

/// Authenticated cipher for session envelopes.
pub struct SessionCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl SessionCipher {
    pub fn new(key: &EncryptionKey) -> Result<Self, CipherError> {
        let unbound =
            UnboundKey::new(&AES_256_GCM, key.as_bytes()).map_err(|_| CipherError::InvalidKey)?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Open a sealed envelope and return the UTF-8 plaintext.
    ///
    /// Inputs shorter than the nonce are rejected before any slicing.
    pub fn open(&self, sealed: &[u8]) -> Result<String, DecryptError> {
        if sealed.len() < NONCE_LEN {
            return Err(DecryptError::TooShort);
        }
        let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| DecryptError::TooShort)?;

        let mut in_out = body.to_vec();
        let plaintext_len = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| DecryptError::Authentication)?
            .len();
        in_out.truncate(plaintext_len);

        String::from_utf8(in_out).map_err(|_| DecryptError::NotUtf8)
    }

    /// Seal a plaintext under a fresh random nonce.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| CipherError::NonceGeneration)?;
        self.seal_with_nonce(nonce, plaintext)
    }

    /// Seal a plaintext under a caller-chosen nonce.
    ///
    /// A nonce must never be reused with the same key.
    fn seal_with_nonce(
        &self,
        nonce: [u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
            .map_err(|_| CipherError::Seal)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&in_out);
        Ok(sealed)
    }
}
