// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Directory
//!
//! Maps a validated session identity to the durable application user,
//! creating the user the first time a username is seen.
//!
//! The session gate depends only on the [`UserDirectory`] trait. The
//! in-memory implementation backs the binary and the tests; a persistent
//! implementation plugs in behind the same trait.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Identity;

pub use memory::InMemoryUserDirectory;

/// Application user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppUser {
    /// Stable application user ID
    pub id: Uuid,
    /// Login name from the identity provider (`preferred_username`)
    pub username: String,
    /// Display name
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified: bool,
    /// When the user was first seen
    pub created_at: DateTime<Utc>,
}

impl AppUser {
    /// Create a new user record from a session identity.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: identity.username.clone(),
            name: identity.name.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified,
            created_at: Utc::now(),
        }
    }

    /// Refresh profile fields from a newer identity, keeping id and creation time.
    pub fn refresh_profile(&mut self, identity: &Identity) {
        self.name = identity.name.clone();
        self.first_name = identity.first_name.clone();
        self.last_name = identity.last_name.clone();
        self.email = identity.email.clone();
        self.email_verified = identity.email_verified;
    }
}

/// User directory errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
    #[error("invalid username {0:?}")]
    InvalidUsername(String),
}

/// Lookup and creation of application users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the user for `identity.username`, creating it if absent.
    async fn find_or_create(&self, identity: &Identity) -> Result<AppUser, DirectoryError>;

    /// Look up a user by username.
    async fn find(&self, username: &str) -> Result<Option<AppUser>, DirectoryError>;

    /// All users, ordered by username.
    async fn list(&self) -> Result<Vec<AppUser>, DirectoryError>;
}
