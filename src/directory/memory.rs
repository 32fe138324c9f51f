// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AppUser, DirectoryError, UserDirectory};
use crate::auth::Identity;

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, AppUser>>,
    resolutions: AtomicU64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_or_create` calls served so far.
    pub fn resolutions(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_or_create(&self, identity: &Identity) -> Result<AppUser, DirectoryError> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);

        if identity.username.is_empty() {
            return Err(DirectoryError::InvalidUsername(identity.username.clone()));
        }

        let mut users = self.users.write().await;
        match users.get_mut(&identity.username) {
            Some(user) => {
                user.refresh_profile(identity);
                Ok(user.clone())
            }
            None => {
                let user = AppUser::from_identity(identity);
                tracing::info!(user_id = %user.id, username = %user.username, "Created user");
                users.insert(user.username.clone(), user.clone());
                Ok(user)
            }
        }
    }

    async fn find(&self, username: &str) -> Result<Option<AppUser>, DirectoryError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn list(&self) -> Result<Vec<AppUser>, DirectoryError> {
        let mut users: Vec<AppUser> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}
