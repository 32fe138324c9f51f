// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CipherError, ServiceKeyGate, SessionGate};
use crate::config::AuthConfig;
use crate::directory::UserDirectory;

/// Shared application state.
///
/// Gates are built once from [`AuthConfig`] and are read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub session_gate: Arc<SessionGate>,
    pub service_gate: Arc<ServiceKeyGate>,
    pub directory: Arc<dyn UserDirectory>,
}

impl AppState {
    pub fn new(config: AuthConfig, directory: Arc<dyn UserDirectory>) -> Result<Self, CipherError> {
        Ok(Self {
            session_gate: Arc::new(SessionGate::new(&config)?),
            service_gate: Arc::new(ServiceKeyGate::new(config.service_key)),
            directory,
        })
    }
}
