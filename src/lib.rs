// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Arcade Gateway - Game Platform API
//!
//! This crate provides the HTTP front door of the game platform: every
//! request is authenticated either as an end user (encrypted `kc-access`
//! session cookie) or as a trusted internal service (shared API key).
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session envelope decryption, claim mapping, request gates
//! - `directory` - User directory (validated username → application user)
//! - `config` - Startup configuration from the environment

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod state;
