// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity mapped from session token claims.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::token::ClaimSet;

/// Claim names read from the token payload.
pub mod claim {
    pub const NAME: &str = "name";
    pub const USERNAME: &str = "preferred_username";
    pub const EMAIL_VERIFIED: &str = "email_verified";
    pub const GIVEN_NAME: &str = "given_name";
    pub const FAMILY_NAME: &str = "family_name";
    pub const EMAIL: &str = "email";
}

/// Verified end-user identity for the current request.
///
/// Built fresh per request and handed to the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Display name (`name`)
    pub name: String,
    /// Login name (`preferred_username`), the directory key
    pub username: String,
    /// `email_verified`
    pub email_verified: bool,
    /// `given_name`
    pub first_name: String,
    /// `family_name`
    pub last_name: String,
    /// `email`
    pub email: String,
}

/// What is wrong with one required claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimProblem {
    Missing,
    WrongType { expected: &'static str },
}

/// One or more required claims are missing or have the wrong JSON type.
///
/// Problems are listed in claim order, so the error is deterministic for
/// a given payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid token claims: {problems:?}")]
pub struct ClaimError {
    pub problems: Vec<(&'static str, ClaimProblem)>,
}

/// Collects typed claims, recording every failure instead of stopping.
struct ClaimReader<'a> {
    claims: &'a ClaimSet,
    problems: Vec<(&'static str, ClaimProblem)>,
}

impl<'a> ClaimReader<'a> {
    fn new(claims: &'a ClaimSet) -> Self {
        Self {
            claims,
            problems: Vec::new(),
        }
    }

    fn string(&mut self, field: &'static str) -> String {
        match self.claims.get(field) {
            Some(Value::String(value)) => value.clone(),
            Some(_) => {
                self.problems
                    .push((field, ClaimProblem::WrongType { expected: "string" }));
                String::new()
            }
            None => {
                self.problems.push((field, ClaimProblem::Missing));
                String::new()
            }
        }
    }

    fn boolean(&mut self, field: &'static str) -> bool {
        match self.claims.get(field) {
            Some(Value::Bool(value)) => *value,
            Some(_) => {
                self.problems
                    .push((field, ClaimProblem::WrongType { expected: "boolean" }));
                false
            }
            None => {
                self.problems.push((field, ClaimProblem::Missing));
                false
            }
        }
    }
}

impl TryFrom<&ClaimSet> for Identity {
    type Error = ClaimError;

    fn try_from(claims: &ClaimSet) -> Result<Self, Self::Error> {
        let mut reader = ClaimReader::new(claims);

        let identity = Identity {
            name: reader.string(claim::NAME),
            username: reader.string(claim::USERNAME),
            email_verified: reader.boolean(claim::EMAIL_VERIFIED),
            first_name: reader.string(claim::GIVEN_NAME),
            last_name: reader.string(claim::FAMILY_NAME),
            email: reader.string(claim::EMAIL),
        };

        if reader.problems.is_empty() {
            Ok(identity)
        } else {
            Err(ClaimError {
                problems: reader.problems,
            })
        }
    }
}
