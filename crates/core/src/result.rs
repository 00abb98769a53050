// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured operation results returned by the lifecycle manager.
//!
//! Manager operations never return `Err`; every failure is an [`OpResult`]
//! with `success: false` and an [`ErrorKind`] tag the boundary layer can
//! map to its own status codes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Failure taxonomy for manager operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unknown bot id
    NotFound,
    /// Operation requires a live connection
    NotRunning,
    /// Operation requires the `connected` state
    NotConnected,
    /// Unsupported command name
    UnknownCommand,
    /// Command params did not validate
    InvalidParams,
    /// Network, handshake or storage failure
    Underlying,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::NotRunning => "not running",
            ErrorKind::NotConnected => "not connected",
            ErrorKind::UnknownCommand => "unknown command",
            ErrorKind::InvalidParams => "invalid params",
            ErrorKind::Underlying => "underlying error",
        };
        f.write_str(s)
    }
}

/// `{success, message}` result, optionally carrying reply data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl OpResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            data: Value::Null,
        }
    }

    pub fn fail(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(kind),
            data: Value::Null,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn not_found() -> Self {
        Self::fail(ErrorKind::NotFound, "Bot not found")
    }

    pub fn not_running() -> Self {
        Self::fail(ErrorKind::NotRunning, "Bot is not running")
    }

    pub fn not_connected() -> Self {
        Self::fail(ErrorKind::NotConnected, "Bot is not connected")
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.error == Some(kind)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
