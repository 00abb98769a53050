// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner identification for bot records.
//!
//! Every bot belongs to exactly one dashboard account. The manager never
//! interprets the owner; it is carried so the boundary layer can authorize
//! requests and so the boot sweep can be filtered per account.

crate::define_id! {
    /// Identifier of the account that owns a bot.
    pub struct OwnerId;
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
