// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn owner_id_round_trips_through_json() {
    let owner = OwnerId::new("user-42");
    let json = serde_json::to_string(&owner).unwrap();
    assert_eq!(json, "\"user-42\"");
    let parsed: OwnerId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, "user-42");
}
