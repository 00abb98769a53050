// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::test_support::{active_record, bot_record};
use yare::parameterized;

fn errored(id: &str) -> BotRecord {
    let mut record = bot_record(id);
    record.status = BotStatus::Error;
    record
}

#[parameterized(
    all_matches_inactive = { BotFilter::all(), bot_record("b1"), true },
    all_matches_active = { BotFilter::all(), active_record("b1"), true },
    active_skips_inactive = { BotFilter::active(), bot_record("b1"), false },
    active_matches_active = { BotFilter::active(), active_record("b1"), true },
    owner_matches = { BotFilter::all().owner("owner-1"), bot_record("b1"), true },
    owner_mismatch = { BotFilter::all().owner("owner-2"), bot_record("b1"), false },
    status_matches = { BotFilter::all().status(BotStatus::Error), errored("b1"), true },
    status_mismatch = { BotFilter::all().status(BotStatus::Online), errored("b1"), false },
    combined_requires_all = { BotFilter::active().status(BotStatus::Error), errored("b1"), false },
)]
fn filter_matches(filter: BotFilter, record: BotRecord, expected: bool) {
    assert_eq!(filter.matches(&record), expected);
}

#[test]
fn filter_serializes_only_set_fields() {
    let json = serde_json::to_value(BotFilter::active()).unwrap();
    assert_eq!(json, serde_json::json!({ "active": true }));
}
