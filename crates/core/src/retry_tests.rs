// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn default_is_constant_five_seconds_forever() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(1), Some(secs(5)));
    assert_eq!(policy.delay_for(1_000), Some(secs(5)));
    assert!(policy.max_attempts.is_none());
}

#[yare::parameterized(
    first  = { 1, 1 },
    second = { 2, 2 },
    third  = { 3, 4 },
    fourth = { 4, 8 },
    capped = { 5, 10 },
    deep   = { 40, 10 },
)]
fn exponential_doubles_until_cap(attempt: u32, expected_secs: u64) {
    let policy = RetryPolicy::exponential(secs(1), secs(10));
    assert_eq!(policy.delay_for(attempt), Some(secs(expected_secs)));
}

#[test]
fn max_attempts_exhausts() {
    let policy = RetryPolicy::constant(secs(1)).with_max_attempts(3);
    assert_eq!(policy.delay_for(3), Some(secs(1)));
    assert_eq!(policy.delay_for(4), None);
}

#[test]
fn base_delay_override_keeps_shape() {
    let policy = RetryPolicy::exponential(secs(1), secs(60))
        .with_max_attempts(5)
        .with_base_delay(secs(3));
    assert_eq!(policy.delay_for(1), Some(secs(3)));
    assert_eq!(policy.delay_for(2), Some(secs(6)));
    assert_eq!(policy.max_attempts, Some(5));

    let constant = RetryPolicy::constant(secs(5)).with_base_delay(secs(2));
    assert_eq!(constant.delay_for(9), Some(secs(2)));
}

#[test]
fn base_delay_above_cap_raises_cap() {
    let policy = RetryPolicy::exponential(secs(1), secs(10)).with_base_delay(secs(30));
    assert_eq!(policy.delay_for(1), Some(secs(30)));
    assert_eq!(policy.delay_for(3), Some(secs(30)));
}

proptest! {
    #[test]
    fn exponential_never_exceeds_cap(base_ms in 1u64..10_000, max_ms in 1u64..600_000, attempt in 1u32..200) {
        let policy = RetryPolicy::exponential(Duration::from_millis(base_ms), Duration::from_millis(max_ms));
        let delay = policy.delay_for(attempt).unwrap();
        prop_assert!(delay <= Duration::from_millis(max_ms));
    }

    #[test]
    fn exponential_is_non_decreasing(base_ms in 1u64..10_000, attempt in 1u32..100) {
        let policy = RetryPolicy::exponential(Duration::from_millis(base_ms), secs(3600));
        prop_assert!(policy.delay_for(attempt) <= policy.delay_for(attempt + 1));
    }
}
