// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_starts_at_construction_time() {
    let clock = FakeClock::new();
    let before = Utc::now();
    let now = clock.now();
    assert!(now >= before - Duration::seconds(1));
}

#[test]
fn fake_clock_advance_moves_time_forward() {
    let clock = FakeClock::new();
    let start = clock.now();
    clock.advance(Duration::hours(3));
    assert_eq!(clock.now(), start + Duration::hours(3));
}

#[test]
fn fake_clock_set_overrides_time() {
    let clock = FakeClock::new();
    let target = Utc::now() - Duration::days(7);
    clock.set(target);
    assert_eq!(clock.now(), target);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();
    clock.advance(Duration::minutes(5));
    assert_eq!(clock.now(), other.now());
}

#[test]
fn system_clock_tracks_utc_now() {
    let clock = SystemClock;
    let a = clock.now();
    let b = Utc::now();
    assert!(b - a < Duration::seconds(5));
}
