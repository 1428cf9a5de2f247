//! End-to-end breaker scenarios on virtual time.

use std::time::Duration;

use circuit_breaker::{BreakerError, Counts, ExecuteError, Settings, State, TwoStepCircuitBreaker};

mod common;

use common::{breaker_with_clock, fail, recording_settings, succeed, BackendDown};

#[test]
fn test_default_settings_trip_probe_and_recover() {
    let (settings, transitions) = recording_settings("orders");
    let (cb, clock) = breaker_with_clock(settings);

    for attempt in 1..=6 {
        let err = fail(&cb).unwrap_err();
        assert!(matches!(err, ExecuteError::Inner(BackendDown)), "attempt {}", attempt);
    }
    assert_eq!(cb.state(), State::Open);

    let err = succeed(&cb).unwrap_err();
    assert_eq!(err.rejection(), Some(BreakerError::Open));

    clock.advance(Duration::from_secs(61));
    assert_eq!(cb.state(), State::HalfOpen);

    assert!(succeed(&cb).is_ok());
    assert_eq!(cb.state(), State::Closed);
    assert_eq!(cb.counts(), Counts::default());

    let log = transitions.lock().unwrap();
    let states: Vec<_> = log.iter().map(|(_, from, to)| (*from, *to)).collect();
    assert_eq!(
        states,
        vec![
            (State::Closed, State::Open),
            (State::Open, State::HalfOpen),
            (State::HalfOpen, State::Closed),
        ]
    );
    assert!(log.iter().all(|(name, _, _)| name == "orders"));
}

#[test]
fn test_open_rejects_until_timeout_elapses() {
    let (cb, clock) = breaker_with_clock(Settings::new("catalog").timeout(Duration::from_secs(10)));
    for _ in 0..6 {
        let _ = fail(&cb);
    }

    for _ in 0..9 {
        clock.advance(Duration::from_secs(1));
        assert_eq!(succeed(&cb).unwrap_err().rejection(), Some(BreakerError::Open));
        assert_eq!(cb.counts().requests, 0);
    }

    clock.advance(Duration::from_secs(2));
    assert_eq!(cb.state(), State::HalfOpen);
}

#[test]
fn test_half_open_admits_exactly_max_requests() {
    let tscb = {
        let (cb, clock) = breaker_with_clock(Settings::new("probes").max_requests(3));
        for _ in 0..6 {
            let _ = fail(&cb);
        }
        clock.advance(Duration::from_secs(61));
        TwoStepCircuitBreaker::from(cb)
    };

    let first = tscb.allow().unwrap();
    let second = tscb.allow().unwrap();
    let third = tscb.allow().unwrap();
    assert_eq!(tscb.allow().unwrap_err(), BreakerError::TooManyRequests);
    assert_eq!(tscb.state(), State::HalfOpen);

    first.success();
    second.success();
    third.success();
    assert_eq!(tscb.state(), State::Closed);
    assert_eq!(tscb.counts(), Counts::default());
}

#[test]
fn test_single_probe_failure_reopens() {
    let (cb, clock) = breaker_with_clock(Settings::new("reopen").max_requests(5));
    for _ in 0..6 {
        let _ = fail(&cb);
    }
    clock.advance(Duration::from_secs(61));

    for _ in 0..4 {
        assert!(succeed(&cb).is_ok());
    }
    assert_eq!(cb.state(), State::HalfOpen);
    assert!(fail(&cb).is_err());
    assert_eq!(cb.state(), State::Open);
    assert_eq!(cb.counts(), Counts::default());
}

#[test]
fn test_interval_resets_counts_while_closed() {
    let (cb, clock) = breaker_with_clock(Settings::new("interval").interval(Duration::from_secs(30)));
    let tscb = TwoStepCircuitBreaker::from(cb.clone());

    for _ in 0..3 {
        tscb.allow().unwrap().success();
    }
    assert_eq!(cb.counts().requests, 3);

    clock.advance(Duration::from_secs(31));
    assert_eq!(cb.counts(), Counts::default());
    assert_eq!(tscb.counts(), Counts::default());
    assert_eq!(cb.state(), State::Closed);
}

#[test]
fn test_counts_read_after_interval_without_other_calls() {
    let (cb, clock) = breaker_with_clock(Settings::new("counts-only").interval(Duration::from_secs(5)));

    for _ in 0..3 {
        assert!(succeed(&cb).is_ok());
    }
    clock.advance(Duration::from_secs(6));
    assert_eq!(cb.counts(), Counts::default());
}

#[test]
fn test_counts_read_after_open_timeout() {
    let (settings, transitions) = recording_settings("open-counts");
    let (cb, clock) = breaker_with_clock(settings);
    for _ in 0..6 {
        let _ = fail(&cb);
    }

    clock.advance(Duration::from_secs(61));
    assert_eq!(cb.counts(), Counts::default());
    let last = transitions.lock().unwrap().last().map(|(_, from, to)| (*from, *to));
    assert_eq!(last, Some((State::Open, State::HalfOpen)));
}

#[test]
fn test_interval_prevents_slow_failures_from_tripping() {
    let (cb, clock) = breaker_with_clock(Settings::new("slow").interval(Duration::from_secs(5)));

    for _ in 0..20 {
        let _ = fail(&cb);
        let _ = fail(&cb);
        clock.advance(Duration::from_secs(6));
    }
    assert_eq!(cb.state(), State::Closed);
}

#[test]
fn test_report_from_superseded_window_is_ignored() {
    let (cb, clock) = breaker_with_clock(Settings::new("stale"));
    let tscb = TwoStepCircuitBreaker::from(cb.clone());

    let slow = tscb.allow().unwrap();
    for _ in 0..6 {
        let _ = fail(&cb);
    }
    clock.advance(Duration::from_secs(61));
    assert!(succeed(&cb).is_ok());
    assert_eq!(cb.state(), State::Closed);

    let generation = cb.generation();
    slow.failure();
    assert_eq!(cb.counts(), Counts::default());
    assert_eq!(cb.generation(), generation);
}
