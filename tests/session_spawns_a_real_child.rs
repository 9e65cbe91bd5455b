// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Integration tests against the public [`terminator_core::Session`] API, spawning a
//! real child behind a real PTY. Serialized with `serial_test` since concurrent
//! access to the platform's PTY allocator isn't safe to assume everywhere.

use serial_test::serial;
use terminator_core::log::SessionLog;
use terminator_core::observer::null_observer;
use terminator_core::session::{Session, StepOutcome};

#[tokio::test]
#[serial]
async fn echoed_command_appears_on_the_screen() {
    let mut session = Session::spawn(
        Some("echo"),
        &["integration-test-marker".into()],
        None,
        true,
        80,
        24,
        false,
        SessionLog::disabled(),
        null_observer(),
    )
    .expect("spawn should succeed");

    session.run_until_exit().await;

    assert!(session.screen().display_row(0).contains("integration-test-marker"));
}

#[tokio::test]
#[serial]
async fn nonzero_exit_status_is_reported_and_session_stays_open() {
    let mut session = Session::spawn(
        Some("false"),
        &[],
        None,
        true,
        80,
        24,
        false,
        SessionLog::disabled(),
        null_observer(),
    )
    .expect("spawn should succeed");

    // A nonzero exit never auto-closes, so the single step carrying the exit event
    // is expected to report `Continue`, with the connection-loss notice now visible.
    let outcome = session.step().await;

    assert_eq!(outcome, StepOutcome::Continue);
    assert!(session.screen().display_row(1).contains("exited with status 1"));

    session.cancel();
}
