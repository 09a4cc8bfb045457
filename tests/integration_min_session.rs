// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("wordpace");
    let cmd = format!(
        "{} --mute --start -p hi --log-file {}",
        bin.display(),
        dir.path().join("wordpace.log").display()
    );

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Type the only word and its terminating space to finish the session
    p.send("hi ")?;

    std::thread::sleep(Duration::from_millis(200));

    // 'q' quits from the summary screen
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}
