use assert_cmd::Command;

#[test]
fn help_lists_options() {
    let output = Command::cargo_bin("wordpace")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--secs", "--prompt", "--file", "--voice", "--mute", "--start"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn rejects_unlisted_time_budget() {
    Command::cargo_bin("wordpace")
        .unwrap()
        .args(["--secs", "17"])
        .assert()
        .failure();
}

#[test]
fn refuses_to_run_without_a_tty() {
    let output = Command::cargo_bin("wordpace")
        .unwrap()
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("stdin must be a tty"));
}
