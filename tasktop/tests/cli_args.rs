//! CLI arg parsing tests for tasktop (client)
use std::process::Command;

#[test]
fn test_help_mentions_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_tasktop"))
        .arg("--help")
        .output()
        .expect("run tasktop --help");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        text.contains("--profile")
            && text.contains("-P")
            && text.contains("--save")
            && text.contains("--demo")
            && text.contains("--dry-run"),
        "help text missing expected flags (--profile/-P, --save, --demo, --dry-run)\n{text}"
    );
}

#[test]
fn test_flags_accepted_alongside_help() {
    // Combine flags with --help to exercise arg acceptance without a network attempt
    let exe = env!("CARGO_BIN_EXE_tasktop");
    let out = Command::new(exe)
        .args(["--profile", "dev", "--help"])
        .output()
        .expect("run tasktop");
    assert!(
        out.status.success(),
        "tasktop --profile dev --help did not succeed"
    );
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(text.contains("Usage:"));

    let out2 = Command::new(exe)
        .args(["-P", "dev", "--save", "--help"])
        .output()
        .expect("run tasktop");
    assert!(out2.status.success(), "tasktop -P dev --help did not succeed");
    let text2 = format!(
        "{}{}",
        String::from_utf8_lossy(&out2.stdout),
        String::from_utf8_lossy(&out2.stderr)
    );
    assert!(text2.contains("Usage:"));
}

#[test]
fn test_second_positional_rejected() {
    let out = Command::new(env!("CARGO_BIN_EXE_tasktop"))
        .args(["http://one:3000", "http://two:3000"])
        .output()
        .expect("run tasktop");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(
        text.contains("Unexpected argument"),
        "expected a usage complaint, got: {text}"
    );
}
