//! Tests for profile load/save and resolution logic (non-interactive paths only)
use std::fs;
use std::process::Command;
use std::sync::Mutex;

// Global lock to serialize tests that mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn run_tasktop(args: &[&str]) -> (bool, String) {
    let exe = env!("CARGO_BIN_EXE_tasktop");
    let output = Command::new(exe).args(args).output().expect("run tasktop");
    let ok = output.status.success();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (ok, text)
}

fn config_dir() -> std::path::PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        std::path::PathBuf::from(xdg).join("tasktop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("tasktop")
    }
}

fn profiles_path() -> std::path::PathBuf {
    config_dir().join("profiles.json")
}

#[test]
fn test_profile_created_on_first_use() {
    let _guard = ENV_LOCK.lock().unwrap();
    // Isolate config in a temp dir; the spawned binary inherits the env
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());
    std::fs::create_dir_all(td.path().join("tasktop")).unwrap();
    let _ = fs::remove_file(profiles_path());
    // Profile + url => should create profiles.json without connecting
    let (_ok, _out) = run_tasktop(&["--profile", "unittest", "http://example:1", "--dry-run"]);
    let data = fs::read_to_string(profiles_path()).expect("profiles.json created");
    assert!(
        data.contains("unittest"),
        "profiles.json missing profile entry: {data}"
    );
    assert!(
        data.contains("http://example:1"),
        "profiles.json missing profile url: {data}"
    );
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());
    std::fs::create_dir_all(td.path().join("tasktop")).unwrap();
    let _ = fs::remove_file(profiles_path());
    // Initial create
    let (_ok, _out) = run_tasktop(&["--profile", "prod", "http://one:3000", "--dry-run"]);
    let first = fs::read_to_string(profiles_path()).unwrap();
    // Re-run identical (should not duplicate or corrupt)
    let (_ok2, _out2) = run_tasktop(&["--profile", "prod", "http://one:3000", "--dry-run"]);
    let second = fs::read_to_string(profiles_path()).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");
    // Overwrite with different URL using --save (no prompt path)
    let (_ok3, _out3) = run_tasktop(&["--profile", "prod", "--save", "http://two:3000", "--dry-run"]);
    let third = fs::read_to_string(profiles_path()).unwrap();
    assert!(third.contains("two"), "Updated URL not written: {third}");
}

#[test]
fn test_saved_profile_resolves_by_name() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());
    std::fs::create_dir_all(td.path().join("tasktop")).unwrap();
    let _ = fs::remove_file(profiles_path());
    let (_ok, _out) = run_tasktop(&["--profile", "lab", "http://lab-host:3000", "--dry-run"]);
    // Name alone should resolve to the stored URL
    let (_ok2, out2) = run_tasktop(&["--profile", "lab", "--dry-run"]);
    assert!(
        out2.contains("http://lab-host:3000"),
        "stored URL not resolved: {out2}"
    );
}
