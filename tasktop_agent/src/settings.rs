//! Runtime knobs, each read from the environment once and cached.

use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Script the agent runs when no `--script` flag overrides it.
pub fn default_script() -> PathBuf {
    static SCRIPT: OnceCell<PathBuf> = OnceCell::new();
    SCRIPT
        .get_or_init(|| {
            std::env::var_os("TASKTOP_AGENT_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("Tasks.sh"))
        })
        .clone()
}

/// Wall-clock bound for one run of the metrics script.
pub fn script_timeout() -> Duration {
    static MS: OnceCell<u64> = OnceCell::new();
    Duration::from_millis(*MS.get_or_init(|| env_u64("TASKTOP_AGENT_TIMEOUT_MS", 30_000)))
}

/// Wall-clock bound for each auxiliary query (df, lscpu, free, uptime, ps).
pub fn aux_timeout() -> Duration {
    static MS: OnceCell<u64> = OnceCell::new();
    Duration::from_millis(*MS.get_or_init(|| env_u64("TASKTOP_AGENT_AUX_TIMEOUT_MS", 10_000)))
}

/// Output cap for the metrics script, in bytes.
pub fn max_output_bytes() -> usize {
    static CAP: OnceCell<usize> = OnceCell::new();
    *CAP.get_or_init(|| env_u64("TASKTOP_AGENT_MAX_OUTPUT_BYTES", 10 * 1024 * 1024) as usize)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_env_falls_back_to_defaults() {
        assert_eq!(env_u64("TASKTOP_TEST_UNSET_KNOB", 42), 42);
    }

    #[test]
    fn garbage_env_values_fall_back_too() {
        std::env::set_var("TASKTOP_TEST_BAD_KNOB", "not-a-number");
        assert_eq!(env_u64("TASKTOP_TEST_BAD_KNOB", 7), 7);
        std::env::remove_var("TASKTOP_TEST_BAD_KNOB");
    }
}
