//! Builds one snapshot per request: run the script, scan its report, then
//! merge the auxiliary probes. Nothing is cached between requests.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::enrich;
use crate::exec::{run_with_limits, CommandOutput, ExecError, Limits};
use crate::parser::parse_report;
use crate::settings;
use crate::state::AppState;
use crate::types::MetricsSnapshot;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("{script} not found")]
    MissingScript { script: String },
    /// Both interpreters were tried and both failed.
    #[error("script failed under bash ({bash}) and sh ({sh})")]
    Execution { bash: String, sh: String },
}

/// One full metrics pass over the host.
pub async fn assemble(state: &AppState) -> Result<MetricsSnapshot, AssembleError> {
    let raw = run_script(&state.script).await?;
    debug!("script produced {} bytes of report text", raw.stdout.len());
    if !raw.stderr.trim().is_empty() {
        warn!(
            "script wrote to stderr: {}",
            raw.stderr.trim().chars().take(200).collect::<String>()
        );
    }
    let mut snapshot = parse_report(&raw.stdout);
    let found = enrich::gather().await;
    enrich::apply(&mut snapshot, found);
    snapshot.system.platform = Some(std::env::consts::OS.to_string());
    Ok(snapshot)
}

/// Runs the script under bash, falling back to sh so hosts without bash still
/// report. A missing script file is its own error before anything runs.
pub async fn run_script(script: &Path) -> Result<CommandOutput, AssembleError> {
    if !script.exists() {
        return Err(AssembleError::MissingScript {
            script: script_name(script),
        });
    }
    let limits = script_limits();
    let path = script.to_string_lossy();
    let bash_err = match run_with_limits("bash", &[path.as_ref()], &limits).await {
        Ok(out) => return Ok(out),
        Err(e) => e,
    };
    warn!("bash run failed, retrying under sh: {bash_err}");
    match run_with_limits("sh", &[path.as_ref()], &limits).await {
        Ok(out) => Ok(out),
        Err(sh_err) => Err(AssembleError::Execution {
            bash: bash_err.to_string(),
            sh: sh_err.to_string(),
        }),
    }
}

/// Report runs use bash alone; the raw text goes to the caller untouched.
pub async fn run_report(script: &Path) -> Result<CommandOutput, ExecError> {
    let path = script.to_string_lossy();
    run_with_limits("bash", &[path.as_ref()], &script_limits()).await
}

fn script_limits() -> Limits {
    Limits {
        timeout: settings::script_timeout(),
        max_output_bytes: settings::max_output_bytes(),
    }
}

/// File name shown in errors; falls back to the whole path when there is no
/// final component.
pub fn script_name(script: &Path) -> String {
    script
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.display().to_string())
}
