//! Shared agent state handed to every request handler.

use std::path::PathBuf;

#[derive(Debug)]
pub struct AppState {
    /// Metrics script the endpoints run.
    pub script: PathBuf,
}

impl AppState {
    pub fn new(script: PathBuf) -> Self {
        Self { script }
    }
}
