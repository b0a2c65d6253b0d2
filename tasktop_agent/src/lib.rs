//! Agent library: script execution, report scanning, auxiliary probes, and
//! the HTTP surface that serves the assembled snapshot.

pub mod assemble;
pub mod enrich;
pub mod exec;
pub mod http;
pub mod parser;
pub mod settings;
pub mod state;
pub mod types;
