//! Dashboard library: fetching, bounded histories, chart shaping, and the
//! terminal UI that draws them.

pub mod api;
pub mod app;
pub mod charts;
pub mod history;
pub mod profiles;
pub mod types;
pub mod ui;
pub mod units;
