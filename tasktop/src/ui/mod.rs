//! UI module root: exposes drawing functions for individual panels.

pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod header;
pub mod history;
pub mod ram;
pub mod system;
pub mod util;
