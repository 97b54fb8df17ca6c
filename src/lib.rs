// src/lib.rs — Library root for rageval

pub mod cli;
pub mod dialogue;
pub mod infra;
pub mod metrics;
pub mod prompt;
pub mod util;
