pub mod commands;
pub mod config;
pub mod host;

pub use host::*;
