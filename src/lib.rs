pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;

pub use gho_indicators_common as common;
