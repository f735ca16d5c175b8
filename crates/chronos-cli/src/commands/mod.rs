pub mod config;
pub mod stats;
pub mod sync;
pub mod task;
pub mod timer;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;
