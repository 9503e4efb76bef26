// ABOUTME: Library exports for blockgen CLI modules for testing and external use
// ABOUTME: Makes internal modules available to integration tests and benchmarks

pub mod cli;
pub mod cli_output;
pub mod commands;
pub mod completions;
pub mod config;
pub mod constants;
pub mod output;
pub mod writer;
