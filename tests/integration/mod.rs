//! Integration tests for item property creation

mod batch_scenarios;
mod cli_binary;
mod completion_engine;
mod config_integration;
mod test_utils;
