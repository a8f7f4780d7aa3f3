//! praxis-cli
//!
//! Command-line front end for the decision engine: reads JSON histories,
//! parameters and configuration, writes JSON results to stdout.

pub mod commands;
pub mod config;
