//! Internal modules for the dice race terminal driver.
//!
//! This library provides command parsing, configuration loading and
//! command dispatch used by the dr_cli binary.

pub mod commands;
pub mod config;
pub mod session;
