//! CLI-specific utilities for route-picker
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod commands;
pub mod display;
pub mod progress;

pub use commands::{parse_command, Command};
pub use progress::LoadingOverlay;
