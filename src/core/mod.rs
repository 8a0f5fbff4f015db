//! Core library modules for route-picker
//!
//! This module contains the session state machine, the backend client and
//! the render-plan derivation.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod session;

// Re-export main types for internal use
pub use builder::RouteBuilder;
pub use client::ApiClient;
pub use config::{ClientConfig, MapView};
