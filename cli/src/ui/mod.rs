//! UI Module
//!
//! This module exports the UI components for the friendsplit TUI:
//!
//! - `app`: Application state and event loop
//! - `views`: Rendering functions for all UI views

mod app;
mod views;

pub use app::{run_app, App};
