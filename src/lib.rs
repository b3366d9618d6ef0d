//! Tab favorites: mark tabs as favorites per window, keep the marks anchored
//! across restarts and reordering, highlight them through a tree-style tab
//! sidebar, and jump between them from the keyboard.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod agent;
pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
