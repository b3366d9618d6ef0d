// Shared type definitions
// Each submodule defines types used across the agent, its services and the harness.

pub mod errors;
pub mod event;
pub mod favorite;
pub mod message;
pub mod settings;
pub mod tab;
