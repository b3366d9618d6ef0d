// Services
// Storage, host and collaborator boundaries, plus the engines built on them.

pub mod messaging;
pub mod navigation;
pub mod reconciliation;
pub mod registration;
pub mod settings_engine;
pub mod storage_local;
pub mod tab_host;
