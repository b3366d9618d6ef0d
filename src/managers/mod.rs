// State managers
// Managers own stateful data: the favorite working copy and the in-memory tab strip.

pub mod favorite_store;
pub mod tab_manager;
