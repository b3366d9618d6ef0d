//! SQLite database layer.
//!
//! Backs the extension-local key-value store that every window agent shares.
//!
//! # Usage
//!
//! ```no_run
//! use tab_favorites::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("tab-favorites.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! // Access the underlying connection for queries
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
