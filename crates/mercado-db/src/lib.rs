//! Transactional state store for the Mercado marketplace.
//!
//! The whole application state lives in one serializable value. Every write
//! goes through [`Db::transaction`], which runs against a working copy under
//! an exclusive lock and only swaps the copy in when the closure succeeds, so
//! a failed operation never leaves partial writes behind.
//!
//! File-backed stores guard each read and transaction with an OS lock on a
//! sidecar `<file>.lock` and reload the file under it, so several handles or
//! processes can share one state file without losing commits.
//!
//! # Example
//!
//! ```rust
//! use mercado_db::{Db, DbError, Table};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct State {
//!     stock: Table<String, u32>,
//! }
//!
//! let db: Db<State> = Db::in_memory();
//!
//! db.transaction(|state| {
//!     state.stock.insert("widget".to_string(), 5);
//!     Ok::<_, DbError>(())
//! })?;
//!
//! let stock = db.read(|state| state.stock.get(&"widget".to_string()).copied())?;
//! assert_eq!(stock, Some(5));
//! # Ok::<(), DbError>(())
//! ```

mod db;
mod error;
mod table;

pub use db::Db;
pub use error::DbError;
pub use table::Table;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Db, DbError, Table};
}
