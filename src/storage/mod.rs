//! Result persistence.
//!
//! Writes ping and curl results to a `command_results` table in PostgreSQL or
//! SQLite. Persistence is optional and best-effort: see [`ResultStore`].

mod pool;
mod store;

pub use pool::{init_db_pool, Backend};
pub use store::ResultStore;
