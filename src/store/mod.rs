//! Persistence layer — the roster store contract and its backends.

pub mod libsql_backend;
pub mod memory;
pub mod traits;

pub use libsql_backend::LibSqlRosterStore;
pub use memory::MemoryRosterStore;
pub use traits::RosterStore;
