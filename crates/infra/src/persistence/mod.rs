//! Persistence capability boundary.
//!
//! This module defines the infrastructure-facing abstraction the HTTP layer
//! is constructed against, without making any storage assumptions. The
//! router and handlers only ever see `Arc<dyn Database>`.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDatabase;
pub use postgres::PostgresDatabase;
pub use r#trait::{AccountRecord, Database, DatabaseError, SavedEvent};
