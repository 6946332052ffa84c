//! Infrastructure layer: persistence adapters behind the `Database` boundary.

pub mod persistence;

pub use persistence::{
    AccountRecord, Database, DatabaseError, InMemoryDatabase, PostgresDatabase, SavedEvent,
};
