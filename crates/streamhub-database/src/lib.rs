//! # streamhub-database
//!
//! PostgreSQL connection management, repositories, and the
//! [`FolderCatalog`] abstraction with its Postgres and in-memory backends.

pub mod catalog;
pub mod connection;
pub mod migration;
pub mod repositories;

pub use catalog::{CatalogManager, FolderCatalog, MemoryFolderCatalog, PgFolderCatalog};
pub use connection::DatabasePool;
