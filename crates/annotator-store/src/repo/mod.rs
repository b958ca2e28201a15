//! `ObjectRepository` implementations

pub mod memory;
pub mod sqlite_repo;

pub use memory::InMemoryRepository;
pub use sqlite_repo::SqliteRepository;
