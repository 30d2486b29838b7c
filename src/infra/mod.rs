//! Infrastructure adapters for bucket storage.

pub mod repository;

pub use repository::InMemoryRepository;
