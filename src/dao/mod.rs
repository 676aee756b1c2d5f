/// Contest, entry and settings persistence.
pub mod contest_store;
/// Persisted entity definitions and identifiers.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
