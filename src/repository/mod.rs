mod embedded;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{NewNote, Note, NotePatch};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),
}

/// Owner of every note record. Lookups, updates and deletes are keyed by id
/// only; a missing id is `Ok(None)` / `Ok(false)`, never an error.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Stores a new note with a fresh id and `created_at == updated_at`.
    async fn create(&self, note: NewNote) -> Result<Note, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Note>, StoreError>;

    /// All notes, most recently updated first. Ties go to the higher id.
    async fn list(&self) -> Result<Vec<Note>, StoreError>;

    /// Merges `patch` and refreshes `updated_at`, even for an empty patch.
    async fn update(&self, id: i64, patch: NotePatch) -> Result<Option<Note>, StoreError>;

    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
