use crate::{
    dto::{CreateNoteRequest, DeleteNoteResponse, NoteResponse, UpdateNoteRequest, ValidationError},
    repository::{NoteRepository, StoreError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let note = self.repo.create(request.into_new_note()?).await?;
        tracing::info!("Created note {}", note.id);
        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<Option<NoteResponse>, ServiceError> {
        let patch = request.into_patch()?;
        if patch.is_empty() {
            tracing::debug!("Touching note {} without field changes", id);
        }

        let note = self.repo.update(id, patch).await?;
        match &note {
            Some(note) => tracing::info!("Updated note {}", note.id),
            None => tracing::debug!("Note {} not found for update", id),
        }
        Ok(note.map(Into::into))
    }

    pub async fn delete_note(&self, id: i64) -> Result<DeleteNoteResponse, ServiceError> {
        let success = self.repo.delete(id).await?;
        if success {
            tracing::info!("Deleted note {}", id);
        }
        Ok(DeleteNoteResponse { success })
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<NoteResponse>, ServiceError> {
        Ok(self.repo.get(id).await?.map(Into::into))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ServiceError> {
        let notes = self.repo.list().await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }
}
