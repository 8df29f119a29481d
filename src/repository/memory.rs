use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{NoteRepository, StoreError};
use crate::{
    clock::Clock,
    models::{NewNote, Note, NotePatch},
};

#[derive(Debug)]
struct State {
    next_id: i64,
    notes: BTreeMap<i64, Note>,
}

/// Process-local store. Ids start at 1 and are never handed out twice, even
/// after the note holding one is deleted.
pub struct MemoryRepository {
    state: RwLock<State>,
    clock: Arc<dyn Clock>,
}

impl MemoryRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                notes: BTreeMap::new(),
            }),
            clock,
        }
    }
}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let mut state = self.state.write().await;
        let now = self.clock.now();

        let id = state.next_id;
        state.next_id += 1;

        let note = Note {
            id,
            title: note.title,
            content: note.content,
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(id, note.clone());

        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>, StoreError> {
        Ok(self.state.read().await.notes.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let mut notes: Vec<Note> = self.state.read().await.notes.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(notes)
    }

    async fn update(&self, id: i64, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let mut state = self.state.write().await;
        let now = self.clock.now();

        Ok(state.notes.get_mut(&id).map(|note| {
            patch.apply(note, now);
            note.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.notes.remove(&id).is_some())
    }
}
