use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{NewNote, Note, NotePatch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time, never changes
    pub created_at: DateTime<Utc>,
    /// Time of the last update
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title, must not be blank
    pub title: String,
    /// Note content, empty when omitted
    #[serde(default)]
    pub content: Option<String>,
}

/// Fields left out of the request keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// New title, must not be blank when present. Unlike `content`, an empty
    /// string here is rejected rather than stored.
    #[serde(default)]
    pub title: Option<String>,
    /// New content. An empty string is still a replacement and clears the
    /// stored content.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteNoteResponse {
    /// Whether a note was removed
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
}

impl CreateNoteRequest {
    pub fn into_new_note(self) -> Result<NewNote, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(NewNote::new(self.title, self.content))
    }
}

impl UpdateNoteRequest {
    pub fn into_patch(self) -> Result<NotePatch, ValidationError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(NotePatch {
            title: self.title,
            content: self.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_content_is_optional() {
        let req: CreateNoteRequest = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        let new = req.into_new_note().unwrap();

        assert_eq!(new.title, "T");
        assert_eq!(new.content, "");
    }

    #[test]
    fn blank_title_is_rejected() {
        let req = CreateNoteRequest {
            title: "   ".to_string(),
            content: None,
        };
        assert_eq!(req.into_new_note(), Err(ValidationError::EmptyTitle));

        let req = UpdateNoteRequest {
            title: Some(String::new()),
            content: None,
        };
        assert_eq!(req.into_patch(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn title_is_not_trimmed_when_stored() {
        let req = CreateNoteRequest {
            title: "  padded  ".to_string(),
            content: None,
        };
        assert_eq!(req.into_new_note().unwrap().title, "  padded  ");
    }

    #[test]
    fn update_request_tells_absent_from_empty() {
        let req: UpdateNoteRequest = serde_json::from_str(r#"{"content": ""}"#).unwrap();
        let patch = req.into_patch().unwrap();

        assert_eq!(patch.title, None);
        assert_eq!(patch.content, Some(String::new()));

        let req: UpdateNoteRequest = serde_json::from_str("{}").unwrap();
        assert!(req.into_patch().unwrap().is_empty());
    }
}
