use std::sync::Arc;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use super::{NoteRepository, StoreError, embedded::migrations};
use crate::{
    clock::Clock,
    models::{NewNote, Note, NotePatch},
};

const COLUMNS: &str = "id, title, content, created_at, updated_at";

pub struct PgRepository {
    client: Client,
    clock: Arc<dyn Clock>,
}

impl PgRepository {
    pub async fn new(database_dsn: &str, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client, clock })
    }

    pub async fn migrate(&mut self) -> Result<(), StoreError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgRepository {
    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let now = self.clock.now();
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (title, content, created_at, updated_at) \
                     VALUES ($1, $2, $3, $3) RETURNING {COLUMNS}"
                ),
                &[&note.title, &note.content, &now],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn get(&self, id: i64) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {COLUMNS} FROM notes WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let rows = self
            .client
            .query(
                &format!("SELECT {COLUMNS} FROM notes ORDER BY updated_at DESC, id DESC"),
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update(&self, id: i64, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let now = self.clock.now();
        // Single statement: field writes for one id never interleave
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET \
                     title = COALESCE($1, title), \
                     content = COALESCE($2, content), \
                     updated_at = GREATEST($3, created_at) \
                     WHERE id = $4 RETURNING {COLUMNS}"
                ),
                &[&patch.title, &patch.content, &now, &id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }
}
