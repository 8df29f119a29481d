use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use super::error_response;
use crate::{
    dto::{CreateNoteRequest, DeleteNoteResponse, NoteResponse, UpdateNoteRequest},
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, update_note, delete_note, get_one_note, get_all_notes),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/notes", get(get_all_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_one_note)
                .put(update_note)
                .patch(update_note)
                .delete(delete_note),
        )
        .route("/api-doc/openapi.json", get(openapi))
        .with_state(service)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Title is empty"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => error_response(&e, "create note"),
    }
}

#[utoipa::path(
    patch,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Title is empty"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    match service.update_note(id, payload).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => error_response(&e, "update note"),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteNoteResponse),
        (status = 404, description = "Note not found", body = DeleteNoteResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(State(service): State<Arc<NoteService>>, Path(id): Path<i64>) -> Response {
    match service.delete_note(id).await {
        Ok(result) if result.success => (StatusCode::OK, Json(result)).into_response(),
        Ok(result) => (StatusCode::NOT_FOUND, Json(result)).into_response(),
        Err(e) => error_response(&e, "delete note"),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.get_one_note(id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => error_response(&e, "get note"),
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes, most recently updated first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => error_response(&e, "get all notes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::memory_service;
    use axum_test::TestServer;
    use chrono::Duration;
    use serde_json::json;

    fn test_server() -> (Arc<crate::clock::ManualClock>, TestServer) {
        let (clock, service) = memory_service();
        let server = TestServer::new(router(Arc::new(service))).unwrap();
        (clock, server)
    }

    #[tokio::test]
    async fn create_note() {
        let (_, server) = test_server();

        let response = server
            .post("/notes")
            .json(&json!({ "title": "Test Note", "content": "Body" }))
            .await;

        assert_eq!(response.status_code(), 201);
        let note = response.json::<NoteResponse>();
        assert_eq!(note.id, 1);
        assert_eq!(note.title, "Test Note");
        assert_eq!(note.content, "Body");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[tokio::test]
    async fn create_note_without_content() {
        let (_, server) = test_server();

        let response = server.post("/notes").json(&json!({ "title": "T" })).await;

        assert_eq!(response.status_code(), 201);
        assert_eq!(response.json::<NoteResponse>().content, "");
    }

    #[tokio::test]
    async fn create_note_with_blank_title() {
        let (_, server) = test_server();

        let response = server.post("/notes").json(&json!({ "title": "  " })).await;

        assert_eq!(response.status_code(), 400);
        let list = server.get("/notes").await;
        assert!(list.json::<Vec<NoteResponse>>().is_empty());
    }

    #[tokio::test]
    async fn get_note() {
        let (_, server) = test_server();
        server
            .post("/notes")
            .json(&json!({ "title": "first", "content": "1" }))
            .await;

        let response = server.get("/notes/1").await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<NoteResponse>().title, "first");

        let response = server.get("/notes/2").await;
        assert_eq!(response.status_code(), 404);
    }

    #[tokio::test]
    async fn update_note() {
        let (clock, server) = test_server();
        let created = server
            .post("/notes")
            .json(&json!({ "title": "first", "content": "1" }))
            .await
            .json::<NoteResponse>();

        clock.advance(Duration::seconds(1));
        let response = server.patch("/notes/1").json(&json!({ "content": "2" })).await;

        assert_eq!(response.status_code(), 200);
        let note = response.json::<NoteResponse>();
        assert_eq!(note.title, "first");
        assert_eq!(note.content, "2");
        assert_eq!(note.created_at, created.created_at);
        assert!(note.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn put_without_fields_touches_note() {
        let (clock, server) = test_server();
        let created = server
            .post("/notes")
            .json(&json!({ "title": "first" }))
            .await
            .json::<NoteResponse>();

        clock.advance(Duration::seconds(1));
        let response = server.put("/notes/1").json(&json!({})).await;

        assert_eq!(response.status_code(), 200);
        let note = response.json::<NoteResponse>();
        assert_eq!(note.title, created.title);
        assert!(note.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_with_empty_content_clears_it() {
        let (_, server) = test_server();
        server
            .post("/notes")
            .json(&json!({ "title": "first", "content": "1" }))
            .await;

        let response = server.patch("/notes/1").json(&json!({ "content": "" })).await;

        assert_eq!(response.status_code(), 200);
        let note = response.json::<NoteResponse>();
        assert_eq!(note.title, "first");
        assert_eq!(note.content, "");
    }

    #[tokio::test]
    async fn update_with_blank_title_is_rejected() {
        let (_, server) = test_server();
        server.post("/notes").json(&json!({ "title": "first" })).await;

        let response = server.patch("/notes/1").json(&json!({ "title": " " })).await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(server.get("/notes/1").await.json::<NoteResponse>().title, "first");
    }

    #[tokio::test]
    async fn update_missing_note() {
        let (_, server) = test_server();

        let response = server
            .patch("/notes/999999")
            .json(&json!({ "title": "Updated Title" }))
            .await;

        assert_eq!(response.status_code(), 404);
    }

    #[tokio::test]
    async fn delete_note() {
        let (_, server) = test_server();
        server.post("/notes").json(&json!({ "title": "first" })).await;

        let response = server.delete("/notes/1").await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(
            response.json::<DeleteNoteResponse>(),
            DeleteNoteResponse { success: true }
        );

        let response = server.delete("/notes/1").await;
        assert_eq!(response.status_code(), 404);
        assert!(!response.json::<DeleteNoteResponse>().success);

        assert_eq!(server.get("/notes/1").await.status_code(), 404);
    }

    #[tokio::test]
    async fn list_notes_most_recent_first() {
        let (clock, server) = test_server();
        server.post("/notes").json(&json!({ "title": "A" })).await;
        clock.advance(Duration::seconds(1));
        server.post("/notes").json(&json!({ "title": "B" })).await;

        let titles: Vec<String> = server
            .get("/notes")
            .await
            .json::<Vec<NoteResponse>>()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["B", "A"]);

        clock.advance(Duration::seconds(1));
        server.patch("/notes/1").json(&json!({})).await;

        let titles: Vec<String> = server
            .get("/notes")
            .await
            .json::<Vec<NoteResponse>>()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let (_, server) = test_server();

        let response = server.get("/api-doc/openapi.json").await;

        assert_eq!(response.status_code(), 200);
        let doc = response.json::<serde_json::Value>();
        assert!(doc["paths"]["/notes/{id}"].is_object());
    }
}
