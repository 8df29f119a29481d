//! Procedure-style surface: one `POST` endpoint, the operation named in the
//! body. Missing notes come back as `null` results rather than errors.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    dto::{CreateNoteRequest, UpdateNoteRequest},
    service::{NoteService, ServiceError},
};

#[derive(Debug, Deserialize, Serialize)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateNoteParams {
    pub id: i64,
    #[serde(flatten)]
    pub changes: UpdateNoteRequest,
}

/// Params of a method that takes none; `{}`, `null` and an absent field all fit.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EmptyParams {}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum RpcRequest {
    CreateNote(CreateNoteRequest),
    GetNote(IdParams),
    GetNotes(Option<EmptyParams>),
    UpdateNote(UpdateNoteParams),
    DeleteNote(IdParams),
}

impl RpcRequest {
    const fn name(&self) -> &'static str {
        match self {
            Self::CreateNote(_) => "createNote",
            Self::GetNote(_) => "getNote",
            Self::GetNotes(_) => "getNotes",
            Self::UpdateNote(_) => "updateNote",
            Self::DeleteNote(_) => "deleteNote",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RpcResponse {
    Result(Value),
    Error(RpcError),
}

#[derive(Debug, thiserror::Error)]
enum DispatchError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", post(handle_request))
        .with_state(service)
}

fn error(status: StatusCode, message: String) -> Response {
    let code = status
        .canonical_reason()
        .unwrap_or("ERROR")
        .to_uppercase()
        .replace(' ', "_");

    (status, Json(RpcResponse::Error(RpcError { code, message }))).into_response()
}

async fn dispatch(service: &NoteService, request: RpcRequest) -> Result<Value, DispatchError> {
    let value = match request {
        RpcRequest::CreateNote(req) => serde_json::to_value(service.create_note(req).await?)?,
        RpcRequest::GetNote(IdParams { id }) => {
            serde_json::to_value(service.get_one_note(id).await?)?
        }
        RpcRequest::GetNotes(_) => serde_json::to_value(service.get_all_notes().await?)?,
        RpcRequest::UpdateNote(UpdateNoteParams { id, changes }) => {
            serde_json::to_value(service.update_note(id, changes).await?)?
        }
        RpcRequest::DeleteNote(IdParams { id }) => {
            serde_json::to_value(service.delete_note(id).await?)?
        }
    };

    Ok(value)
}

#[debug_handler]
pub async fn handle_request(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<RpcRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected RPC body: {rejection}");
            return error(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let method = request.name();
    tracing::debug!("RPC call: {method}");

    match dispatch(&service, request).await {
        Ok(value) => (StatusCode::OK, Json(RpcResponse::Result(value))).into_response(),
        Err(e) => failure_response(method, e),
    }
}

fn failure_response(method: &str, e: DispatchError) -> Response {
    match e {
        DispatchError::Service(ServiceError::Validation(e)) => {
            error(StatusCode::BAD_REQUEST, e.to_string())
        }
        e => {
            tracing::error!("RPC {method} failed: {e}");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to run {method}"),
            )
        }
    }
}
