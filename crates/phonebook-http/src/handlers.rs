use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use phonebook_core::Contact;

use crate::AppState;
use crate::protocol::{ContactPayload, StatusBody};
use crate::response::ApiError;

pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.directory.list().await?;
    Ok(Json(contacts))
}

pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state.directory.get(&id).await?;
    Ok(Json(contact))
}

pub async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Json(payload) = payload?;
    let contact = state
        .directory
        .create(payload.name.as_deref(), payload.number.as_deref())
        .await?;
    Ok(Json(contact))
}

pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Json(payload) = payload?;
    let contact = state
        .directory
        .update(&id, payload.name.as_deref(), payload.number.as_deref())
        .await?;
    Ok(Json(contact))
}

pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.directory.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_info(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let count = state.directory.count().await?;
    let now = chrono::Local::now().to_rfc2822();

    Ok(Html(format!(
        "<h2>PhoneBook Info</h2>\n<p>Phonebook has info for {} persons</p>\n<p>{}</p>\n",
        count, now
    )))
}

pub async fn handle_unknown_endpoint() -> (StatusCode, Json<StatusBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(StatusBody {
            status: "Unknown Endpoint".to_string(),
        }),
    )
}
