//! Stateless fragment transforms plus the preview renderer.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::ApiJson;
use super::AppState;
use crate::auth::AuthUser;
use crate::editor::{self, preview, Event, ScheduleItem};
use crate::error::Result;
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateEventsRequest {
    pub content: String,
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateScheduleRequest {
    pub content: String,
    pub schedule: Vec<ScheduleItem>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub project_id: Uuid,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub schedule: Vec<ScheduleItem>,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
}

pub async fn parse_events(_user: AuthUser, ApiJson(req): ApiJson<ContentRequest>) -> Json<EventsResponse> {
    Json(EventsResponse {
        events: editor::parse_events(&req.content),
    })
}

pub async fn generate_events(
    _user: AuthUser,
    ApiJson(req): ApiJson<GenerateEventsRequest>,
) -> Json<ContentResponse> {
    metrics::record_regeneration("events");
    Json(ContentResponse {
        content: editor::generate_events_html(&req.content, &req.events),
    })
}

pub async fn parse_schedule(
    _user: AuthUser,
    ApiJson(req): ApiJson<ContentRequest>,
) -> Json<ScheduleResponse> {
    Json(ScheduleResponse {
        schedule: editor::parse_schedule(&req.content),
    })
}

pub async fn generate_schedule(
    _user: AuthUser,
    ApiJson(req): ApiJson<GenerateScheduleRequest>,
) -> Json<ContentResponse> {
    metrics::record_regeneration("schedule");
    Json(ContentResponse {
        content: editor::generate_schedule_html(&req.content, &req.schedule),
    })
}

/// The document with a `<base href>` pointing at the live site.
pub async fn preview(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<PreviewRequest>,
) -> Result<Html<String>> {
    let project = user
        .ensure_project_access(state.storage.as_ref(), req.project_id)
        .await?;
    Ok(Html(preview::render_preview(&project, &req.content)))
}
