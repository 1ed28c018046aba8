use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Announcement, AnnouncementId, DeliveryStatus, RecipientId};
use crate::handlers::{ApiError, AppState, HandlerResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/announcements", post(create_announcement).get(list_announcements))
        .route("/announcements/{id}", get(get_announcement))
        .route("/announcements/{id}/sent_to", get(get_sent_to))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateAnnouncementRequest {
    content: String,
    send_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct CreateAnnouncementResponse {
    id: AnnouncementId,
    message: &'static str,
}

#[derive(Serialize)]
struct AnnouncementResponse {
    id: AnnouncementId,
    content: String,
    send_at: DateTime<Utc>,
    delivered_to: Vec<RecipientId>,
    status: DeliveryStatus,
}

impl From<Announcement> for AnnouncementResponse {
    fn from(value: Announcement) -> Self {
        Self {
            id: value.id,
            content: value.content,
            send_at: value.send_at,
            delivered_to: value.delivered_to,
            status: value.status,
        }
    }
}

async fn create_announcement(
    State(state): State<AppState>,
    payload: Result<Json<CreateAnnouncementRequest>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<CreateAnnouncementResponse>)> {
    let Json(request) = payload?;
    let id = state.scheduler.schedule(request.content, request.send_at).await?;
    let response = CreateAnnouncementResponse {
        id,
        message: "announcement created and scheduled",
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<AnnouncementId>,
) -> HandlerResult<Json<AnnouncementResponse>> {
    state.repos.announcements.get_announcement(id).await?
        .map(|announcement| Json(announcement.into()))
        .ok_or(ApiError::NotFound(id))
}

async fn list_announcements(
    State(state): State<AppState>,
) -> HandlerResult<Json<Vec<AnnouncementResponse>>> {
    let announcements = state.repos.announcements.list_announcements().await?;
    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}

async fn get_sent_to(
    State(state): State<AppState>,
    Path(id): Path<AnnouncementId>,
) -> HandlerResult<Json<Vec<RecipientId>>> {
    state.repos.announcements.get_delivered_to(id).await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}
