//! HTTP handlers for the web UI.

use super::events::{ChannelNotifier, to_sse};
use super::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use futures::Stream;
use qchain_domain::{ChainRequest, DomainError, Round, StreamEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::{info, warn};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("assets/index.html");

/// Errors returned as JSON `{"error": ...}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session not found")]
    SessionNotFound,

    #[error("a round is already running for this session")]
    RoundInProgress,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::RoundInProgress => StatusCode::CONFLICT,
            ApiError::Domain(e) if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// Stored results of one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub generating: bool,
    pub questions: Option<String>,
    pub questions_body: Option<String>,
    pub logic_section: Option<String>,
    pub answers: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::SessionNotFound)
}

fn round_stream(
    round: Round,
    rx: UnboundedReceiver<StreamEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = futures::stream::unfold(rx, move |mut rx| async move {
        rx.recv().await.map(|event| (Ok(to_sse(round, event)), rx))
    });
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model": state.model.as_str(),
        "sessions": state.sessions.len().await,
    }))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let session_id = parse_session_id(&raw_id)?;
    let entry = state
        .sessions
        .get(&session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;

    let result = entry.snapshot().await;
    let split = result.questions_split();
    Ok(Json(SessionView {
        session_id,
        created_at: entry.created_at(),
        generating: entry.is_generating(),
        questions: result.questions_text().map(String::from),
        questions_body: split.as_ref().map(|s| s.body.clone()),
        logic_section: split.and_then(|s| s.logic_section),
        answers: result.answers_text().map(String::from),
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&raw_id)?;
    if state.sessions.remove(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

/// Start round 1 and stream it back as server-sent events.
pub async fn generate_questions(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(form): Json<QuestionsForm>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let session_id = parse_session_id(&raw_id)?;
    let entry = state
        .sessions
        .get(&session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    let request = ChainRequest::try_new(form.subject, form.topic)?;
    let guard = entry.try_begin_round().ok_or(ApiError::RoundInProgress)?;

    // Readers must not see the previous chain while the new one streams.
    let mut working = entry.snapshot().await;
    working.begin_questions_round();
    entry.replace(working.clone()).await;

    let (tx, rx) = unbounded_channel();
    let use_case = state.questions.clone();
    info!(session = %session_id, "Questions round requested");

    tokio::spawn(async move {
        let _guard = guard;
        let notifier = ChannelNotifier::new(tx.clone());
        let outcome = use_case.execute(&request, &mut working, &notifier).await;
        entry.replace(working).await;

        let event = match outcome {
            Ok(output) => StreamEvent::Completed(output.text),
            Err(e) => {
                warn!(session = %session_id, "Questions round failed: {}", e);
                StreamEvent::Error(e.to_string())
            }
        };
        let _ = tx.send(event);
    });

    Ok(round_stream(Round::Questions, rx))
}

/// Start round 2 against the session's current questions.
pub async fn generate_answers(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let session_id = parse_session_id(&raw_id)?;
    let entry = state
        .sessions
        .get(&session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    let guard = entry.try_begin_round().ok_or(ApiError::RoundInProgress)?;

    let mut working = entry.snapshot().await;
    working.require_questions()?;

    let (tx, rx) = unbounded_channel();
    let use_case = state.answers.clone();
    info!(session = %session_id, "Answers round requested");

    tokio::spawn(async move {
        let _guard = guard;
        let notifier = ChannelNotifier::new(tx.clone());
        let outcome = use_case.execute(&mut working, &notifier).await;
        entry.replace(working).await;

        let event = match outcome {
            Ok(output) => StreamEvent::Completed(output.text),
            Err(e) => {
                warn!(session = %session_id, "Answers round failed: {}", e);
                StreamEvent::Error(e.to_string())
            }
        };
        let _ = tx.send(event);
    });

    Ok(round_stream(Round::Answers, rx))
}
