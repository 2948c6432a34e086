//! Chat endpoints.
//!
//! - `POST /chat`: JSON `{"text": "..."}` in, `{"bot_response": "..."}` out.
//! - `GET /chat_stream?q=...`: the reply as Server-Sent Events, one
//!   `data: {"token": "..."}` event per fragment, then `data: [DONE]`.
//!
//! Orchestration runs in a spawned task so a panic anywhere in the pipeline
//! surfaces as a [`ChatError::TaskFailed`] instead of dropping the
//! connection.

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header::{self, HeaderName};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use parley_core::chat::chunker::StreamChunker;
use parley_types::chat::{DONE_SENTINEL, Fragment, StreamItem};
use parley_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Rejection body for a `/chat` request that is not JSON.
pub const CONTENT_TYPE_ERROR: &str = "Content-Type must be application/json";

/// Streamed when orchestration fails before any fragment exists.
pub const SERVER_ERROR_APOLOGY: &str = "Sorry, there was a server error.";

/// Streamed when a fragment cannot be encoded mid-stream.
pub const STREAM_ERROR_APOLOGY: &str = "Sorry, there was an error generating the response.";

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Request body for `POST /chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub text: Option<String>,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub bot_response: String,
}

/// Query string for `GET /chat_stream`.
#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub q: String,
}

/// Run `fut` on its own task, turning a panic into [`ChatError::TaskFailed`].
async fn run_detached<T, F>(fut: F) -> Result<T, ChatError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| ChatError::TaskFailed(e.to_string()))
}

/// POST /chat
///
/// A body without a JSON content type is rejected with 400. A JSON body that
/// does not parse, or has no usable `text`, is treated as empty input.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => {
            return Err(AppError::BadRequest(CONTENT_TYPE_ERROR.to_string()));
        }
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable chat body, treating as empty");
            ChatRequest::default()
        }
    };

    let text = request.text.unwrap_or_default();
    let orchestrator = state.orchestrator.clone();
    let bot_response = run_detached(async move { orchestrator.respond(&text).await }).await?;

    Ok(Json(ChatResponse { bot_response }))
}

/// GET /chat_stream?q=...
pub async fn chat_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> impl IntoResponse {
    let orchestrator = state.orchestrator.clone();
    let text = query.q;

    let chunker =
        match run_detached(async move { orchestrator.respond_stream(&text).await }).await {
            Ok(chunker) => chunker,
            Err(e) => {
                tracing::error!(error = %e, "chat_stream failed");
                StreamChunker::notice(SERVER_ERROR_APOLOGY)
            }
        };

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Sse::new(sse_events(chunker)).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))),
    )
}

/// Map a fragment stream to SSE events.
///
/// If a fragment fails to encode, the stream ends early with an apology
/// fragment and the sentinel.
fn sse_events(chunker: StreamChunker) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    async_stream::stream! {
        for item in chunker {
            match item {
                StreamItem::Fragment(fragment) => match Event::default().json_data(&fragment) {
                    Ok(event) => yield Ok(event),
                    Err(e) => {
                        let err = ChatError::Internal(e.to_string());
                        tracing::error!(error = %err, "failed to encode stream fragment");
                        yield Ok(apology_event());
                        yield Ok(Event::default().data(DONE_SENTINEL));
                        break;
                    }
                },
                StreamItem::Done => yield Ok(Event::default().data(DONE_SENTINEL)),
            }
        }
    }
}

fn apology_event() -> Event {
    let body = serde_json::to_string(&Fragment::new(STREAM_ERROR_APOLOGY))
        .unwrap_or_else(|_| format!(r#"{{"token":"{STREAM_ERROR_APOLOGY}"}}"#));
    Event::default().data(body)
}
