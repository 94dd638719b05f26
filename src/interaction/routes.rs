//! HTTP routes for the Slack webhooks.
//!
//! Every handler is a translation point: errors never escape unformatted, and the
//! status code is always one of 200, 400, 405, or 500. Bad command input is a 400
//! carrying an error card; submission field errors stay 200 as Slack requires.

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State, rejection::FormRejection},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, instrument, warn};

use crate::{
    base::error::{RelayError, RelayResult},
    interaction::{
        command::{Command, handle_command},
        envelope::{InteractionForm, InteractionPayload},
        submission::{InteractionReply, handle_interaction},
    },
    runtime::Runtime,
    service::chat::payload::{ChatResponse, SUMMARY_BLOCK, ViewSubmissionResponse},
};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

pub fn router(runtime: Runtime) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slack/command", post(command).fallback(method_not_allowed))
        .route("/slack/interactions", post(interactions).fallback(method_not_allowed))
        .with_state(runtime)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn method_not_allowed() -> Response {
    error_body(StatusCode::METHOD_NOT_ALLOWED, "Método não permitido")
}

// Slash command.

#[instrument(skip_all)]
async fn command(State(runtime): State<Runtime>, form: Result<Form<Command>, FormRejection>) -> Response {
    let command = match form {
        Ok(Form(command)) => command,
        Err(rejection) => {
            warn!("Unreadable slash command: {}", rejection);
            return error_body(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match handle_command(&command, &runtime.config, &runtime.tracker, &runtime.chat).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => command_error(err),
    }
}

fn command_error(err: RelayError) -> Response {
    match err {
        RelayError::UnknownCommand(_) | RelayError::UnsupportedInteraction(_) => error_body(StatusCode::BAD_REQUEST, err.to_string()),
        RelayError::Validation(message) => (StatusCode::BAD_REQUEST, Json(ChatResponse::error_card(&message))).into_response(),
        RelayError::Tracker(_) | RelayError::ChatDelivery(_) => {
            error!("Slash command failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ChatResponse::error_card(&err.to_string()))).into_response()
        }
    }
}

// Interactions.

#[instrument(skip_all)]
async fn interactions(State(runtime): State<Runtime>, request: Request) -> Response {
    let payload = match decode_interaction(request).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Unreadable interaction: {}", err);
            return error_body(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    match handle_interaction(payload, &runtime.config, &runtime.tracker, &runtime.chat).await {
        Ok(InteractionReply::Challenge(challenge)) => Json(json!({ "challenge": challenge })).into_response(),
        Ok(InteractionReply::Submission(reply)) => Json(reply).into_response(),
        Err(err) => interaction_error(err),
    }
}

fn interaction_error(err: RelayError) -> Response {
    match err {
        RelayError::UnsupportedInteraction(_) | RelayError::UnknownCommand(_) => error_body(StatusCode::BAD_REQUEST, err.to_string()),
        RelayError::Validation(message) => Json(ViewSubmissionResponse::field_error(SUMMARY_BLOCK, message)).into_response(),
        RelayError::Tracker(_) | RelayError::ChatDelivery(_) => {
            error!("Interaction failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ViewSubmissionResponse::field_error(SUMMARY_BLOCK, err.to_string()))).into_response()
        }
    }
}

/// Accept either a JSON body or a form body with a `payload` field holding JSON.
async fn decode_interaction(request: Request) -> RelayResult<InteractionPayload> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(form) = Form::<InteractionForm>::from_request(request, &()).await.map_err(|e| RelayError::validation(e.body_text()))?;
        InteractionPayload::from_form_field(&form.payload)
    } else {
        let Json(value) = Json::<serde_json::Value>::from_request(request, &()).await.map_err(|e| RelayError::validation(e.body_text()))?;
        InteractionPayload::from_json(value)
    }
}
