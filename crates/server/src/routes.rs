use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use flack_slack::{ActionForm, CommandPayload, Dispatcher, RequestContext, SyncReply, WebhookPayload};
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct FlackState {
    dispatcher: Arc<Dispatcher>,
}

/// Mounts the three Slack callback endpoints under `prefix`. An empty prefix
/// mounts them at the root.
pub fn router(dispatcher: Arc<Dispatcher>, prefix: &str) -> Router {
    let endpoints = Router::new()
        .route("/webhook", post(webhook))
        .route("/command", post(command))
        .route("/action", post(action))
        .with_state(FlackState { dispatcher });

    if prefix.is_empty() {
        endpoints
    } else {
        Router::new().nest(prefix, endpoints)
    }
}

pub async fn webhook(
    State(state): State<FlackState>,
    payload: Result<Form<WebhookPayload>, FormRejection>,
) -> Response {
    let ctx = request_context();
    let Some(Form(payload)) = accept(payload, "webhook", &ctx) else {
        return reply_response(SyncReply::Empty);
    };
    reply_response(state.dispatcher.dispatch_webhook(payload, &ctx).await)
}

pub async fn command(
    State(state): State<FlackState>,
    payload: Result<Form<CommandPayload>, FormRejection>,
) -> Response {
    let ctx = request_context();
    let Some(Form(payload)) = accept(payload, "command", &ctx) else {
        return reply_response(SyncReply::Empty);
    };
    reply_response(state.dispatcher.dispatch_command(payload, &ctx).await)
}

pub async fn action(
    State(state): State<FlackState>,
    form: Result<Form<ActionForm>, FormRejection>,
) -> Response {
    let ctx = request_context();
    let Some(Form(form)) = accept(form, "action", &ctx) else {
        return reply_response(SyncReply::Empty);
    };
    reply_response(state.dispatcher.dispatch_action(form, &ctx).await)
}

fn request_context() -> RequestContext {
    RequestContext::new(Uuid::new_v4().to_string())
}

// A body that is not a form cannot carry a valid token, so it gets the same
// empty answer as a token mismatch.
fn accept<T>(
    extracted: Result<Form<T>, FormRejection>,
    route: &'static str,
    ctx: &RequestContext,
) -> Option<Form<T>> {
    match extracted {
        Ok(form) => Some(form),
        Err(rejection) => {
            warn!(
                event_name = "ingress.form_rejected",
                correlation_id = %ctx.correlation_id,
                route,
                error = %rejection,
                "rejecting request body that is not a form"
            );
            None
        }
    }
}

fn reply_response(reply: SyncReply) -> Response {
    match reply.body() {
        Some(body) => Json(body).into_response(),
        None => StatusCode::OK.into_response(),
    }
}
