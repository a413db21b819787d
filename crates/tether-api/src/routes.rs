use axum::{
    Json,
    extract::{Path, State},
};
use anyhow::anyhow;

use tether_core::BindingService;
use tether_types::api::{
    CodeRequest, CommandDefinition, CommandInvocation, CommandReply, IssueCodeRequest, Payload,
};
use tether_types::error::{ApplicationError, ServiceResult};
use tether_types::models::{Binding, CodeInfo};

use crate::commands;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

type ApiResult<T> = Result<Json<Payload<T>>, ApiError>;

fn require(value: &str, what: &str) -> Result<String, ApplicationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApplicationError::bad_request(format!("{} is not specified", what)));
    }
    Ok(value.to_string())
}

/// Run a service call that touches the database off the async runtime.
async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&BindingService) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || f(service.as_ref()))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?;
    Ok(result?)
}

/// GET /health
pub async fn health() -> Json<Payload<&'static str>> {
    Json(Payload::success("ok"))
}

// -- Codes --

/// POST /codes/issue
pub async fn issue_code(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<IssueCodeRequest>,
) -> ApiResult<CodeInfo> {
    let subject_id = require(&req.subject_id, "Subject ID")?;
    let info = blocking(&state, move |svc| svc.issue_code(&subject_id)).await?;
    Ok(Json(Payload::success(info)))
}

/// POST /codes/check
pub async fn check_code(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CodeRequest>,
) -> ApiResult<CodeInfo> {
    let code = require(&req.code, "Code")?;
    let info = state.service.check_code(&code)?;
    Ok(Json(Payload::success(info)))
}

/// POST /codes/revoke
pub async fn revoke_code(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CodeRequest>,
) -> ApiResult<()> {
    let code = require(&req.code, "Code")?;
    state.service.revoke_code(&code)?;
    Ok(Json(Payload::success(())))
}

// -- Bindings --

/// GET /bindings/chat/{chat_id}
pub async fn get_binding_by_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> ApiResult<Binding> {
    let chat_id = require(&chat_id, "Chat ID")?;
    let binding = blocking(&state, move |svc| svc.get_by_chat(&chat_id)).await?;
    Ok(Json(Payload::success(binding)))
}

/// GET /bindings/game/{game_id}
pub async fn get_binding_by_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> ApiResult<Binding> {
    let game_id = require(&game_id, "Game ID")?;
    let binding = blocking(&state, move |svc| svc.get_by_game(&game_id)).await?;
    Ok(Json(Payload::success(binding)))
}

/// DELETE /bindings/chat/{chat_id}
pub async fn delete_binding_by_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> ApiResult<()> {
    let chat_id = require(&chat_id, "Chat ID")?;
    blocking(&state, move |svc| svc.delete_by_chat(&chat_id)).await?;
    Ok(Json(Payload::success(())))
}

/// DELETE /bindings/game/{game_id}
pub async fn delete_binding_by_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> ApiResult<()> {
    let game_id = require(&game_id, "Game ID")?;
    blocking(&state, move |svc| svc.delete_by_game(&game_id)).await?;
    Ok(Json(Payload::success(())))
}

// -- Chat commands --

/// GET /commands: definitions the chat bot registers with the platform.
pub async fn list_commands() -> Json<Payload<Vec<CommandDefinition>>> {
    Json(Payload::success(commands::definitions()))
}

/// POST /commands: run a chat command on behalf of `invoker_id`. Command
/// failures are part of the reply text, not the HTTP status.
pub async fn run_command(
    State(state): State<AppState>,
    JsonBody(mut invocation): JsonBody<CommandInvocation>,
) -> ApiResult<CommandReply> {
    invocation.invoker_id = require(&invocation.invoker_id, "Invoker ID")?;
    let content = blocking(&state, move |svc| Ok(commands::dispatch(svc, &invocation))).await?;
    Ok(Json(Payload::success(CommandReply { content })))
}
