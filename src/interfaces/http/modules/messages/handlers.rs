//! Message HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    request_body = PostMessageRequest,
    responses(
        (status = 201, description = "Message posted", body = ApiResponse<PostedMessageDto>),
        (status = 403, description = "Not a participant, no such conversation, or conversation closed"),
        (status = 404, description = "No administrator available")
    )
)]
pub async fn post_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PostedMessageDto>>)> {
    let posted = state.messages.create(user.caller, request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(posted.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/{id}/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Messages, oldest first", body = ApiResponse<Vec<MessageDto>>),
        (status = 403, description = "Not a participant")
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<Vec<MessageDto>>>> {
    let messages = state
        .messages
        .find_all_by_conversation(conversation_id, user.caller)
        .await?;
    Ok(Json(ApiResponse::success(
        messages.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversations/{id}/read",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Messages from the other participant marked read", body = ApiResponse<MarkedReadDto>)
    )
)]
pub async fn mark_conversation_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<MarkedReadDto>>> {
    let marked = state
        .messages
        .mark_as_read(conversation_id, user.caller)
        .await?;
    Ok(Json(ApiResponse::success(MarkedReadDto { marked })))
}

#[utoipa::path(
    post,
    path = "/api/v1/messages/{id}/read",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message marked read", body = ApiResponse<MessageDto>),
        (status = 400, description = "Own message")
    )
)]
pub async fn mark_message_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<MessageDto>>> {
    let message = state.messages.mark_message_read(id, user.caller).await?;
    Ok(Json(ApiResponse::success(message.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/messages/unread-count",
    tag = "Messages",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unread messages addressed to the caller", body = ApiResponse<UnreadCountDto>)
    )
)]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<UnreadCountDto>>> {
    let count = state.messages.unread_count(user.caller).await?;
    Ok(Json(ApiResponse::success(UnreadCountDto { count })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/messages/{id}",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message content replaced by a placeholder", body = ApiResponse<MessageDto>),
        (status = 403, description = "Not the sender, or conversation closed")
    )
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<MessageDto>>> {
    let message = state.messages.remove(id, user.caller).await?;
    Ok(Json(ApiResponse::with_message(message.into(), "message deleted")))
}
