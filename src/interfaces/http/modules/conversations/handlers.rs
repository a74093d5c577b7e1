//! Conversation HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/conversations",
    tag = "Conversations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Conversations visible to the caller", body = ApiResponse<Vec<ConversationSummaryDto>>)
    )
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<Vec<ConversationSummaryDto>>>> {
    let summaries = state.conversations.find_by_user(user.caller).await?;
    Ok(Json(ApiResponse::success(
        summaries.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversations",
    tag = "Conversations",
    security(("bearer_auth" = [])),
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Open conversation for the pair, new or existing", body = ApiResponse<ConversationDto>),
        (status = 400, description = "Recipient is not an administrator"),
        (status = 404, description = "No administrator available")
    )
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ConversationDto>>)> {
    let conversation = state
        .conversations
        .create(user.caller.id(), request.admin_id, Some(&request.subject))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(conversation.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/{id}",
    tag = "Conversations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation with participants and messages", body = ApiResponse<ConversationDetailDto>),
        (status = 403, description = "Not a participant, or no such conversation")
    )
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ConversationDetailDto>>> {
    if !state
        .conversations
        .user_has_access(user.caller.id(), id)
        .await?
    {
        return Err(DomainError::forbidden(
            "you do not have access to this conversation",
        ));
    }
    let detail = state.conversations.find_one(id).await?;
    Ok(Json(ApiResponse::success(detail.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/conversations/{id}/status",
    tag = "Conversations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Conversation id")),
    request_body = UpdateConversationStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ConversationDto>),
        (status = 403, description = "Not the assigned administrator"),
        (status = 409, description = "Another conversation is already open for this pair")
    )
)]
pub async fn update_conversation_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateConversationStatusRequest>,
) -> ApiResult<Json<ApiResponse<ConversationDto>>> {
    let conversation = state
        .conversations
        .update_status(id, &request.status, user.caller)
        .await?;
    Ok(Json(ApiResponse::with_message(
        conversation.into(),
        "conversation status updated",
    )))
}
