//! Reservation HTTP handlers
//!
//! Reservation bodies are returned bare; the staff listing uses
//! `{data, pagination}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::domain::reservation::ReservationQuery;
use crate::interfaces::http::common::{ApiResult, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationDto),
        (status = 400, description = "Unknown, closed or past date, or unknown price"),
        (status = 422, description = "Malformed ticket list")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationDto>)> {
    let view = state.reservations.create(user.caller, request.into()).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/mine",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's reservations, newest first", body = Vec<ReservationDto>)
    )
)]
pub async fn list_my_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<ReservationDto>>> {
    let views = state.reservations.find_by_user(user.caller).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ReservationListParams),
    responses(
        (status = 200, description = "Filtered page of reservations", body = PaginatedResponse<ReservationDto>),
        (status = 403, description = "Administrator access required")
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ReservationListParams>,
) -> ApiResult<Json<PaginatedResponse<ReservationDto>>> {
    let query = ReservationQuery::try_from(params)?;
    let page = state.reservations.find_all(&query, user.caller).await?;
    Ok(Json(PaginatedResponse::from_result(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = ReservationDto),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ReservationDto>> {
    let view = state.reservations.find_one(id, user.caller).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/status",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation id")),
    request_body = UpdateReservationStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ReservationDto),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Administrator access required")
    )
)]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateReservationStatusRequest>,
) -> ApiResult<Json<ReservationDto>> {
    let view = state
        .reservations
        .update_status(id, &request.status, user.caller)
        .await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationDto),
        (status = 403, description = "Inside the cancellation window, or not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ReservationDto>> {
    let view = state.reservations.remove(id, user.caller).await?;
    Ok(Json(view.into()))
}
