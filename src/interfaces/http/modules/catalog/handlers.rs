//! Catalog HTTP handlers: park days and the price list

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/catalog/dates",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(ParkDateListParams),
    responses(
        (status = 200, description = "Park days in range", body = ApiResponse<Vec<ParkDateDto>>),
        (status = 400, description = "'to' before 'from'")
    )
)]
pub async fn list_park_dates(
    State(state): State<AppState>,
    Query(params): Query<ParkDateListParams>,
) -> ApiResult<Json<ApiResponse<Vec<ParkDateDto>>>> {
    let days = state
        .catalog
        .list_days(params.from, params.to, params.open_only)
        .await?;
    Ok(Json(ApiResponse::success(
        days.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/catalog/dates",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateParkDateRequest,
    responses(
        (status = 201, description = "Park day created", body = ApiResponse<ParkDateDto>),
        (status = 409, description = "Day already exists")
    )
)]
pub async fn create_park_date(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateParkDateRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParkDateDto>>)> {
    let day = state.catalog.create_park_date(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(day.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/prices",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current price list", body = ApiResponse<Vec<PriceDto>>)
    )
)]
pub async fn list_prices(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<PriceDto>>>> {
    let prices = state.catalog.list_prices().await?;
    Ok(Json(ApiResponse::success(
        prices.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/catalog/prices",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreatePriceRequest,
    responses(
        (status = 201, description = "Price created", body = ApiResponse<PriceDto>)
    )
)]
pub async fn create_price(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePriceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PriceDto>>)> {
    let price = state.catalog.create_price(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(price.into()))))
}

/// Existing reservations keep the price they were booked at.
#[utoipa::path(
    put,
    path = "/api/v1/catalog/prices/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Price id")),
    request_body = UpdatePriceRequest,
    responses(
        (status = 200, description = "Price updated", body = ApiResponse<PriceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdatePriceRequest>,
) -> ApiResult<Json<ApiResponse<PriceDto>>> {
    let price = state.catalog.update_price(id, request.into()).await?;
    Ok(Json(ApiResponse::success(price.into())))
}
