use axum::{extract::State, http::StatusCode, Extension, Json};
use shared_types::{FoodRecord, FoodRecordQuery, FoodRecordRequest};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::{food_records, get_conn};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

fn validated(payload: FoodRecordRequest) -> ApiResult<FoodRecordRequest> {
    let payload = payload.normalized();
    payload.validate()?;
    Ok(payload)
}

pub async fn list_food_records(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<FoodRecordQuery>,
) -> ApiResult<Json<Vec<FoodRecord>>> {
    let filter = query.filter().map_err(ApiError::bad_request)?;

    let mut conn = get_conn(&state.pool).await?;
    let records = food_records::list_for_user(&mut conn, auth.id, filter).await?;

    Ok(Json(records))
}

pub async fn create_food_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<FoodRecordRequest>,
) -> ApiResult<(StatusCode, Json<FoodRecord>)> {
    let payload = validated(payload)?;

    let mut conn = get_conn(&state.pool).await?;
    let record = food_records::create(&mut conn, auth.id, &payload).await?;

    tracing::debug!(
        "User {} logged {} on {}",
        auth.username,
        record.meal_type,
        record.date
    );

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_food_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(record_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<FoodRecordRequest>,
) -> ApiResult<Json<FoodRecord>> {
    let payload = validated(payload)?;

    let mut conn = get_conn(&state.pool).await?;
    let record = food_records::update(&mut conn, auth.id, record_id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Food record"))?;

    Ok(Json(record))
}

pub async fn delete_food_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(record_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    let mut conn = get_conn(&state.pool).await?;

    if !food_records::delete(&mut conn, auth.id, record_id).await? {
        return Err(ApiError::not_found("Food record"));
    }

    Ok(StatusCode::NO_CONTENT)
}
