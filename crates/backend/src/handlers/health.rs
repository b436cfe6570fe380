use axum::Json;
use shared_types::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Food diary service is running".to_string(),
    })
}
