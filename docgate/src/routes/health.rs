use axum::Json;

use docgate_core::response::SuccessResponse;

use super::Message;
use crate::error::ApiError;

pub async fn root() -> Json<SuccessResponse<Message>> {
    Json(SuccessResponse::new(Message {
        message: "docgate service is running.",
    }))
}

pub async fn health() -> Json<SuccessResponse<Message>> {
    Json(SuccessResponse::new(Message {
        message: "Service is healthy.",
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found")
}
