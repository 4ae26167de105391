use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::error::StoreError;

/// HTTP 层错误包装
///
/// [`StoreError`] 本身与传输无关，这里负责映射到状态码。
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self.0 {
            StoreError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
            StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::AlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
            StoreError::BackendUnreachable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "backend_unreachable")
            }
            StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            StoreError::Internal(err) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(error = %err, "Internal server error");
                let body = ErrorResponse {
                    error: "internal_error".into(),
                    message: "An internal error occurred".into(),
                };
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// 处理器的 Result 类型别名
pub type ApiResult<T> = std::result::Result<T, ApiError>;
