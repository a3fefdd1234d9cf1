//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트가 같은 JSON 에러 형식을 사용합니다.
//!
//! ```json
//! {
//!   "code": "DATA_NOT_FOUND",
//!   "message": "데이터를 찾을 수 없습니다: GOLD",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::http::StatusCode;
use axum::Json;
use chart_analytics::IndicatorError;
use chart_core::ChartError;
use chart_data::DataError;
use chart_render::RenderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_PARAMETER_SET", "DATA_NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 상세 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 시각 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn with_details(code: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 에러 (상태 코드 + 본문).
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

pub fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 입력 해석 에러 → 400.
pub fn from_chart_error(err: ChartError) -> ApiError {
    let code = match &err {
        ChartError::InvalidParameterSet(_) => "INVALID_PARAMETER_SET",
        ChartError::InvalidPeriod(_) => "INVALID_PERIOD",
        ChartError::InvalidAssetCategory(_) => "INVALID_ASSET_TYPE",
        _ => "INVALID_INPUT",
    };
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    api_error(status, code, err.to_string())
}

/// 데이터 접근 에러. 데이터 없음은 404, 원격 실패는 502.
pub fn from_data_error(err: DataError) -> ApiError {
    match &err {
        DataError::NotFound(symbol) => api_error(
            StatusCode::NOT_FOUND,
            "DATA_NOT_FOUND",
            format!("데이터를 찾을 수 없습니다: {}", symbol),
        ),
        DataError::FetchError(_) | DataError::ParseError(_) => {
            api_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", err.to_string())
        }
        _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, "DATA_ERROR", err.to_string()),
    }
}

pub fn from_indicator_error(err: IndicatorError) -> ApiError {
    api_error(StatusCode::UNPROCESSABLE_ENTITY, "INDICATOR_ERROR", err.to_string())
}

pub fn from_render_error(err: RenderError) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR", err.to_string())
}

/// 상태 구성 실패.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_json() {
        let err = ApiErrorResponse::new("DATA_NOT_FOUND", "없음");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "DATA_NOT_FOUND");
        assert!(json.get("details").is_none());
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn test_status_mapping() {
        let (status, body) = from_chart_error(ChartError::InvalidPeriod("9y".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_PERIOD");

        let (status, _) = from_data_error(DataError::NotFound("GOLD".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = from_data_error(DataError::FetchError("timeout".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
