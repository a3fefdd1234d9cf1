//! 차트 시스템의 에러 타입.
//!
//! 이 모듈은 크레이트 전반에서 공유되는 입력/설정 에러를 정의합니다.
//! 렌더링 파이프라인 자체는 실패하지 않으며, 여기의 에러는 입력 해석 단계에서만 발생합니다.

use thiserror::Error;

/// 핵심 차트 에러.
#[derive(Debug, Error)]
pub enum ChartError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 알 수 없는 파라미터 세트
    #[error("잘못된 파라미터 세트: {0}")]
    InvalidParameterSet(String),

    /// 알 수 없는 조회 기간
    #[error("잘못된 기간: {0}")]
    InvalidPeriod(String),

    /// 알 수 없는 자산 유형
    #[error("잘못된 자산 유형: {0}")]
    InvalidAssetCategory(String),

    /// 날짜 파싱 실패
    #[error("잘못된 날짜: {0}")]
    InvalidDate(String),

    /// 행 구조 에러
    #[error("잘못된 행: {0}")]
    InvalidRow(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),
}

/// 차트 작업을 위한 Result 타입.
pub type ChartResult<T> = Result<T, ChartError>;

impl ChartError {
    /// 사용자 입력이 원인인 에러인지 확인합니다.
    ///
    /// API 계층에서 400 응답 여부를 결정할 때 사용합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ChartError::InvalidParameterSet(_)
                | ChartError::InvalidPeriod(_)
                | ChartError::InvalidAssetCategory(_)
                | ChartError::InvalidDate(_)
                | ChartError::InvalidRow(_)
        )
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_client_classification() {
        let err = ChartError::InvalidParameterSet("foo".to_string());
        assert!(err.is_client_error());

        let err = ChartError::Io("disk".to_string());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = ChartError::InvalidPeriod("9y".to_string());
        assert_eq!(err.to_string(), "잘못된 기간: 9y");
    }
}
