//! 렌더링 출력 에러.
//!
//! Figure 조립 자체는 실패하지 않습니다. 여기의 에러는 리포트 템플릿과
//! JSON 직렬화 단계에서만 발생합니다.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// 템플릿 컴파일/렌더링 실패
    #[error("템플릿 에러: {0}")]
    Template(#[from] minijinja::Error),

    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
