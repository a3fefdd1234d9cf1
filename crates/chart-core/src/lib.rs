//! # Chart Core
//!
//! 차트 대시보드 전반에서 사용되는 핵심 타입을 제공합니다.
//!
//! 이 크레이트는 다음을 포함합니다:
//! - 가격 행(`PriceRow`)과 JSON 직렬화 규칙
//! - 파라미터 세트, 조회 기간, 자산 카탈로그 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
