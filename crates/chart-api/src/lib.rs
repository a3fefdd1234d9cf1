//! 차트 대시보드 REST API 서버.
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`error`]: 통합 에러 응답
//! - [`app`]: 미들웨어가 적용된 전체 라우터

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::create_router;
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::{create_test_state, AppState};
