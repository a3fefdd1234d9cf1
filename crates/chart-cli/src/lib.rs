//! 차트 대시보드 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 가격 행 → Figure JSON / HTML 리포트 렌더링
//! - 지표 열 계산 및 CSV/JSON 내보내기
//! - 지표 이름 분류 조회
//! - 파라미터 세트, 자산 카탈로그 출력
//! - 데모용 샘플 데이터 생성

pub mod commands;

pub use commands::*;
