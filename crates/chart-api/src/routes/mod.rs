//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api` - 엔드포인트 목록
//! - `/api/assets`, `/api/parameters`, `/api/optimal_indicators`, `/api/market_summary` - 카탈로그
//! - `/api/data`, `/api/indicators`, `/api/chart-data`, `/api/figure`, `/api/report` - 심볼별 차트

pub mod assets;
pub mod chart;
pub mod health;

pub use assets::assets_router;
pub use chart::{chart_router, ChartQuery, RowsResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// 엔드포인트 목록 응답.
#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub name: &'static str,
    pub version: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

const ENDPOINTS: [(&str, &str); 11] = [
    ("GET /api/assets", "유형별 자산 목록"),
    ("GET /api/parameters", "지표 파라미터 세트 목록"),
    ("GET /api/data/{symbol}", "원본 가격 행"),
    ("GET /api/indicators/{symbol}", "지표 행"),
    ("GET /api/chart-data/{symbol}", "가격 + 지표 행"),
    ("GET /api/figure/{symbol}", "다중 페인 Figure JSON"),
    ("GET /api/report/{symbol}", "HTML 분석 리포트"),
    ("GET /api/optimal_indicators/{asset_type}", "자산 유형별 추천 지표"),
    ("GET /api/market_summary", "주요 자산 요약"),
    ("GET /health", "liveness"),
    ("GET /health/ready", "readiness"),
];

/// GET /api
pub async fn api_index(State(state): State<Arc<AppState>>) -> Json<ApiIndex> {
    Json(ApiIndex {
        name: "Chart Dashboard API",
        version: state.version.clone(),
        endpoints: ENDPOINTS.into_iter().collect(),
    })
}

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    let api = Router::new()
        .route("/", get(api_index))
        .merge(assets_router())
        .merge(chart_router());

    Router::new()
        .nest("/health", health_router())
        .nest("/api", api)
}
