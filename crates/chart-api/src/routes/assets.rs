//! 자산 카탈로그 및 시장 요약 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/assets` - 유형별 심볼 목록
//! - `GET /api/parameters` - 파라미터 세트 이름
//! - `GET /api/optimal_indicators/{asset_type}` - 유형별 추천 지표
//! - `GET /api/market_summary` - 주요 자산 요약

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chart_analytics::{market_snapshot, optimal_indicators, MarketSnapshot, KEY_ASSETS};
use chart_core::{AssetCategory, ParameterSet, Period};
use tracing::{debug, warn};

use crate::state::AppState;

/// 유형별 심볼 목록.
///
/// GET /api/assets
pub async fn list_assets() -> Json<BTreeMap<&'static str, &'static [&'static str]>> {
    let catalog = AssetCategory::ALL
        .iter()
        .map(|category| (category.as_str(), category.symbols()))
        .collect();
    Json(catalog)
}

/// 파라미터 세트 이름 목록.
///
/// GET /api/parameters
pub async fn list_parameters() -> Json<Vec<&'static str>> {
    Json(ParameterSet::names())
}

/// 자산 유형별 추천 지표. 알 수 없는 유형은 범용 목록을 받습니다.
///
/// GET /api/optimal_indicators/{asset_type}
pub async fn get_optimal_indicators(Path(asset_type): Path<String>) -> Json<&'static [&'static str]> {
    let category = asset_type.parse::<AssetCategory>().ok();
    Json(optimal_indicators(category))
}

/// 주요 자산의 마지막 가격과 전일 대비 변동.
///
/// 데이터를 얻지 못한 자산은 건너뜁니다.
/// GET /api/market_summary
pub async fn market_summary(State(state): State<Arc<AppState>>) -> Json<Vec<MarketSnapshot>> {
    let mut summary = Vec::with_capacity(KEY_ASSETS.len());

    for asset in KEY_ASSETS {
        let rows = match state.store.load(asset, Period::OneMonth).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(asset, error = %e, "시장 요약 데이터 없음");
                continue;
            }
        };
        match market_snapshot(asset, &rows) {
            Some(snapshot) => summary.push(snapshot),
            None => debug!(asset, "종가가 두 개 미만"),
        }
    }

    Json(summary)
}

/// 자산 라우터 생성.
pub fn assets_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/parameters", get(list_parameters))
        .route("/optimal_indicators/{asset_type}", get(get_optimal_indicators))
        .route("/market_summary", get(market_summary))
}
