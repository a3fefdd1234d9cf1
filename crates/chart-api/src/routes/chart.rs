//! 심볼별 차트 데이터 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/data/{symbol}` - 원본 가격 행
//! - `GET /api/indicators/{symbol}` - 날짜와 지표 열만
//! - `GET /api/chart-data/{symbol}` - 가격 + 지표 행
//! - `GET /api/figure/{symbol}` - Figure JSON
//! - `GET /api/report/{symbol}` - HTML 리포트
//!
//! 모든 엔드포인트는 `parameter_set`, `period` 쿼리를 받으며
//! 생략하면 설정의 기본값을 사용합니다.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use chart_core::{render_span, ParameterSet, Period, PriceRow};
use chart_render::{FigureSpec, ReportMeta};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, Instrument};

use crate::error::{
    from_chart_error, from_data_error, from_indicator_error, from_render_error, ApiError,
    ApiResult,
};
use crate::state::AppState;

/// 차트 쿼리 파라미터.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub parameter_set: Option<String>,
    pub period: Option<String>,
}

impl ChartQuery {
    /// 쿼리 값을 해석합니다. 잘못된 값은 400으로 응답합니다.
    fn resolve(&self, state: &AppState) -> ApiResult<(ParameterSet, Period)> {
        let parameter_set = match &self.parameter_set {
            Some(raw) => raw.parse().map_err(from_chart_error)?,
            None => state.default_parameter_set,
        };
        let period = match &self.period {
            Some(raw) => raw.parse().map_err(from_chart_error)?,
            None => state.default_period,
        };
        Ok((parameter_set, period))
    }
}

/// 행 목록 응답.
#[derive(Debug, Serialize)]
pub struct RowsResponse<T: Serialize> {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_set: Option<ParameterSet>,
    pub data: Vec<T>,
}

/// 행을 읽고 지표를 붙입니다.
async fn load_with_indicators(
    state: &AppState,
    symbol: &str,
    parameter_set: ParameterSet,
    period: Period,
) -> ApiResult<Vec<PriceRow>> {
    let rows = state
        .store
        .load(symbol, period)
        .await
        .map_err(from_data_error)?;
    state
        .calculator
        .calculate(rows, parameter_set)
        .map_err(from_indicator_error)
}

/// 날짜와 지표 열만 남긴 JSON 객체.
fn indicator_object(row: &PriceRow) -> Map<String, Value> {
    let mut object = Map::with_capacity(row.indicators.len() + 1);
    object.insert("Date".to_string(), Value::String(row.date_label()));
    for (name, value) in &row.indicators {
        let value = value
            .filter(|v| v.is_finite())
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number);
        object.insert(name.clone(), value);
    }
    object
}

fn figure_title(symbol: &str, parameter_set: ParameterSet) -> String {
    format!("{} - {}", symbol, parameter_set.title())
}

/// 원본 가격 행.
///
/// GET /api/data/{symbol}
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<RowsResponse<PriceRow>>> {
    let (_, period) = query.resolve(&state)?;
    let rows = state
        .store
        .load(&symbol, period)
        .await
        .map_err(from_data_error)?;

    Ok(Json(RowsResponse {
        symbol,
        parameter_set: None,
        data: rows,
    }))
}

/// 지표 행. 가격 열은 제외합니다.
///
/// GET /api/indicators/{symbol}
pub async fn get_indicators(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<RowsResponse<Map<String, Value>>>> {
    let (parameter_set, period) = query.resolve(&state)?;
    let span = render_span!("indicators", symbol, parameter_set, period);

    async move {
        let rows = load_with_indicators(&state, &symbol, parameter_set, period).await?;
        let data: Vec<Map<String, Value>> = rows.iter().map(indicator_object).collect();
        Ok::<_, ApiError>(Json(RowsResponse {
            symbol,
            parameter_set: Some(parameter_set),
            data,
        }))
    }
    .instrument(span)
    .await
}

/// 가격 + 지표 행.
///
/// GET /api/chart-data/{symbol}
pub async fn get_chart_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<RowsResponse<PriceRow>>> {
    let (parameter_set, period) = query.resolve(&state)?;
    let span = render_span!("chart_data", symbol, parameter_set, period);

    async move {
        let rows = load_with_indicators(&state, &symbol, parameter_set, period).await?;
        info!(rows = rows.len(), "차트 데이터 응답");
        Ok::<_, ApiError>(Json(RowsResponse {
            symbol,
            parameter_set: Some(parameter_set),
            data: rows,
        }))
    }
    .instrument(span)
    .await
}

/// Figure 명세.
///
/// GET /api/figure/{symbol}
pub async fn get_figure(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<FigureSpec>> {
    let (parameter_set, period) = query.resolve(&state)?;
    let span = render_span!("figure", symbol, parameter_set, period);

    async move {
        let rows = load_with_indicators(&state, &symbol, parameter_set, period).await?;
        let figure = state
            .pipeline
            .render(&rows, &figure_title(&symbol, parameter_set));
        info!(traces = figure.traces.len(), "Figure 응답");
        Ok::<_, ApiError>(Json(figure))
    }
    .instrument(span)
    .await
}

/// HTML 리포트.
///
/// GET /api/report/{symbol}
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Html<String>> {
    let (parameter_set, period) = query.resolve(&state)?;
    let span = render_span!("report", symbol, parameter_set, period);

    async move {
        let rows = load_with_indicators(&state, &symbol, parameter_set, period).await?;
        let figure = state
            .pipeline
            .render(&rows, &figure_title(&symbol, parameter_set));
        let meta = ReportMeta {
            symbol,
            parameter_set,
            period,
        };
        let html = state
            .reports
            .render(&figure, &rows, &meta)
            .map_err(from_render_error)?;
        Ok::<_, ApiError>(Html(html))
    }
    .instrument(span)
    .await
}

/// 차트 라우터 생성.
pub fn chart_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/data/{symbol}", get(get_data))
        .route("/indicators/{symbol}", get(get_indicators))
        .route("/chart-data/{symbol}", get(get_chart_data))
        .route("/figure/{symbol}", get(get_figure))
        .route("/report/{symbol}", get(get_report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_indicator_object_drops_price_columns() {
        let row = PriceRow::on(day(1))
            .with_ohlc(1.0, 2.0, 0.5, 1.5)
            .with_indicator("RSI", Some(55.0))
            .with_indicator("SMA20", Some(f64::NAN));

        let object = indicator_object(&row);
        assert_eq!(object["Date"], "2024-03-01");
        assert_eq!(object["RSI"], 55.0);
        assert!(object["SMA20"].is_null());
        assert!(!object.contains_key("Close"));
    }

    #[test]
    fn test_query_defaults_and_errors() {
        let state = create_test_state(std::env::temp_dir());

        let (set, period) = ChartQuery::default().resolve(&state).unwrap();
        assert_eq!(set, ParameterSet::Default);
        assert_eq!(period, Period::OneYear);

        let query = ChartQuery {
            parameter_set: Some("ichimoku".into()),
            period: Some("6mo".into()),
        };
        assert_eq!(
            query.resolve(&state).unwrap(),
            (ParameterSet::Ichimoku, Period::SixMonths)
        );

        let bad = ChartQuery {
            parameter_set: Some("turbo".into()),
            period: None,
        };
        let (status, body) = bad.resolve(&state).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_PARAMETER_SET");
    }

    #[tokio::test]
    async fn test_missing_symbol_is_404() {
        let dir = std::env::temp_dir().join(format!("chart-api-chart-empty-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let app = chart_router().with_state(Arc::new(create_test_state(dir.clone())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/figure/GOLD")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
