//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 차트 설정과 파이프라인은 불변이며 `Arc`로 공유됩니다.

use std::sync::Arc;

use chart_analytics::IndicatorCalculator;
use chart_core::{AppConfig, ParameterSet, Period};
use chart_data::DataStore;
use chart_render::{ChartConfig, ChartPipeline, ReportRenderer};

use crate::error::StateError;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 로드된 설정
    pub config: Arc<AppConfig>,

    /// Figure 파이프라인 (불변 차트 설정 공유)
    pub pipeline: ChartPipeline,

    /// 지표 계산기
    pub calculator: Arc<IndicatorCalculator>,

    /// 데이터 디렉터리 + 원격 제공자
    pub store: DataStore,

    /// HTML 리포트 렌더러
    pub reports: Arc<ReportRenderer>,

    /// 쿼리에 기간이 없을 때 사용
    pub default_period: Period,

    /// 쿼리에 파라미터 세트가 없을 때 사용
    pub default_parameter_set: ParameterSet,

    /// 서버 시작 시각
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 설정으로 상태를 구성합니다.
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let store = DataStore::from_config(&config.data)?;
        Self::with_store(config, store)
    }

    /// 주어진 저장소로 상태를 구성합니다.
    pub fn with_store(config: AppConfig, store: DataStore) -> Result<Self, StateError> {
        let default_period: Period = config.data.default_period.parse()?;
        let default_parameter_set: ParameterSet = config.data.default_parameter_set.parse()?;
        let chart_config = ChartConfig::standard().with_height(config.render.height);
        let reports = ReportRenderer::new(config.render.plotly_js_url.clone())?;

        Ok(Self {
            config: Arc::new(config),
            pipeline: ChartPipeline::new(Arc::new(chart_config)),
            calculator: Arc::new(IndicatorCalculator::new()),
            store,
            reports: Arc::new(reports),
            default_period,
            default_parameter_set,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 상태. 원격 제공자 없이 주어진 디렉터리만 사용합니다.
pub fn create_test_state(data_dir: impl Into<std::path::PathBuf>) -> AppState {
    let config = AppConfig::default();
    AppState::with_store(config, DataStore::new(data_dir))
        .unwrap_or_else(|e| panic!("테스트 상태 구성 실패: {}", e))
}
