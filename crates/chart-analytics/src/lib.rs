//! 기술적 지표 계산.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 개별 지표 계산기 ([`indicators`])
//! - 파라미터 세트별 지표 컬럼 계산 ([`IndicatorCalculator`])
//! - 리포트 판독값, 추세 신호, 추천 지표, 시장 요약 ([`readings`])

pub mod calculator;
pub mod indicators;
pub mod readings;

pub use calculator::IndicatorCalculator;
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
pub use readings::{
    latest_readings, market_snapshot, optimal_indicators, trend_signals, IndicatorReadings,
    MarketSnapshot, Reading, ReadingSection, TrendSignal, TrendSignals, KEY_ASSETS,
};
