//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (볼린저 밴드)

use serde::{Deserialize, Serialize};

use super::{ensure_period, rolling_mean, rolling_sample_std, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: f64,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBandsParams {
    /// 좁은 채널 (14, 1.5).
    pub fn tight() -> Self {
        Self {
            period: 14,
            std_dev_multiplier: 1.5,
        }
    }

    /// 넓은 채널 (30, 2.5).
    pub fn wide() -> Self {
        Self {
            period: 30,
            std_dev_multiplier: 2.5,
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<f64>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<f64>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<f64>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// σ는 표본 표준편차(n-1)입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[f64],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        ensure_period("Bollinger", params.period)?;

        let values: Vec<Option<f64>> = prices.iter().map(|p| Some(*p)).collect();
        let middle = rolling_mean(&values, params.period);
        let std_dev = rolling_sample_std(&values, params.period);

        Ok(middle
            .into_iter()
            .zip(std_dev)
            .map(|(mid, sd)| match (mid, sd) {
                (Some(mid), Some(sd)) => BollingerBandsResult {
                    upper: Some(mid + sd * params.std_dev_multiplier),
                    middle: Some(mid),
                    lower: Some(mid - sd * params.std_dev_multiplier),
                },
                (mid, _) => BollingerBandsResult {
                    middle: mid,
                    ..Default::default()
                },
            })
            .collect())
    }
}
