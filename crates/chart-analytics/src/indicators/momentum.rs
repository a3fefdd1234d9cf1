//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index)
//! - Stochastic Oscillator

use serde::{Deserialize, Serialize};
use ta::indicators::{Maximum, Minimum};
use ta::Next;

use super::{
    ensure_period, ensure_same_len, guard_zero, mask_warmup, rolling_mean, IndicatorError,
    IndicatorResult,
};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 스토캐스틱 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticParams {
    /// %K 기간 (기본: 14).
    pub k_period: usize,
    /// %K 평활 기간 (기본: 3).
    pub smooth_k: usize,
    /// %D 기간 (기본: 3).
    pub d_period: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            smooth_k: 3,
            d_period: 3,
        }
    }
}

/// 스토캐스틱 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticResult {
    /// %K (평활 적용).
    pub k: Option<f64>,
    /// %D (%K의 이동평균).
    pub d: Option<f64>,
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 단순 롤링 평균이며 첫 봉의 변화량은 0으로 봅니다.
    /// 평균 하락폭이 0이면 0.00001로 대체합니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - RSI 파라미터
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> IndicatorResult<Vec<Option<f64>>> {
        ensure_period("RSI", params.period)?;

        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            let delta = if i == 0 { 0.0 } else { prices[i] - prices[i - 1] };
            gains.push(Some(delta.max(0.0)));
            losses.push(Some((-delta).max(0.0)));
        }

        let avg_gain = rolling_mean(&gains, params.period);
        let avg_loss = rolling_mean(&losses, params.period);

        Ok(avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(gain), Some(loss)) => {
                    let rs = gain / guard_zero(loss);
                    Some(100.0 - 100.0 / (1.0 + rs))
                }
                _ => None,
            })
            .collect())
    }

    /// 스토캐스틱 오실레이터 계산.
    ///
    /// 원시 %K = 100 * (종가 - 최저가) / (최고가 - 최저가)
    /// 를 `smooth_k`로 평활한 값이 %K, 그 이동평균이 %D입니다.
    pub fn stochastic(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        ensure_period("Stochastic %K", params.k_period)?;
        ensure_period("Stochastic %D", params.d_period)?;
        ensure_same_len(high, low)?;
        ensure_same_len(high, close)?;

        let invalid = |_| IndicatorError::InvalidParameter(format!("Stochastic({})", params.k_period));
        let mut highest = Maximum::new(params.k_period).map_err(invalid)?;
        let mut lowest = Minimum::new(params.k_period).map_err(invalid)?;

        let highs = mask_warmup(
            high.iter().map(|h| highest.next(*h)).collect(),
            params.k_period - 1,
        );
        let lows = mask_warmup(
            low.iter().map(|l| lowest.next(*l)).collect(),
            params.k_period - 1,
        );

        let raw_k: Vec<Option<f64>> = close
            .iter()
            .zip(highs.iter().zip(lows.iter()))
            .map(|(c, (h, l))| match (h, l) {
                (Some(h), Some(l)) => Some(100.0 * (c - l) / guard_zero(h - l)),
                _ => None,
            })
            .collect();

        let k = if params.smooth_k > 1 {
            rolling_mean(&raw_k, params.smooth_k)
        } else {
            raw_k
        };
        let d = rolling_mean(&k, params.d_period);

        Ok(k
            .into_iter()
            .zip(d)
            .map(|(k, d)| StochasticResult { k, d })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_warmup_and_range() {
        let calc = MomentumCalculator::new();
        let prices: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.7).sin() * 3.0).collect();
        let rsi = calc.rsi(&prices, RsiParams::default()).unwrap();

        assert_eq!(rsi.len(), prices.len());
        assert!(rsi[..13].iter().all(|v| v.is_none()));
        for value in rsi[13..].iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_rsi_monotonic_rise_near_100() {
        let calc = MomentumCalculator::new();
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let rsi = calc.rsi(&prices, RsiParams::default()).unwrap();

        // 하락이 없으면 평균 하락폭 대체값으로 100에 수렴
        assert!(rsi[19].unwrap() > 99.99);
    }

    #[test]
    fn test_rsi_flat_series_is_zero() {
        let calc = MomentumCalculator::new();
        let prices = vec![10.0; 20];
        let rsi = calc.rsi(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi[19], Some(0.0));
    }

    #[test]
    fn test_stochastic_warmup() {
        let calc = MomentumCalculator::new();
        let high: Vec<f64> = (0..30).map(|i| 12.0 + (i as f64 * 0.5).sin()).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 2.0).collect();
        let close: Vec<f64> = high.iter().map(|h| h - 1.0).collect();

        let result = calc
            .stochastic(&high, &low, &close, StochasticParams::default())
            .unwrap();

        // 원시 %K는 13부터, 평활 %K는 15부터, %D는 17부터
        assert!(result[14].k.is_none());
        assert!(result[15].k.is_some());
        assert!(result[16].d.is_none());
        assert!(result[17].d.is_some());
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let calc = MomentumCalculator::new();
        let high: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let low: Vec<f64> = (0..20).map(|i| 8.0 + i as f64).collect();

        let result = calc
            .stochastic(&high, &low, &high, StochasticParams::default())
            .unwrap();
        let k = result[19].k.unwrap();
        assert!((k - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_stochastic_length_mismatch() {
        let calc = MomentumCalculator::new();
        let err = calc.stochastic(&[1.0, 2.0], &[1.0], &[1.0, 2.0], StochasticParams::default());
        assert!(matches!(err, Err(IndicatorError::LengthMismatch { .. })));
    }
}
