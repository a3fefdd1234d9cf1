//! 추세 지표 (Trend Indicators).
//!
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//! - ADX (Average Directional Index)
//! - Parabolic SAR

use serde::{Deserialize, Serialize};
use ta::indicators::{
    ExponentialMovingAverage, MovingAverageConvergenceDivergence, SimpleMovingAverage,
};
use ta::Next;

use super::{
    ensure_period, ensure_same_len, guard_zero, mask_warmup, rolling_mean, IndicatorError,
    IndicatorResult,
};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    /// 고빈도 MACD (5, 35, 5).
    pub fn high_frequency() -> Self {
        Self {
            fast_period: 5,
            slow_period: 35,
            signal_period: 5,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<f64>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<f64>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<f64>,
}

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// 평활 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdxResult {
    pub adx: Option<f64>,
    /// +DI
    pub plus_di: Option<f64>,
    /// -DI
    pub minus_di: Option<f64>,
}

/// Parabolic SAR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParabolicSarParams {
    /// 초기 가속 계수.
    pub af_start: f64,
    /// 가속 계수 증가폭.
    pub af_step: f64,
    /// 가속 계수 상한.
    pub af_max: f64,
}

impl Default for ParabolicSarParams {
    fn default() -> Self {
        Self {
            af_start: 0.02,
            af_step: 0.02,
            af_max: 0.2,
        }
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// ta의 SMA는 창이 차기 전에도 부분 평균을 내므로 처음 period-1개를 가립니다.
    pub fn sma(&self, prices: &[f64], params: SmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        ensure_period("SMA", params.period)?;
        let mut sma = SimpleMovingAverage::new(params.period)
            .map_err(|_| IndicatorError::InvalidParameter(format!("SMA({})", params.period)))?;

        let raw: Vec<f64> = prices.iter().map(|p| sma.next(*p)).collect();
        Ok(mask_warmup(raw, params.period - 1))
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// α = 2 / (period + 1), 첫 값은 첫 가격입니다.
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        ensure_period("EMA", params.period)?;
        let mut ema = ExponentialMovingAverage::new(params.period)
            .map_err(|_| IndicatorError::InvalidParameter(format!("EMA({})", params.period)))?;

        Ok(prices.iter().map(|p| Some(ema.next(*p))).collect())
    }

    /// MACD 계산.
    pub fn macd(&self, prices: &[f64], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        ensure_period("MACD fast", params.fast_period)?;
        ensure_period("MACD slow", params.slow_period)?;
        ensure_period("MACD signal", params.signal_period)?;
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(
                "단기 기간은 장기 기간보다 작아야 합니다".to_string(),
            ));
        }

        let mut macd = MovingAverageConvergenceDivergence::new(
            params.fast_period,
            params.slow_period,
            params.signal_period,
        )
        .map_err(|_| {
            IndicatorError::InvalidParameter(format!(
                "MACD({},{},{})",
                params.fast_period, params.slow_period, params.signal_period
            ))
        })?;

        Ok(prices
            .iter()
            .map(|p| {
                let out = macd.next(*p);
                MacdResult {
                    macd: Some(out.macd),
                    signal: Some(out.signal),
                    histogram: Some(out.histogram),
                }
            })
            .collect())
    }

    /// ADX (Average Directional Index) 계산.
    ///
    /// TR, +DM, -DM을 Wilder 방식으로 누적 평활한 뒤
    /// DX의 롤링 평균을 ADX로 사용합니다. +DI/-DI는 첫 봉부터 정의됩니다.
    pub fn adx(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        ensure_period("ADX", params.period)?;
        ensure_same_len(high, low)?;
        ensure_same_len(high, close)?;

        let n = high.len();
        let length = params.period as f64;
        let mut results = Vec::with_capacity(n);
        let mut dx = Vec::with_capacity(n);

        let mut smoothed_tr = 0.0;
        let mut smoothed_pdm = 0.0;
        let mut smoothed_ndm = 0.0;

        for i in 0..n {
            let (tr, pdm, ndm) = if i == 0 {
                (high[0] - low[0], 0.0, 0.0)
            } else {
                let tr = (high[i] - low[i])
                    .max((high[i] - close[i - 1]).abs())
                    .max((low[i] - close[i - 1]).abs());
                let up_move = high[i] - high[i - 1];
                let down_move = low[i - 1] - low[i];
                let pdm = if up_move > down_move && up_move > 0.0 {
                    up_move
                } else {
                    0.0
                };
                let ndm = if down_move > up_move && down_move > 0.0 {
                    down_move
                } else {
                    0.0
                };
                (tr, pdm, ndm)
            };

            if i == 0 {
                smoothed_tr = tr;
                smoothed_pdm = pdm;
                smoothed_ndm = ndm;
            } else {
                smoothed_tr = smoothed_tr - smoothed_tr / length + tr;
                smoothed_pdm = smoothed_pdm - smoothed_pdm / length + pdm;
                smoothed_ndm = smoothed_ndm - smoothed_ndm / length + ndm;
            }

            let tr_base = guard_zero(smoothed_tr);
            let pdi = 100.0 * smoothed_pdm / tr_base;
            let ndi = 100.0 * smoothed_ndm / tr_base;
            dx.push(Some(100.0 * (pdi - ndi).abs() / guard_zero(pdi + ndi)));

            results.push(AdxResult {
                adx: None,
                plus_di: Some(pdi),
                minus_di: Some(ndi),
            });
        }

        for (result, adx) in results.iter_mut().zip(rolling_mean(&dx, params.period)) {
            result.adx = adx;
        }

        Ok(results)
    }

    /// Parabolic SAR 계산.
    ///
    /// 첫 봉은 상승 추세로 가정하고 저가에서 시작합니다.
    pub fn parabolic_sar(
        &self,
        high: &[f64],
        low: &[f64],
        params: ParabolicSarParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        ensure_same_len(high, low)?;
        if params.af_start <= 0.0 || params.af_max < params.af_start {
            return Err(IndicatorError::InvalidParameter(format!(
                "SAR 가속 계수: start={}, max={}",
                params.af_start, params.af_max
            )));
        }
        if high.is_empty() {
            return Ok(Vec::new());
        }

        let mut sar = Vec::with_capacity(high.len());
        let mut current = low[0];
        let mut ep = high[0];
        let mut af = params.af_start;
        let mut uptrend = true;
        sar.push(Some(current));

        for i in 1..high.len() {
            if uptrend {
                current += af * (ep - current);
                if low[i] < current {
                    uptrend = false;
                    current = ep;
                    ep = low[i];
                    af = params.af_start;
                } else if high[i] > ep {
                    ep = high[i];
                    af = (af + params.af_step).min(params.af_max);
                }
            } else {
                current -= af * (current - ep);
                if high[i] > current {
                    uptrend = true;
                    current = ep;
                    ep = high[i];
                    af = params.af_start;
                } else if low[i] < ep {
                    ep = low[i];
                    af = (af + params.af_step).min(params.af_max);
                }
            }
            sar.push(Some(current));
        }

        Ok(sar)
    }
}
