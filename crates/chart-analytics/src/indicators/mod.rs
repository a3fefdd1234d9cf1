//! 기술적 지표 모듈.
//!
//! 차트에 표시할 기술적 지표를 계산합니다.
//! 이동평균, MACD, 롤링 최고/최저값은 ta-rs 라이브러리를 사용하고
//! 나머지는 커스텀 구현입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA / EMA**: 단순/지수 이동평균
//! - **MACD**: 이동평균 수렴/확산
//! - **ADX**: 평균 방향성 지수 (+DI, -DI 포함)
//! - **Parabolic SAR**
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수
//! - **Stochastic**: 스토캐스틱 오실레이터
//!
//! ## 변동성 / 거래량 / 일목균형표
//! - **Bollinger Bands**, **OBV**, **Ichimoku Cloud**
//!
//! 모든 지표는 입력과 같은 길이의 `Vec`을 반환하며, 계산할 수 없는 구간은 `None`입니다.
//! 데이터가 기간보다 짧으면 에러 대신 모든 값이 `None`이 됩니다.

pub mod ichimoku;
pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use thiserror::Error;

pub use ichimoku::{IchimokuIndicators, IchimokuParams, IchimokuResult};
pub use momentum::{MomentumCalculator, RsiParams, StochasticParams, StochasticResult};
pub use trend::{
    AdxParams, AdxResult, EmaParams, MacdParams, MacdResult, ParabolicSarParams, SmaParams,
    TrendIndicators,
};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};
pub use volume::VolumeIndicators;

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 입력 시리즈 길이 불일치
    #[error("시리즈 길이 불일치: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    /// 필수 컬럼 누락
    #[error("필수 컬럼이 없습니다: {0}")]
    MissingColumn(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 0으로 나누기를 피하기 위한 대체값.
pub(crate) const ZERO_GUARD: f64 = 0.00001;

/// 기간 파라미터 검증.
pub(crate) fn ensure_period(name: &str, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} 기간은 0보다 커야 합니다",
            name
        )));
    }
    Ok(())
}

/// 길이 검증.
pub(crate) fn ensure_same_len(left: &[f64], right: &[f64]) -> IndicatorResult<()> {
    if left.len() != right.len() {
        return Err(IndicatorError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

/// 0을 대체값으로 바꿉니다.
pub(crate) fn guard_zero(value: f64) -> f64 {
    if value == 0.0 {
        ZERO_GUARD
    } else {
        value
    }
}

/// 결측 구간을 전파하는 롤링 평균.
///
/// 창 안에 `None`이 하나라도 있으면 결과도 `None`입니다.
pub(crate) fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |slice| {
        slice.iter().sum::<f64>() / slice.len() as f64
    })
}

/// 결측 구간을 전파하는 롤링 표본 표준편차 (ddof = 1).
pub(crate) fn rolling_sample_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |slice| {
        if slice.len() < 2 {
            return f64::NAN;
        }
        let mean = slice.iter().sum::<f64>() / slice.len() as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (slice.len() - 1) as f64;
        var.sqrt()
    })
}

fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = Vec::with_capacity(values.len());
    let mut buf = Vec::with_capacity(window);
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
            continue;
        }
        buf.clear();
        let mut complete = true;
        for v in &values[i + 1 - window..=i] {
            match v {
                Some(x) => buf.push(*x),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        out.push(if complete {
            Some(f(&buf)).filter(|v| v.is_finite())
        } else {
            None
        });
    }
    out
}

/// 워밍업 구간(처음 `warmup`개)을 `None`으로 가립니다.
pub(crate) fn mask_warmup(values: Vec<f64>, warmup: usize) -> Vec<Option<f64>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i < warmup { None } else { Some(v) })
        .collect()
}

/// 통합 지표 엔진.
///
/// 모든 기술적 지표 계산을 위한 단일 진입점입니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    volume: VolumeIndicators,
    ichimoku: IchimokuIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (처음 period-1개는 None).
    pub fn sma(&self, prices: &[f64], params: SmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (첫 값부터 재귀 계산).
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 라인, 시그널 라인, 히스토그램.
    pub fn macd(&self, prices: &[f64], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// ADX와 방향성 지표.
    pub fn adx(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        self.trend.adx(high, low, close, params)
    }

    /// Parabolic SAR.
    pub fn parabolic_sar(
        &self,
        high: &[f64],
        low: &[f64],
        params: ParabolicSarParams,
    ) -> IndicatorResult<Vec<Option<f64>>> {
        self.trend.parabolic_sar(high, low, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (0-100).
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.momentum.rsi(prices, params)
    }

    /// 스토캐스틱 %K, %D.
    pub fn stochastic(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        self.momentum.stochastic(high, low, close, params)
    }

    // ==================== 변동성 / 거래량 ====================

    /// 볼린저 밴드.
    pub fn bollinger_bands(
        &self,
        prices: &[f64],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// On-Balance Volume.
    pub fn obv(&self, close: &[f64], volume: &[f64]) -> IndicatorResult<Vec<Option<f64>>> {
        self.volume.obv(close, volume)
    }

    // ==================== 일목균형표 ====================

    /// 일목균형표 구성 요소.
    pub fn ichimoku(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: IchimokuParams,
    ) -> IndicatorResult<Vec<IchimokuResult>> {
        self.ichimoku.calculate(high, low, close, params)
    }
}
