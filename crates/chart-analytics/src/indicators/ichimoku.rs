//! 일목균형표 (Ichimoku Cloud).
//!
//! | 구성 요소 | 계산 |
//! |-----------|------|
//! | 전환선 (Tenkan) | (tenkan 기간 최고가 + 최저가) / 2 |
//! | 기준선 (Kijun) | (kijun 기간 최고가 + 최저가) / 2 |
//! | 선행스팬 A | (전환선 + 기준선) / 2, kijun만큼 앞으로 이동 |
//! | 선행스팬 B | (senkou 기간 최고가 + 최저가) / 2, kijun만큼 앞으로 이동 |
//! | 후행스팬 (Chikou) | 종가를 kijun만큼 뒤로 이동 |
//!
//! 출력 길이는 입력과 같으므로 앞으로 이동한 값 중 마지막 kijun개는 잘립니다.

use serde::{Deserialize, Serialize};
use ta::indicators::{Maximum, Minimum};
use ta::Next;

use super::{ensure_period, ensure_same_len, mask_warmup, IndicatorError, IndicatorResult};

/// 일목균형표 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IchimokuParams {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan: 9,
            kijun: 26,
            senkou: 52,
        }
    }
}

/// 일목균형표 결과 (한 봉).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IchimokuResult {
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub span_a: Option<f64>,
    pub span_b: Option<f64>,
    pub chikou: Option<f64>,
}

/// 일목균형표 계산기.
#[derive(Debug, Default)]
pub struct IchimokuIndicators;

impl IchimokuIndicators {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        params: IchimokuParams,
    ) -> IndicatorResult<Vec<IchimokuResult>> {
        ensure_period("Ichimoku tenkan", params.tenkan)?;
        ensure_period("Ichimoku kijun", params.kijun)?;
        ensure_period("Ichimoku senkou", params.senkou)?;
        ensure_same_len(high, low)?;
        ensure_same_len(high, close)?;

        let tenkan = midpoint(high, low, params.tenkan)?;
        let kijun = midpoint(high, low, params.kijun)?;
        let senkou = midpoint(high, low, params.senkou)?;
        let shift = params.kijun;
        let n = close.len();

        let results = (0..n)
            .map(|i| {
                let (span_a, span_b) = if i >= shift {
                    let j = i - shift;
                    let span_a = match (tenkan[j], kijun[j]) {
                        (Some(t), Some(k)) => Some((t + k) / 2.0),
                        _ => None,
                    };
                    (span_a, senkou[j])
                } else {
                    (None, None)
                };

                IchimokuResult {
                    tenkan: tenkan[i],
                    kijun: kijun[i],
                    span_a,
                    span_b,
                    chikou: close.get(i + shift).copied(),
                }
            })
            .collect();

        Ok(results)
    }
}

/// 기간 내 (최고가 + 최저가) / 2.
fn midpoint(high: &[f64], low: &[f64], period: usize) -> IndicatorResult<Vec<Option<f64>>> {
    let invalid = |_| IndicatorError::InvalidParameter(format!("Ichimoku({})", period));
    let mut highest = Maximum::new(period).map_err(invalid)?;
    let mut lowest = Minimum::new(period).map_err(invalid)?;

    let mid = high
        .iter()
        .zip(low)
        .map(|(h, l)| (highest.next(*h) + lowest.next(*l)) / 2.0)
        .collect();
    Ok(mask_warmup(mid, period - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let high = close.iter().map(|c| c + 1.0).collect();
        let low = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn test_component_availability() {
        let (high, low, close) = series(120);
        let result = IchimokuIndicators::new()
            .calculate(&high, &low, &close, IchimokuParams::default())
            .unwrap();

        assert!(result[7].tenkan.is_none());
        assert!(result[8].tenkan.is_some());
        assert!(result[25].kijun.is_some());
        // 선행스팬 A: kijun 준비(25) + 이동(26)
        assert!(result[50].span_a.is_none());
        assert!(result[51].span_a.is_some());
        // 선행스팬 B: senkou 준비(51) + 이동(26)
        assert!(result[76].span_b.is_none());
        assert!(result[77].span_b.is_some());
        // 후행스팬은 마지막 26개가 비어 있음
        assert_eq!(result[0].chikou, Some(close[26]));
        assert!(result[93].chikou.is_some());
        assert!(result[94].chikou.is_none());
    }

    #[test]
    fn test_tenkan_midpoint_value() {
        let (high, low, close) = series(30);
        let result = IchimokuIndicators::new()
            .calculate(&high, &low, &close, IchimokuParams::default())
            .unwrap();

        // 9봉 창 [2..=10]: 최고 111, 최저 101
        assert_eq!(result[10].tenkan, Some(106.0));
    }
}
