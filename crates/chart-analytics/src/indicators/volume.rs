//! 거래량 지표.
//!
//! OBV (On-Balance Volume)는 가격 방향에 따라 거래량을 누적합니다.
//!
//! ## 계산 방식
//! - 종가 상승: OBV += 거래량
//! - 종가 하락: OBV -= 거래량
//! - 종가 동일: OBV 변화 없음

use super::{ensure_same_len, IndicatorResult};

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators;

impl VolumeIndicators {
    pub fn new() -> Self {
        Self
    }

    /// OBV 계산. 첫 값은 0에서 시작합니다.
    pub fn obv(&self, close: &[f64], volume: &[f64]) -> IndicatorResult<Vec<Option<f64>>> {
        ensure_same_len(close, volume)?;

        let mut obv = Vec::with_capacity(close.len());
        let mut running = 0.0;
        for i in 0..close.len() {
            if i > 0 {
                if close[i] > close[i - 1] {
                    running += volume[i];
                } else if close[i] < close[i - 1] {
                    running -= volume[i];
                }
            }
            obv.push(Some(running));
        }
        Ok(obv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obv_accumulates_by_direction() {
        let calc = VolumeIndicators::new();
        let close = [10.0, 11.0, 10.5, 10.5, 12.0];
        let volume = [100.0, 200.0, 150.0, 300.0, 50.0];

        let obv = calc.obv(&close, &volume).unwrap();
        assert_eq!(
            obv,
            vec![Some(0.0), Some(200.0), Some(50.0), Some(50.0), Some(100.0)]
        );
    }

    #[test]
    fn test_obv_zero_volume() {
        let calc = VolumeIndicators::new();
        let obv = calc.obv(&[1.0, 2.0, 3.0], &[0.0; 3]).unwrap();
        assert!(obv.iter().all(|v| *v == Some(0.0)));
    }
}
