//! 파라미터 세트별 지표 컬럼 계산.
//!
//! 가격 행에 지표 컬럼을 덧붙입니다. 어떤 컬럼이 추가되는지는
//! [`ParameterSet`]에 따라 달라집니다.

use std::collections::BTreeMap;

use chart_core::{ParameterSet, PriceRow};
use tracing::{debug, warn};

use crate::indicators::{
    AdxParams, BollingerBandsParams, BollingerBandsResult, EmaParams, IchimokuParams,
    IndicatorEngine, IndicatorError, IndicatorResult, MacdParams, MacdResult, ParabolicSarParams,
    RsiParams, SmaParams, StochasticParams,
};

/// 항상 계산하는 이동평균 기간.
const MA_WINDOWS: [usize; 6] = [5, 10, 20, 50, 100, 150];

/// OBV 이동평균 기간.
const OBV_MA_PERIOD: usize = 20;

/// 지표 입력 열 (HLCV).
struct PriceColumns {
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

/// 지표 컬럼 계산기.
#[derive(Debug, Default)]
pub struct IndicatorCalculator {
    engine: IndicatorEngine,
}

impl IndicatorCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 행마다 지표 값을 채워 반환합니다.
    ///
    /// Open/High/Low/Close가 모두 유한한 행만 사용하며 나머지 행은 건너뜁니다.
    /// 어떤 행에도 해당 필드가 없으면 [`IndicatorError::MissingColumn`]을 반환합니다.
    /// 거래량이 없으면 0으로 봅니다.
    pub fn calculate(
        &self,
        rows: Vec<PriceRow>,
        parameter_set: ParameterSet,
    ) -> IndicatorResult<Vec<PriceRow>> {
        if rows.is_empty() {
            return Ok(rows);
        }
        ensure_columns(&rows)?;

        let total = rows.len();
        let mut rows: Vec<PriceRow> = rows.into_iter().filter(has_ohlc).collect();
        if rows.len() < total {
            warn!(
                skipped = total - rows.len(),
                "OHLC 값이 빠진 행을 건너뜁니다"
            );
        }

        let prices = price_columns(&rows);
        let columns = self.columns(&prices, parameter_set)?;
        debug!(
            parameter_set = %parameter_set,
            rows = rows.len(),
            columns = columns.len(),
            "지표 계산 완료"
        );

        for (name, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.indicators.insert(name.clone(), value);
            }
        }

        Ok(rows)
    }

    fn columns(
        &self,
        p: &PriceColumns,
        parameter_set: ParameterSet,
    ) -> IndicatorResult<BTreeMap<String, Vec<Option<f64>>>> {
        use ParameterSet as Set;

        let engine = &self.engine;
        let mut out = BTreeMap::new();
        let includes = |sets: &[ParameterSet]| sets.contains(&parameter_set);

        for period in MA_WINDOWS {
            out.insert(format!("SMA{}", period), engine.sma(&p.close, SmaParams { period })?);
            out.insert(format!("EMA{}", period), engine.ema(&p.close, EmaParams { period })?);
        }

        if includes(&[Set::Default, Set::ShortTerm]) {
            for period in [9, 21] {
                out.insert(format!("SMA{}", period), engine.sma(&p.close, SmaParams { period })?);
            }
            for period in [12, 26] {
                out.insert(format!("EMA{}", period), engine.ema(&p.close, EmaParams { period })?);
            }
        }

        if includes(&[Set::Default, Set::MediumTerm]) {
            out.insert("SMA200".into(), engine.sma(&p.close, SmaParams { period: 200 })?);
            out.insert("EMA200".into(), engine.ema(&p.close, EmaParams { period: 200 })?);
        }

        out.insert("RSI".into(), engine.rsi(&p.close, RsiParams::default())?);
        if includes(&[Set::Default, Set::HighFreq]) {
            out.insert("RSI7".into(), engine.rsi(&p.close, RsiParams { period: 7 })?);
        }

        insert_macd(&mut out, "MACD", engine.macd(&p.close, MacdParams::default())?);
        if includes(&[Set::Default, Set::HighFreq]) {
            insert_macd(
                &mut out,
                "MACD_HF",
                engine.macd(&p.close, MacdParams::high_frequency())?,
            );
        }

        insert_bands(
            &mut out,
            "BB",
            engine.bollinger_bands(&p.close, BollingerBandsParams::default())?,
        );
        if includes(&[Set::Default, Set::TightChannel, Set::Volatility]) {
            insert_bands(
                &mut out,
                "BB_Tight",
                engine.bollinger_bands(&p.close, BollingerBandsParams::tight())?,
            );
        }
        if includes(&[Set::Default, Set::WideChannel]) {
            insert_bands(
                &mut out,
                "BB_Wide",
                engine.bollinger_bands(&p.close, BollingerBandsParams::wide())?,
            );
        }

        out.insert(
            "SAR".into(),
            engine.parabolic_sar(&p.high, &p.low, ParabolicSarParams::default())?,
        );

        let stoch = engine.stochastic(&p.high, &p.low, &p.close, StochasticParams::default())?;
        out.insert("STOCH_K".into(), stoch.iter().map(|s| s.k).collect());
        out.insert("STOCH_D".into(), stoch.iter().map(|s| s.d).collect());

        let adx = engine.adx(&p.high, &p.low, &p.close, AdxParams::default())?;
        out.insert("ADX".into(), adx.iter().map(|a| a.adx).collect());
        out.insert("PDI".into(), adx.iter().map(|a| a.plus_di).collect());
        out.insert("NDI".into(), adx.iter().map(|a| a.minus_di).collect());

        let obv = engine.obv(&p.close, &p.volume)?;
        let obv_flat: Vec<f64> = obv.iter().map(|v| v.unwrap_or(0.0)).collect();
        out.insert(
            "OBV_MA".into(),
            engine.sma(&obv_flat, SmaParams { period: OBV_MA_PERIOD })?,
        );
        out.insert("OBV".into(), obv);

        if includes(&[Set::Default, Set::Ichimoku]) {
            let cloud = engine.ichimoku(&p.high, &p.low, &p.close, IchimokuParams::default())?;
            out.insert("Ichimoku_Tenkan".into(), cloud.iter().map(|c| c.tenkan).collect());
            out.insert("Ichimoku_Kijun".into(), cloud.iter().map(|c| c.kijun).collect());
            out.insert("Ichimoku_SpanA".into(), cloud.iter().map(|c| c.span_a).collect());
            out.insert("Ichimoku_SpanB".into(), cloud.iter().map(|c| c.span_b).collect());
            out.insert("Ichimoku_Chikou".into(), cloud.iter().map(|c| c.chikou).collect());
        }

        Ok(out)
    }
}

fn insert_macd(
    out: &mut BTreeMap<String, Vec<Option<f64>>>,
    prefix: &str,
    values: Vec<MacdResult>,
) {
    out.insert(prefix.to_string(), values.iter().map(|m| m.macd).collect());
    out.insert(format!("{}_Signal", prefix), values.iter().map(|m| m.signal).collect());
    out.insert(format!("{}_Histogram", prefix), values.iter().map(|m| m.histogram).collect());
}

fn insert_bands(
    out: &mut BTreeMap<String, Vec<Option<f64>>>,
    prefix: &str,
    values: Vec<BollingerBandsResult>,
) {
    out.insert(format!("{}_High", prefix), values.iter().map(|b| b.upper).collect());
    out.insert(format!("{}_Mid", prefix), values.iter().map(|b| b.middle).collect());
    out.insert(format!("{}_Low", prefix), values.iter().map(|b| b.lower).collect());
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn has_ohlc(row: &PriceRow) -> bool {
    [row.open, row.high, row.low, row.close]
        .into_iter()
        .all(|v| finite(v).is_some())
}

/// 필수 가격 필드가 최소 한 행에는 있어야 합니다.
fn ensure_columns(rows: &[PriceRow]) -> IndicatorResult<()> {
    let checks: [(&str, fn(&PriceRow) -> Option<f64>); 4] = [
        ("Open", |r| r.open),
        ("High", |r| r.high),
        ("Low", |r| r.low),
        ("Close", |r| r.close),
    ];
    for (name, get) in checks {
        if !rows.iter().any(|row| finite(get(row)).is_some()) {
            return Err(IndicatorError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

fn price_columns(rows: &[PriceRow]) -> PriceColumns {
    let column = |get: fn(&PriceRow) -> Option<f64>| -> Vec<f64> {
        rows.iter().map(|r| finite(get(r)).unwrap_or(0.0)).collect()
    };
    PriceColumns {
        high: column(|r| r.high),
        low: column(|r| r.low),
        close: column(|r| r.close),
        volume: column(|r| r.volume),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(n: usize) -> Vec<PriceRow> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.2).sin() * 5.0 + i as f64 * 0.1;
                PriceRow::on(start + chrono::Duration::days(i as i64))
                    .with_ohlc(c - 0.5, c + 1.0, c - 1.0, c)
                    .with_volume(1000.0 + i as f64)
            })
            .collect()
    }

    fn names(rows: &[PriceRow]) -> Vec<String> {
        rows[0].indicators.keys().cloned().collect()
    }

    #[test]
    fn test_default_set_columns() {
        let calc = IndicatorCalculator::new();
        let out = calc.calculate(rows(250), ParameterSet::Default).unwrap();
        let names = names(&out);

        for expected in [
            "SMA5", "SMA9", "SMA21", "SMA200", "EMA12", "EMA200", "RSI", "RSI7", "MACD",
            "MACD_Signal", "MACD_Histogram", "MACD_HF", "MACD_HF_Histogram", "BB_High",
            "BB_Tight_Low", "BB_Wide_Mid", "SAR", "STOCH_K", "STOCH_D", "ADX", "PDI", "NDI",
            "OBV", "OBV_MA", "Ichimoku_Tenkan", "Ichimoku_Chikou",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_short_term_set_excludes_others() {
        let calc = IndicatorCalculator::new();
        let out = calc.calculate(rows(60), ParameterSet::ShortTerm).unwrap();
        let names = names(&out);

        assert!(names.iter().any(|n| n == "SMA9"));
        assert!(!names.iter().any(|n| n == "SMA200"));
        assert!(!names.iter().any(|n| n == "RSI7"));
        assert!(!names.iter().any(|n| n.starts_with("BB_Tight")));
        assert!(!names.iter().any(|n| n.starts_with("Ichimoku")));
    }

    #[test]
    fn test_volatility_set_has_tight_channel() {
        let calc = IndicatorCalculator::new();
        let out = calc.calculate(rows(40), ParameterSet::Volatility).unwrap();
        let names = names(&out);
        assert!(names.iter().any(|n| n == "BB_Tight_High"));
        assert!(!names.iter().any(|n| n == "BB_Wide_High"));
    }

    #[test]
    fn test_rows_without_ohlc_are_skipped() {
        let calc = IndicatorCalculator::new();
        let mut input = rows(30);
        input[5].high = None;
        input[6].low = Some(f64::NAN);

        let out = calc.calculate(input, ParameterSet::Momentum).unwrap();
        assert_eq!(out.len(), 28);
    }

    #[test]
    fn test_missing_close_column_is_error() {
        let calc = IndicatorCalculator::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let input = vec![PriceRow::on(start).with_indicator("X", Some(1.0))];

        let err = calc.calculate(input, ParameterSet::Default).unwrap_err();
        assert!(matches!(err, IndicatorError::MissingColumn(ref c) if c == "Open"));
    }

    #[test]
    fn test_missing_volume_defaults_to_zero() {
        let calc = IndicatorCalculator::new();
        let mut input = rows(30);
        for row in &mut input {
            row.volume = None;
        }
        let out = calc.calculate(input, ParameterSet::Default).unwrap();
        assert!(out.iter().all(|r| r.indicator("OBV") == Some(0.0)));
    }

    #[test]
    fn test_empty_input() {
        let calc = IndicatorCalculator::new();
        assert!(calc.calculate(Vec::new(), ParameterSet::Default).unwrap().is_empty());
    }
}
