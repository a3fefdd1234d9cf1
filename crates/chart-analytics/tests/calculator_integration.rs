//! 지표 계산 통합 테스트

use chart_analytics::{latest_readings, trend_signals, IndicatorCalculator, TrendSignal};
use chart_core::{ParameterSet, PriceRow};
use chrono::NaiveDate;
use proptest::prelude::*;

fn trending_rows(n: usize, slope: f64) -> Vec<PriceRow> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + slope * i as f64 + (i as f64 * 0.9).sin();
            PriceRow::on(start + chrono::Duration::days(i as i64))
                .with_ohlc(close - 0.3, close + 1.2, close - 1.2, close)
                .with_volume(5_000.0)
        })
        .collect()
}

#[test]
fn test_warmup_lengths_match_windows() {
    let calc = IndicatorCalculator::new();
    let rows = calc
        .calculate(trending_rows(260, 0.5), ParameterSet::Default)
        .unwrap();

    assert!(rows[18].indicator("SMA20").is_none());
    assert!(rows[19].indicator("SMA20").is_some());
    assert!(rows[198].indicator("SMA200").is_none());
    assert!(rows[199].indicator("SMA200").is_some());
    // EMA는 첫 값부터 정의
    assert!(rows[0].indicator("EMA200").is_some());
    assert!(rows[12].indicator("RSI").is_none());
    assert!(rows[13].indicator("RSI").is_some());
    assert!(rows[0].indicator("SAR").is_some());
    // 후행스팬은 마지막 26행이 비어 있음
    assert!(rows[233].indicator("Ichimoku_Chikou").is_some());
    assert!(rows[234].indicator("Ichimoku_Chikou").is_none());
}

#[test]
fn test_uptrend_readings_and_signals() {
    let calc = IndicatorCalculator::new();
    let rows = calc
        .calculate(trending_rows(200, 1.0), ParameterSet::Default)
        .unwrap();

    let signals = trend_signals(&rows).unwrap();
    assert_eq!(signals.short_term, TrendSignal::Bullish);
    assert_eq!(signals.long_term, TrendSignal::Bullish);

    let readings = latest_readings(&rows).unwrap();
    assert_eq!(readings.price_data.data_points.len(), 3);
    assert!(readings
        .oscillators
        .data_points
        .iter()
        .any(|r| r.name == "Stochastic %K"));
    assert_eq!(readings.volatility.data_points.len(), 3);
    assert_eq!(readings.trend.data_points.len(), 2);

    let last = rows.last().unwrap();
    assert!(last.indicator("PDI").unwrap() > last.indicator("NDI").unwrap());
}

#[test]
fn test_bands_keep_order() {
    let calc = IndicatorCalculator::new();
    let rows = calc
        .calculate(trending_rows(80, -0.2), ParameterSet::WideChannel)
        .unwrap();

    for row in &rows[29..] {
        let high = row.indicator("BB_Wide_High").unwrap();
        let mid = row.indicator("BB_Wide_Mid").unwrap();
        let low = row.indicator("BB_Wide_Low").unwrap();
        assert!(low <= mid && mid <= high);
    }
}

proptest! {
    #[test]
    fn prop_oscillators_stay_in_range(
        closes in proptest::collection::vec(1.0f64..1_000.0, 30..80),
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows: Vec<PriceRow> = closes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                PriceRow::on(start + chrono::Duration::days(i as i64))
                    .with_ohlc(*c, c * 1.01, c * 0.99, *c)
            })
            .collect();

        let out = IndicatorCalculator::new()
            .calculate(rows, ParameterSet::Momentum)
            .unwrap();

        for row in &out {
            if let Some(rsi) = row.indicator("RSI") {
                prop_assert!((0.0..=100.0).contains(&rsi));
            }
            if let Some(k) = row.indicator("STOCH_K") {
                prop_assert!((-1e-9..=100.0 + 1e-9).contains(&k));
            }
        }
    }
}
