//! 리포트용 지표 판독값.
//!
//! 마지막 두 행에서 가격 변화, 주요 지표 값, 전통적 추세 신호를 뽑아냅니다.
//! 자산 유형별 추천 지표와 시장 요약 항목도 여기서 만듭니다.

use chart_core::{AssetCategory, PriceRow};
use serde::{Deserialize, Serialize};

/// 판독 항목 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub name: String,
    pub value: String,
}

impl Reading {
    fn new(name: impl Into<String>, value: String) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// 제목이 붙은 판독 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSection {
    pub title: String,
    pub data_points: Vec<Reading>,
}

impl ReadingSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            data_points: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, value: String) {
        self.data_points.push(Reading::new(name, value));
    }
}

/// 리포트에 표시할 최신 판독값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReadings {
    pub price_data: ReadingSection,
    pub moving_averages: ReadingSection,
    pub oscillators: ReadingSection,
    pub volatility: ReadingSection,
    pub trend: ReadingSection,
}

impl IndicatorReadings {
    /// 표시 순서대로의 섹션.
    pub fn sections(&self) -> [&ReadingSection; 5] {
        [
            &self.price_data,
            &self.moving_averages,
            &self.oscillators,
            &self.volatility,
            &self.trend,
        ]
    }
}

/// 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendSignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

/// 전통적 추세 분석 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSignals {
    /// 종가 > SMA20 > SMA50 이면 상승
    pub short_term: TrendSignal,
    /// SMA50 대 SMA150
    pub long_term: TrendSignal,
}

/// 최신 판독값을 계산합니다. 마지막 행에 종가가 없으면 `None`.
///
/// 직전 행이 없으면 직전 종가와 변화량 항목은 생략됩니다.
pub fn latest_readings(rows: &[PriceRow]) -> Option<IndicatorReadings> {
    let latest = rows.last()?;
    let close = latest.close.filter(|c| c.is_finite())?;
    let prev_close = rows
        .len()
        .checked_sub(2)
        .and_then(|i| rows[i].close)
        .filter(|c| c.is_finite());

    let mut price_data = ReadingSection::new("Price Data");
    price_data.push("Last Close", format!("{:.4}", close));
    if let Some(prev) = prev_close {
        price_data.push("Previous Close", format!("{:.4}", prev));
        let change = close - prev;
        let percent = if prev != 0.0 {
            (close / prev - 1.0) * 100.0
        } else {
            0.0
        };
        price_data.push("Change", format!("{:.4} ({:.2}%)", change, percent));
    }

    let mut moving_averages = ReadingSection::new("Moving Averages");
    for name in ["SMA20", "SMA50", "SMA200", "EMA20", "EMA50", "EMA200"] {
        if let Some(value) = latest.indicator(name) {
            moving_averages.push(name, format!("{:.4}", value));
        }
    }

    let mut oscillators = ReadingSection::new("Oscillators");
    if let Some(rsi) = latest.indicator("RSI") {
        oscillators.push("RSI(14)", format!("{:.2}", rsi));
    }
    if let Some([macd, signal, hist]) = all_of(latest, ["MACD", "MACD_Signal", "MACD_Histogram"]) {
        oscillators.push("MACD", format!("{:.4}", macd));
        oscillators.push("MACD Signal", format!("{:.4}", signal));
        oscillators.push("MACD Histogram", format!("{:.4}", hist));
    }
    if let Some([k, d]) = all_of(latest, ["STOCH_K", "STOCH_D"]) {
        oscillators.push("Stochastic %K", format!("{:.2}", k));
        oscillators.push("Stochastic %D", format!("{:.2}", d));
    }

    let mut volatility = ReadingSection::new("Volatility");
    if let Some([high, mid, low]) = all_of(latest, ["BB_High", "BB_Mid", "BB_Low"]) {
        volatility.push("Bollinger High", format!("{:.4}", high));
        volatility.push("Bollinger Mid", format!("{:.4}", mid));
        volatility.push("Bollinger Low", format!("{:.4}", low));
    }

    let mut trend = ReadingSection::new("Trend");
    if let Some(adx) = latest.indicator("ADX") {
        trend.push("ADX(14)", format!("{:.2}", adx));
    }
    if let Some(sar) = latest.indicator("SAR") {
        trend.push("Parabolic SAR", format!("{:.4}", sar));
    }

    Some(IndicatorReadings {
        price_data,
        moving_averages,
        oscillators,
        volatility,
        trend,
    })
}

fn all_of<const N: usize>(row: &PriceRow, names: [&str; N]) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    for (slot, name) in values.iter_mut().zip(names) {
        *slot = row.indicator(name)?;
    }
    Some(values)
}

/// 마지막 행 기준 단기/장기 추세 신호.
///
/// 비교에 필요한 값이 없으면 중립입니다.
pub fn trend_signals(rows: &[PriceRow]) -> Option<TrendSignals> {
    let latest = rows.last()?;
    let close = latest.close.filter(|c| c.is_finite());
    let sma20 = latest.indicator("SMA20");
    let sma50 = latest.indicator("SMA50");
    let sma150 = latest.indicator("SMA150");

    let short_term = match (close, sma20, sma50) {
        (Some(c), Some(s20), Some(s50)) if c > s20 && s20 > s50 => TrendSignal::Bullish,
        (Some(c), Some(s20), Some(s50)) if c < s20 && s20 < s50 => TrendSignal::Bearish,
        _ => TrendSignal::Neutral,
    };
    let long_term = match (sma50, sma150) {
        (Some(a), Some(b)) if a > b => TrendSignal::Bullish,
        (Some(a), Some(b)) if a < b => TrendSignal::Bearish,
        _ => TrendSignal::Neutral,
    };

    Some(TrendSignals {
        short_term,
        long_term,
    })
}

/// 자산 유형별 추천 지표. 알 수 없는 유형은 범용 목록을 받습니다.
pub fn optimal_indicators(category: Option<AssetCategory>) -> &'static [&'static str] {
    match category {
        Some(AssetCategory::Forex) => &[
            "SMA(50,200)",
            "Bollinger Bands(20)",
            "MACD(12,26)",
            "RSI(14)",
        ],
        Some(AssetCategory::Commodities) => {
            &["SMA(200)", "Bollinger Bands(50)", "ATR(14)", "Ichimoku"]
        }
        Some(AssetCategory::Indices) => &[
            "EMA(9,21)",
            "Bollinger Bands(20)",
            "MACD(12,26)",
            "Volume Profile",
        ],
        None => &["SMA(50)", "Bollinger Bands(20)", "RSI(14)"],
    }
}

/// 시장 요약 대상 자산.
pub const KEY_ASSETS: [&str; 5] = ["EURUSD", "GOLD", "OIL", "S&P500", "NASDAQ"];

/// 시장 요약 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub asset: String,
    pub last_price: f64,
    pub change: f64,
    pub change_percent: f64,
    /// "up" 또는 "down"
    pub trend: String,
}

/// 마지막 두 종가로 요약 항목을 만듭니다. 종가가 둘 미만이면 `None`.
pub fn market_snapshot(asset: &str, rows: &[PriceRow]) -> Option<MarketSnapshot> {
    let mut closes = rows
        .iter()
        .rev()
        .filter_map(|row| row.close.filter(|c| c.is_finite()));
    let last = closes.next()?;
    let previous = closes.next()?;

    let change = last - previous;
    let change_percent = if previous > 0.0 {
        change / previous * 100.0
    } else {
        0.0
    };

    Some(MarketSnapshot {
        asset: asset.to_string(),
        last_price: last,
        change,
        change_percent,
        trend: if change >= 0.0 { "up" } else { "down" }.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_readings_price_change() {
        let rows = vec![
            PriceRow::on(day(1)).with_close(100.0),
            PriceRow::on(day(2))
                .with_close(102.0)
                .with_indicator("RSI", Some(61.234))
                .with_indicator("SMA20", Some(99.5)),
        ];

        let readings = latest_readings(&rows).unwrap();
        let price = &readings.price_data.data_points;
        assert_eq!(price[0].value, "102.0000");
        assert_eq!(price[1].value, "100.0000");
        assert_eq!(price[2].value, "2.0000 (2.00%)");
        assert_eq!(readings.oscillators.data_points[0].value, "61.23");
        assert_eq!(readings.moving_averages.data_points.len(), 1);
    }

    #[test]
    fn test_readings_skip_incomplete_groups() {
        let rows = vec![PriceRow::on(day(1))
            .with_close(1.0)
            .with_indicator("MACD", Some(0.1))
            .with_indicator("MACD_Signal", None)
            .with_indicator("MACD_Histogram", Some(0.05))];

        let readings = latest_readings(&rows).unwrap();
        assert!(readings.oscillators.data_points.is_empty());
        assert_eq!(readings.price_data.data_points.len(), 1);
    }

    #[test]
    fn test_trend_signals() {
        let bullish = vec![PriceRow::on(day(1))
            .with_close(110.0)
            .with_indicator("SMA20", Some(105.0))
            .with_indicator("SMA50", Some(100.0))
            .with_indicator("SMA150", Some(90.0))];
        let signals = trend_signals(&bullish).unwrap();
        assert_eq!(signals.short_term, TrendSignal::Bullish);
        assert_eq!(signals.long_term, TrendSignal::Bullish);

        let missing = vec![PriceRow::on(day(1)).with_close(1.0)];
        let signals = trend_signals(&missing).unwrap();
        assert_eq!(signals.short_term, TrendSignal::Neutral);
        assert_eq!(signals.long_term, TrendSignal::Neutral);

        assert!(trend_signals(&[]).is_none());
    }

    #[test]
    fn test_optimal_indicators() {
        assert_eq!(optimal_indicators(Some(AssetCategory::Forex))[0], "SMA(50,200)");
        assert!(optimal_indicators(Some(AssetCategory::Commodities)).contains(&"Ichimoku"));
        assert_eq!(optimal_indicators(None).len(), 3);
    }

    #[test]
    fn test_market_snapshot() {
        let rows = vec![
            PriceRow::on(day(1)).with_close(50.0),
            PriceRow::on(day(2)).with_close(49.0),
        ];
        let snapshot = market_snapshot("OIL", &rows).unwrap();
        assert_eq!(snapshot.trend, "down");
        assert!((snapshot.change_percent + 2.0).abs() < 1e-9);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["lastPrice"], 49.0);
        assert_eq!(json["changePercent"], snapshot.change_percent);

        assert!(market_snapshot("OIL", &rows[..1]).is_none());
    }
}
