//! 행 → 가격 시리즈와 지표 시리즈 분리.

use std::collections::BTreeSet;

use chart_core::{format_row_date, FixedField, PriceRow};

/// 가격 열. 유한하지 않은 값은 `None`입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
}

fn any_present(values: &[Option<f64>]) -> bool {
    values.iter().any(Option::is_some)
}

impl PriceSeries {
    /// Open/High/Low/Close가 모두 존재하는지.
    pub fn has_ohlc(&self) -> bool {
        [&self.open, &self.high, &self.low, &self.close]
            .into_iter()
            .all(|values| any_present(values))
    }

    pub fn has_close(&self) -> bool {
        any_present(&self.close)
    }

    /// 0보다 큰 거래량이 있는지.
    pub fn has_volume(&self) -> bool {
        self.volume.iter().flatten().any(|v| *v > 0.0)
    }
}

/// 지표 하나의 값 열.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// 추출 결과.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSeries {
    /// x축 레이블
    pub dates: Vec<String>,
    pub price: PriceSeries,
    /// 이름 사전순
    pub indicators: Vec<IndicatorSeries>,
}

impl ExtractedSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn indicator_names(&self) -> Vec<&str> {
        self.indicators.iter().map(|s| s.name.as_str()).collect()
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// 행을 가격 열과 지표 열로 나눕니다.
///
/// 고정 필드 이름(대소문자 무시)은 지표에서 제외하며,
/// 유한한 값이 하나도 없는 지표도 제외합니다.
pub fn extract(rows: &[PriceRow]) -> ExtractedSeries {
    if rows.is_empty() {
        return ExtractedSeries::default();
    }

    let dates = rows.iter().map(|row| format_row_date(&row.date)).collect();
    let column = |get: fn(&PriceRow) -> Option<f64>| -> Vec<Option<f64>> {
        rows.iter().map(|row| finite(get(row))).collect()
    };
    let price = PriceSeries {
        open: column(|r| r.open),
        high: column(|r| r.high),
        low: column(|r| r.low),
        close: column(|r| r.close),
        volume: column(|r| r.volume),
    };

    let names: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.indicators.keys().map(String::as_str))
        .filter(|name| FixedField::from_column(name).is_none())
        .collect();

    let indicators = names
        .into_iter()
        .filter_map(|name| {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row.indicator(name)).collect();
            any_present(&values).then(|| IndicatorSeries {
                name: name.to_string(),
                values,
            })
        })
        .collect();

    ExtractedSeries {
        dates,
        price,
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn test_empty_rows() {
        let extracted = extract(&[]);
        assert!(extracted.is_empty());
        assert!(extracted.indicators.is_empty());
    }

    #[test]
    fn test_indicator_names_sorted_and_filtered() {
        let rows = vec![
            PriceRow::on(day(1))
                .with_close(1.0)
                .with_indicator("RSI", Some(50.0))
                .with_indicator("BB_High", None)
                .with_indicator("volume", Some(3.0)),
            PriceRow::on(day(2))
                .with_close(1.1)
                .with_indicator("ADX", Some(20.0))
                .with_indicator("BB_High", Some(f64::NAN)),
        ];

        let extracted = extract(&rows);
        assert_eq!(extracted.indicator_names(), vec!["ADX", "RSI"]);
        assert_eq!(extracted.indicators[0].values, vec![None, Some(20.0)]);
    }

    #[test]
    fn test_price_presence() {
        let rows = vec![
            PriceRow::on(day(1)).with_close(1.0).with_volume(0.0),
            PriceRow::on(day(2)).with_close(f64::INFINITY),
        ];
        let extracted = extract(&rows);
        assert!(extracted.price.has_close());
        assert!(!extracted.price.has_ohlc());
        assert!(!extracted.price.has_volume());
        assert_eq!(extracted.price.close, vec![Some(1.0), None]);
        assert_eq!(extracted.dates, vec!["2024-02-01", "2024-02-02"]);
    }
}
