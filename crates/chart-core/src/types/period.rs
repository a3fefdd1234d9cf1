//! 조회 기간.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;
use crate::types::PriceRow;

/// 차트 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// 식별자 문자열 (원격 제공자의 range 값과 동일).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// 마지막 날짜를 기준으로 한 시작 시점. `Max`는 제한이 없습니다.
    pub fn start_from(&self, last: NaiveDateTime) -> Option<NaiveDateTime> {
        let months = match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
            Self::FiveYears => 60,
            Self::YearToDate => {
                return NaiveDate::from_ymd_opt(last.year(), 1, 1)
                    .map(|d| d.and_time(NaiveTime::MIN));
            }
            Self::Max => return None,
        };
        last.checked_sub_months(Months::new(months))
    }

    /// 기간 안의 행만 남깁니다. 행은 날짜 오름차순이라고 가정합니다.
    pub fn filter(&self, rows: Vec<PriceRow>) -> Vec<PriceRow> {
        let Some(last) = rows.last().map(|row| row.date) else {
            return rows;
        };
        match self.start_from(last) {
            Some(start) => rows.into_iter().filter(|row| row.date >= start).collect(),
            None => rows,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" | "1m" => Ok(Self::OneMonth),
            "3mo" | "3m" => Ok(Self::ThreeMonths),
            "6mo" | "6m" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "ytd" => Ok(Self::YearToDate),
            "max" | "all" => Ok(Self::Max),
            _ => Err(ChartError::InvalidPeriod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily_rows(start: NaiveDate, days: i64) -> Vec<PriceRow> {
        (0..days)
            .map(|i| PriceRow::on(start + chrono::Duration::days(i)).with_close(i as f64))
            .collect()
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("1mo".parse::<Period>().unwrap(), Period::OneMonth);
        assert_eq!("3m".parse::<Period>().unwrap(), Period::ThreeMonths);
        assert_eq!("ALL".parse::<Period>().unwrap(), Period::Max);
        assert!("10y".parse::<Period>().is_err());
    }

    #[test]
    fn test_filter_one_month() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = daily_rows(start, 91); // 2024-01-01 ..= 2024-03-31
        let filtered = Period::OneMonth.filter(rows);

        assert_eq!(filtered.first().unwrap().date_label(), "2024-02-29");
        assert_eq!(filtered.last().unwrap().date_label(), "2024-03-31");
    }

    #[test]
    fn test_filter_ytd_and_max() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let rows = daily_rows(start, 62);

        let ytd = Period::YearToDate.filter(rows.clone());
        assert_eq!(ytd.first().unwrap().date_label(), "2024-01-01");

        let all = Period::Max.filter(rows.clone());
        assert_eq!(all.len(), rows.len());
    }

    #[test]
    fn test_filter_empty() {
        assert!(Period::OneYear.filter(Vec::new()).is_empty());
    }
}
