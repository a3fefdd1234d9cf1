//! 시계열 가격 행.
//!
//! 하나의 행은 날짜, 선택적 OHLCV 값, 그리고 임의 개수의 지표 컬럼으로 구성됩니다.
//! JSON 표현은 `Date` 키와 숫자 또는 null 값을 갖는 평평한 객체입니다.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ChartError, ChartResult};

/// 지표가 아닌 고정 컬럼.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedField {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl FixedField {
    /// 직렬화 순서.
    pub const ALL: [FixedField; 6] = [
        FixedField::Date,
        FixedField::Open,
        FixedField::High,
        FixedField::Low,
        FixedField::Close,
        FixedField::Volume,
    ];

    /// 컬럼 이름을 고정 필드로 해석합니다 (대소문자 무시).
    pub fn from_column(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" | "datetime" => Some(Self::Date),
            "open" => Some(Self::Open),
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            "close" => Some(Self::Close),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }

    /// 표준 컬럼 이름.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }
}

/// 하나의 시점 관측값.
///
/// 값은 `Some(NaN)`처럼 유한하지 않은 값을 담을 수 있습니다.
/// 렌더링과 직렬화에서는 이런 값을 결측으로 취급합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    /// 정렬 키
    pub date: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    /// 지표 이름 → 값
    pub indicators: BTreeMap<String, Option<f64>>,
}

impl PriceRow {
    /// 날짜만 있는 빈 행을 생성합니다.
    pub fn new(date: NaiveDateTime) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
            indicators: BTreeMap::new(),
        }
    }

    /// 일 단위 행을 생성합니다.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN))
    }

    /// OHLC 값을 설정합니다.
    pub fn with_ohlc(mut self, open: f64, high: f64, low: f64, close: f64) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self.close = Some(close);
        self
    }

    /// 종가만 설정합니다.
    pub fn with_close(mut self, close: f64) -> Self {
        self.close = Some(close);
        self
    }

    /// 거래량을 설정합니다.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// 지표 값을 추가합니다.
    pub fn with_indicator(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.indicators.insert(name.into(), value);
        self
    }

    /// 고정 필드 값을 설정합니다. `Date`는 무시됩니다.
    pub fn set_fixed(&mut self, field: FixedField, value: Option<f64>) {
        match field {
            FixedField::Date => {}
            FixedField::Open => self.open = value,
            FixedField::High => self.high = value,
            FixedField::Low => self.low = value,
            FixedField::Close => self.close = value,
            FixedField::Volume => self.volume = value,
        }
    }

    /// 고정 필드 값을 조회합니다.
    pub fn fixed(&self, field: FixedField) -> Option<f64> {
        match field {
            FixedField::Date => None,
            FixedField::Open => self.open,
            FixedField::High => self.high,
            FixedField::Low => self.low,
            FixedField::Close => self.close,
            FixedField::Volume => self.volume,
        }
    }

    /// 유한한 지표 값만 반환합니다.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.indicators
            .get(name)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// 날짜를 표시용 문자열로 변환합니다.
    pub fn date_label(&self) -> String {
        format_row_date(&self.date)
    }

    /// JSON 객체에서 행을 생성합니다.
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> ChartResult<Self> {
        let date_value = object
            .iter()
            .find(|(key, _)| FixedField::from_column(key) == Some(FixedField::Date))
            .map(|(_, value)| value)
            .ok_or_else(|| ChartError::InvalidRow("Date 필드가 없습니다".to_string()))?;

        let mut row = PriceRow::new(parse_row_date(date_value)?);
        for (key, value) in object {
            match FixedField::from_column(key) {
                Some(FixedField::Date) => {}
                Some(field) => row.set_fixed(field, parse_numeric(value)),
                None => {
                    row.indicators.insert(key.clone(), parse_numeric(value));
                }
            }
        }
        Ok(row)
    }
}

/// 날짜 값을 파싱합니다.
///
/// 문자열(ISO-8601 날짜/일시, 타임존 포함 일시) 또는 epoch 숫자를 허용합니다.
/// 숫자가 10^11보다 크면 밀리초, 아니면 초 단위로 해석합니다.
pub fn parse_row_date(value: &Value) -> ChartResult<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let raw = n
                .as_f64()
                .ok_or_else(|| ChartError::InvalidDate(n.to_string()))?;
            let parsed = if raw.abs() > 1e11 {
                DateTime::from_timestamp_millis(raw as i64)
            } else {
                DateTime::from_timestamp(raw as i64, 0)
            };
            parsed
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| ChartError::InvalidDate(n.to_string()))
        }
        other => Err(ChartError::InvalidDate(other.to_string())),
    }
}

/// 날짜 문자열을 파싱합니다.
pub fn parse_date_str(raw: &str) -> ChartResult<NaiveDateTime> {
    let s = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    // 타임존 포함 값은 거래소 현지 날짜를 유지합니다.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.naive_local());
    }

    Err(ChartError::InvalidDate(raw.to_string()))
}

/// 행 날짜를 문자열로 포맷합니다. 자정이면 날짜만 출력합니다.
pub fn format_row_date(date: &NaiveDateTime) -> String {
    if date.time() == NaiveTime::MIN {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// JSON 값을 숫자로 해석합니다. 숫자 문자열("NaN", "inf" 포함)도 허용합니다.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl<'de> Deserialize<'de> for PriceRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        PriceRow::from_json_object(&object).map_err(D::Error::custom)
    }
}

impl Serialize for PriceRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(6 + self.indicators.len()))?;
        map.serialize_entry(FixedField::Date.column_name(), &self.date_label())?;
        for field in &FixedField::ALL[1..] {
            map.serialize_entry(field.column_name(), &finite(self.fixed(*field)))?;
        }
        for (name, value) in &self.indicators {
            map.serialize_entry(name, &finite(*value))?;
        }
        map.end()
    }
}
