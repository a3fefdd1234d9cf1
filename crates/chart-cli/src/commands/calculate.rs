//! 지표 열 계산 후 행 내보내기.

use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chart_analytics::IndicatorCalculator;
use chart_core::{ParameterSet, PriceRow};
use chart_data::write_csv_rows;
use tracing::info;

/// 행 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    Csv,
    Json,
}

impl FromStr for RowFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid format: {}. Use: csv, json", s)),
        }
    }
}

impl RowFormat {
    /// 명시한 형식이 없으면 출력 파일 확장자로 정합니다. 기본은 CSV.
    pub fn resolve(explicit: Option<&str>, output: Option<&Path>) -> Result<Self> {
        if let Some(format) = explicit {
            return format.parse();
        }
        let by_extension = output
            .and_then(|path| path.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"));
        Ok(if by_extension == Some(true) {
            Self::Json
        } else {
            Self::Csv
        })
    }
}

/// 지표를 계산합니다.
pub fn calculate_rows(rows: Vec<PriceRow>, parameter_set: ParameterSet) -> Result<Vec<PriceRow>> {
    let rows = IndicatorCalculator::new().calculate(rows, parameter_set)?;
    let columns = rows.first().map_or(0, |row| row.indicators.len());
    info!(rows = rows.len(), columns, parameter_set = %parameter_set, "지표 계산");
    Ok(rows)
}

/// 행을 문자열로 직렬화합니다.
pub fn format_rows(rows: &[PriceRow], format: RowFormat) -> Result<String> {
    match format {
        RowFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv_rows(rows, &mut buffer)?;
            Ok(String::from_utf8(buffer)?)
        }
        RowFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}
