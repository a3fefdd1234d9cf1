//! 데모용 샘플 데이터 파일 생성.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chart_data::{save_csv, SampleSeries};
use chrono::NaiveDate;
use tracing::info;

/// `{SYMBOL}_{YYYYMMDD}.csv`로 샘플 시계열을 저장합니다. 파일 날짜는 마지막 행의 날짜입니다.
pub fn write_sample(
    data_dir: &Path,
    symbol: &str,
    days: usize,
    start: Option<NaiveDate>,
    initial_price: Option<f64>,
) -> Result<PathBuf> {
    let mut series = SampleSeries::for_symbol(symbol, days);
    if let Some(start) = start {
        series = series.with_start(start);
    }
    if let Some(price) = initial_price {
        series = series.with_initial_price(price);
    }

    let rows = series.generate();
    let last = rows
        .last()
        .map(|row| row.date.date())
        .unwrap_or(series.start);
    let path = data_dir.join(format!("{}_{}.csv", symbol, last.format("%Y%m%d")));

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    save_csv(&path, &rows)?;
    info!(symbol, rows = rows.len(), path = %path.display(), "샘플 데이터 저장");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_data::{load_csv, parse_file_name};

    #[test]
    fn test_write_sample_file_name() {
        let dir = std::env::temp_dir().join(format!("chart-cli-sample-{}", std::process::id()));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let path = write_sample(&dir, "GOLD", 5, Some(start), Some(2000.0)).unwrap();
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(file_name, "GOLD_20240105.csv");
        assert_eq!(
            parse_file_name("GOLD", file_name),
            Some((NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), false))
        );

        let rows = load_csv(&path).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].open, Some(2000.0));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
