//! CSV/JSON 행 입출력.
//!
//! CSV는 첫 줄이 헤더입니다. yfinance가 저장한 파일은 헤더 다음에
//! `Ticker,...` 줄과 빈 `Date,,,` 줄이 붙어 있는데, 이런 머리 줄은 건너뜁니다.
//! 날짜 컬럼이 없으면 첫 컬럼을 날짜로 봅니다 (yfinance 헤더의 첫 칸은 `Price`).

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::Path;

use chart_core::{format_row_date, parse_date_str, FixedField, PriceRow};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use crate::error::{DataError, Result};

/// 머리 줄인지 확인합니다.
fn is_preamble(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|first| {
            let first = first.trim();
            first.eq_ignore_ascii_case("ticker") || first.eq_ignore_ascii_case("date")
        })
        .unwrap_or(false)
}

fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse::<f64>().ok()
    }
}

/// CSV를 행 목록으로 읽습니다. 날짜를 해석할 수 없는 줄은 건너뜁니다.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<PriceRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Ok(Vec::new()),
    };

    let date_index = header
        .iter()
        .position(|name| FixedField::from_column(name) == Some(FixedField::Date))
        .unwrap_or(0);
    let columns: Vec<(usize, Option<FixedField>, String)> = header
        .iter()
        .enumerate()
        .filter(|(index, name)| *index != date_index && !name.is_empty())
        .map(|(index, name)| (index, FixedField::from_column(name), name.to_string()))
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in records.enumerate() {
        let record = record?;
        let Some(raw_date) = record.get(date_index) else {
            skipped += 1;
            continue;
        };
        let date = match parse_date_str(raw_date) {
            Ok(date) => date,
            Err(_) if is_preamble(&record) => {
                debug!(line = line + 2, "머리 줄 건너뜀");
                continue;
            }
            Err(e) => {
                warn!(line = line + 2, error = %e, "날짜를 해석할 수 없는 줄 건너뜀");
                skipped += 1;
                continue;
            }
        };

        let mut row = PriceRow::new(date);
        for (index, field, name) in &columns {
            let value = record.get(*index).and_then(parse_cell);
            match field {
                Some(field) => row.set_fixed(*field, value),
                None => {
                    row.indicators.insert(name.clone(), value);
                }
            }
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), skipped, "CSV 로드 완료");
    Ok(rows)
}

/// CSV 파일을 읽습니다.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<PriceRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_csv_rows(std::io::BufReader::new(file))
}

/// JSON 배열을 행 목록으로 읽습니다.
pub fn parse_json_rows(json: &str) -> Result<Vec<PriceRow>> {
    Ok(serde_json::from_str(json)?)
}

/// JSON 파일을 읽습니다.
pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<PriceRow>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_json_rows(&content)
}

/// 확장자에 따라 CSV 또는 JSON으로 읽습니다.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<PriceRow>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_csv(path),
        _ => Err(DataError::InvalidData(format!(
            "지원하지 않는 파일 형식: {}",
            path.display()
        ))),
    }
}

/// 행 목록을 CSV로 씁니다.
///
/// 컬럼은 `Date, Open, High, Low, Close, Volume` 다음에 지표 이름 사전순입니다.
/// 유한하지 않은 값은 빈 칸이 됩니다.
pub fn write_csv_rows<W: Write>(rows: &[PriceRow], writer: W) -> Result<()> {
    let names: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.indicators.keys().map(String::as_str))
        .collect();

    let mut wtr = WriterBuilder::new().from_writer(writer);
    let header: Vec<&str> = FixedField::ALL
        .iter()
        .map(|field| -> &str { field.column_name() })
        .chain(names.iter().copied())
        .collect();
    wtr.write_record(&header)?;

    let cell = |value: Option<f64>| match value.filter(|v| v.is_finite()) {
        Some(v) => v.to_string(),
        None => String::new(),
    };
    for row in rows {
        let mut record = vec![format_row_date(&row.date)];
        record.extend(FixedField::ALL[1..].iter().map(|field| cell(row.fixed(*field))));
        record.extend(names.iter().map(|name| cell(row.indicators.get(*name).copied().flatten())));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV 파일로 저장합니다.
pub fn save_csv(path: impl AsRef<Path>, rows: &[PriceRow]) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv_rows(rows, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const YFINANCE_CSV: &str = "\
Price,Close,High,Low,Open,Volume
Ticker,GC=F,GC=F,GC=F,GC=F,GC=F
Date,,,,,
2024-01-02,2064.4,2072.1,2050.2,2060.0,1200
2024-01-03,2034.2,2066.0,2030.5,2064.0,
";

    #[test]
    fn test_yfinance_preamble_skipped() {
        let rows = read_csv_rows(YFINANCE_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date_label(), "2024-01-02");
        assert_eq!(rows[0].close, Some(2064.4));
        assert_eq!(rows[0].volume, Some(1200.0));
        assert_eq!(rows[1].volume, None);
        assert!(rows[0].indicators.is_empty());
    }

    #[test]
    fn test_indicator_columns_and_blank_cells() {
        let csv = "Date,Open,High,Low,Close,Volume,RSI,SMA20\n2024-02-01,1,2,0.5,1.5,10,,1.2\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].indicator("SMA20"), Some(1.2));
        assert_eq!(rows[0].indicators.get("RSI"), Some(&None));
    }

    #[test]
    fn test_bad_date_lines_skipped() {
        let csv = "Date,Close\nnot-a-date,1\n2024-02-01,2\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_csv_rows("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_keeps_values() {
        let rows = read_csv_rows(
            "Date,Open,High,Low,Close,Volume,RSI\n2024-02-01,1,2,0.5,1.5,10,NaN\n".as_bytes(),
        )
        .unwrap();

        let mut buffer = Vec::new();
        write_csv_rows(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Date,Open,High,Low,Close,Volume,RSI\n2024-02-01,1,2,0.5,1.5,10,\n"
        );
    }

    #[test]
    fn test_json_rows() {
        let rows = parse_json_rows(r#"[{"Date":"2024-03-01","Close":1.0,"ADX":"NaN"}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].indicator("ADX"), None);
        assert!(parse_json_rows("{").is_err());
    }
}
