//! 데이터 디렉터리 저장소.
//!
//! 파일 이름 규칙:
//! - `{SYMBOL}_{YYYYMMDD}_fixed.csv`: 머리 줄을 정리한 파일
//! - `{SYMBOL}_{YYYYMMDD}.csv`: 원본 다운로드 파일
//!
//! 가장 최근 날짜의 파일을 쓰며, 같은 날짜면 `_fixed` 파일을 우선합니다.
//! 로컬 파일이 없고 원격 제공자가 설정되어 있으면 내려받아 원본 파일로 저장합니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chart_core::{DataConfig, Period, PriceRow};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::loader::{read_csv_rows, write_csv_rows};
use crate::provider::{MarketDataProvider, YahooProvider};

const FIXED_SUFFIX: &str = "_fixed";

/// 심볼의 데이터 파일.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub fixed: bool,
}

/// 파일 이름에서 (날짜, fixed 여부)를 읽습니다. 다른 심볼의 파일이면 `None`.
pub fn parse_file_name(symbol: &str, file_name: &str) -> Option<(NaiveDate, bool)> {
    let stem = file_name.strip_suffix(".csv")?;
    let (stem, fixed) = match stem.strip_suffix(FIXED_SUFFIX) {
        Some(stripped) => (stripped, true),
        None => (stem, false),
    };
    let (name, date) = stem.rsplit_once('_')?;
    if name != symbol || date.len() != 8 {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    Some((date, fixed))
}

/// 데이터 디렉터리와 선택적 원격 제공자.
#[derive(Clone)]
pub struct DataStore {
    data_dir: PathBuf,
    provider: Option<Arc<dyn MarketDataProvider>>,
}

impl DataStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// 설정에서 저장소를 만듭니다. `remote_fallback`이면 Yahoo 제공자를 붙입니다.
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        let store = Self::new(config.data_dir.clone());
        if config.remote_fallback {
            Ok(store.with_provider(Arc::new(YahooProvider::new()?)))
        } else {
            Ok(store)
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// 데이터 디렉터리가 존재하는지.
    pub async fn is_ready(&self) -> bool {
        tokio::fs::metadata(&self.data_dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    /// 심볼에 쓸 파일을 찾습니다.
    pub async fn find_file(&self, symbol: &str) -> Result<Option<DataFile>> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut best: Option<DataFile> = None;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some((date, fixed)) = file_name.to_str().and_then(|name| parse_file_name(symbol, name))
            else {
                continue;
            };
            let newer = best
                .as_ref()
                .map_or(true, |current| (date, fixed) > (current.date, current.fixed));
            if newer {
                best = Some(DataFile {
                    path: entry.path(),
                    date,
                    fixed,
                });
            }
        }
        Ok(best)
    }

    /// 심볼의 행을 읽고 기간으로 자릅니다.
    pub async fn load(&self, symbol: &str, period: Period) -> Result<Vec<PriceRow>> {
        if let Some(file) = self.find_file(symbol).await? {
            debug!(symbol, path = %file.path.display(), fixed = file.fixed, "로컬 데이터 파일 사용");
            let content = tokio::fs::read(&file.path).await?;
            let rows = read_csv_rows(content.as_slice())?;
            if !rows.is_empty() {
                return Ok(period.filter(rows));
            }
            warn!(symbol, path = %file.path.display(), "데이터 파일에 행이 없음");
        }

        let Some(provider) = &self.provider else {
            return Err(DataError::NotFound(symbol.to_string()));
        };

        info!(symbol, provider = provider.name(), "원격 제공자에서 데이터 가져오는 중");
        let rows = provider.fetch(symbol, period).await?;
        if rows.is_empty() {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        if let Err(e) = self.save_download(symbol, &rows).await {
            warn!(symbol, error = %e, "다운로드 데이터 저장 실패");
        }
        Ok(period.filter(rows))
    }

    /// 내려받은 행을 `{SYMBOL}_{오늘}.csv`로 저장합니다.
    async fn save_download(&self, symbol: &str, rows: &[PriceRow]) -> Result<PathBuf> {
        let today = Local::now().date_naive().format("%Y%m%d");
        let path = self.data_dir.join(format!("{}_{}.csv", symbol, today));

        let mut buffer = Vec::new();
        write_csv_rows(rows, &mut buffer)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(&path, buffer).await?;

        debug!(symbol, path = %path.display(), "다운로드 데이터 저장");
        Ok(path)
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("data_dir", &self.data_dir)
            .field("provider", &self.provider_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_file_name("GOLD", "GOLD_20240315.csv"), Some((date, false)));
        assert_eq!(parse_file_name("GOLD", "GOLD_20240315_fixed.csv"), Some((date, true)));
        assert_eq!(parse_file_name("S&P500", "S&P500_20240315.csv"), Some((date, false)));
        assert_eq!(parse_file_name("GOLD", "SILVER_20240315.csv"), None);
        assert_eq!(parse_file_name("GOLD", "GOLD_2024.csv"), None);
        assert_eq!(parse_file_name("GOLD", "GOLD_20240315.json"), None);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let store = DataStore::new(std::env::temp_dir().join("chart-data-missing-dir-test"));
        assert!(!store.is_ready().await);
        assert!(store.find_file("GOLD").await.unwrap().is_none());
        assert!(matches!(
            store.load("GOLD", Period::Max).await,
            Err(DataError::NotFound(_))
        ));
    }
}
