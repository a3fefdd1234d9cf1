//! 명령 공통 입력/출력 처리.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chart_core::{DataConfig, Period, PriceRow};
use chart_data::{load_rows, DataStore};
use tracing::info;

/// 행을 읽을 곳.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// CSV 또는 JSON 파일
    File(PathBuf),
    /// 데이터 디렉터리의 심볼
    Symbol(String),
}

impl InputSource {
    /// `--input`과 `--symbol` 중 하나를 고릅니다.
    pub fn from_args(input: Option<PathBuf>, symbol: Option<String>) -> Result<Self> {
        match (input, symbol) {
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(symbol)) => Ok(Self::Symbol(symbol)),
            (Some(_), Some(_)) => bail!("--input and --symbol cannot be used together"),
            (None, None) => bail!("either --input or --symbol is required"),
        }
    }

    /// 제목과 로그에 쓰는 이름.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("chart")
                .to_string(),
            Self::Symbol(symbol) => symbol.clone(),
        }
    }

    /// 행을 읽고 기간으로 자릅니다.
    pub async fn load(&self, data: &DataConfig, period: Period) -> Result<Vec<PriceRow>> {
        let rows = match self {
            Self::File(path) => {
                let rows = load_rows(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                period.filter(rows)
            }
            Self::Symbol(symbol) => {
                let store = DataStore::from_config(data)?;
                store
                    .load(symbol, period)
                    .await
                    .with_context(|| format!("no data for {}", symbol))?
            }
        };
        info!(source = %self.label(), rows = rows.len(), period = %period, "입력 행 로드");
        Ok(rows)
    }
}

/// 결과를 파일 또는 stdout으로 씁니다.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = content.len(), "출력 저장");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
