//! 원격 시장 데이터 제공자.

use async_trait::async_trait;
use chart_core::{provider_ticker, Period, PriceRow};
use chrono::DateTime;
use tracing::debug;

use crate::error::{DataError, Result};

/// 심볼의 일봉 시계열을 가져오는 제공자.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 제공자 이름 (로그/상태 표시용).
    fn name(&self) -> &str;

    /// 기간 동안의 일봉을 가져옵니다. 날짜 오름차순입니다.
    async fn fetch(&self, symbol: &str, period: Period) -> Result<Vec<PriceRow>>;
}

/// Yahoo Finance 제공자.
pub struct YahooProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(&self, symbol: &str, period: Period) -> Result<Vec<PriceRow>> {
        let ticker = provider_ticker(symbol);
        debug!(symbol, ticker = %ticker, range = period.as_str(), "Yahoo Finance API 호출");

        let response = self
            .connector
            .get_quote_range(&ticker, "1d", period.as_str())
            .await
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance API 오류 ({}): {}", ticker, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::ParseError(format!("Quote 파싱 오류: {}", e)))?;

        let mut rows: Vec<PriceRow> = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(
                    PriceRow::on(date)
                        .with_ohlc(q.open, q.high, q.low, q.close)
                        .with_volume(q.volume as f64),
                )
            })
            .collect();
        rows.sort_by_key(|row| row.date);

        debug!(symbol, rows = rows.len(), "Yahoo Finance 응답 변환 완료");
        Ok(rows)
    }
}
