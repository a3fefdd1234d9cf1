//! 데이터 저장소 통합 테스트

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chart_core::{Period, PriceRow};
use chart_data::{save_csv, DataError, DataStore, MarketDataProvider, SampleSeries};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("chart-data-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

struct FakeProvider {
    rows: Vec<PriceRow>,
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, _symbol: &str, _period: Period) -> chart_data::Result<Vec<PriceRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.clone())
    }
}

#[tokio::test]
async fn test_newest_file_wins_and_fixed_preferred() {
    let dir = scratch_dir("newest");
    let rows = SampleSeries::for_symbol("GOLD", 30).generate();

    save_csv(dir.join("GOLD_20240101.csv"), &rows[..10]).unwrap();
    save_csv(dir.join("GOLD_20240301.csv"), &rows[..20]).unwrap();
    save_csv(dir.join("GOLD_20240301_fixed.csv"), &rows).unwrap();
    save_csv(dir.join("SILVER_20240401.csv"), &rows[..5]).unwrap();

    let store = DataStore::new(&dir);
    let file = store.find_file("GOLD").await.unwrap().unwrap();
    assert!(file.fixed);
    assert_eq!(file.date.to_string(), "2024-03-01");

    let loaded = store.load("GOLD", Period::Max).await.unwrap();
    assert_eq!(loaded.len(), 30);
    assert_eq!(loaded[0].date, rows[0].date);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_period_filter_applied() {
    let dir = scratch_dir("period");
    let rows = SampleSeries::for_symbol("OIL", 400).generate();
    save_csv(dir.join("OIL_20240101.csv"), &rows).unwrap();

    let store = DataStore::new(&dir);
    let month = store.load("OIL", Period::OneMonth).await.unwrap();
    assert!(!month.is_empty());
    assert!(month.len() < 30);
    assert_eq!(month.last().unwrap().date, rows.last().unwrap().date);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_remote_fallback_saves_download() {
    let dir = scratch_dir("fallback");
    let provider = Arc::new(FakeProvider {
        rows: SampleSeries::for_symbol("NASDAQ", 15).generate(),
        calls: AtomicUsize::new(0),
    });
    let store = DataStore::new(&dir).with_provider(provider.clone());

    let first = store.load("NASDAQ", Period::Max).await.unwrap();
    assert_eq!(first.len(), 15);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 두 번째 요청은 저장된 파일에서 읽음
    let second = store.load("NASDAQ", Period::Max).await.unwrap();
    assert_eq!(second.len(), 15);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_no_file_and_no_provider() {
    let dir = scratch_dir("empty");
    let store = DataStore::new(&dir);
    assert!(store.is_ready().await);
    assert!(matches!(
        store.load("EURUSD", Period::OneYear).await,
        Err(DataError::NotFound(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
