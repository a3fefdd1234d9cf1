//! 가격 데이터 접근.
//!
//! 이 crate는 다음을 제공합니다:
//! - CSV/JSON 행 로더와 CSV 저장
//! - 데이터 디렉터리 저장소 (최신 파일 선택, 원격 제공자 fallback)
//! - Yahoo Finance 시장 데이터 제공자
//! - 결정적 샘플 시계열 생성기

pub mod error;
pub mod loader;
pub mod provider;
pub mod sample;
pub mod store;

pub use error::{DataError, Result};
pub use loader::{
    load_csv, load_json, load_rows, parse_json_rows, read_csv_rows, save_csv, write_csv_rows,
};
pub use provider::{MarketDataProvider, YahooProvider};
pub use sample::SampleSeries;
pub use store::{parse_file_name, DataFile, DataStore};
