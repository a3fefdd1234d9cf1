//! 데모/테스트용 결정적 가격 시계열.

use chart_core::PriceRow;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 샘플 시계열 설정.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    pub start: NaiveDate,
    pub days: usize,
    pub initial_price: f64,
    /// 일간 변동폭 (비율)
    pub volatility: f64,
    pub seed: u64,
}

impl SampleSeries {
    /// 심볼 이름으로 시드를 정합니다. 같은 심볼은 항상 같은 시계열을 냅니다.
    pub fn for_symbol(symbol: &str, days: usize) -> Self {
        let seed = symbol
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |hash, b| {
                (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
            });
        Self {
            seed,
            days,
            ..Default::default()
        }
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn with_initial_price(mut self, price: f64) -> Self {
        self.initial_price = price;
        self
    }

    /// 평일 일봉을 생성합니다.
    pub fn generate(&self) -> Vec<PriceRow> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut rows = Vec::with_capacity(self.days);
        let mut date = self.start;
        let mut close = self.initial_price;

        while rows.len() < self.days {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                date += Duration::days(1);
                continue;
            }

            let open = close;
            let change = rng.gen_range(-1.0..1.0) * self.volatility;
            close = (open * (1.0 + change)).max(0.01);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.5) * self.volatility);
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.5) * self.volatility);
            let volume = rng.gen_range(1_000.0..10_000.0f64).round();

            rows.push(
                PriceRow::on(date)
                    .with_ohlc(open, high, low, close)
                    .with_volume(volume),
            );
            date += Duration::days(1);
        }
        rows
    }
}

impl Default for SampleSeries {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default(),
            days: 260,
            initial_price: 100.0,
            volatility: 0.02,
            seed: 42,
        }
    }
}
