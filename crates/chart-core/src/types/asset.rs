//! 자산 카탈로그.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// 자산 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// 외환
    Forex,
    /// 원자재
    Commodities,
    /// 지수
    Indices,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 3] = [
        AssetCategory::Forex,
        AssetCategory::Commodities,
        AssetCategory::Indices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forex => "forex",
            Self::Commodities => "commodities",
            Self::Indices => "indices",
        }
    }

    /// 유형에 속한 심볼 목록.
    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            Self::Forex => &["EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD"],
            Self::Commodities => &["GOLD", "SILVER", "OIL"],
            Self::Indices => &["S&P500", "NASDAQ", "DOW"],
        }
    }

    /// 심볼이 속한 유형을 찾습니다.
    pub fn of_symbol(symbol: &str) -> Option<Self> {
        let upper = symbol.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| category.symbols().contains(&upper.as_str()))
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forex" | "fx" => Ok(Self::Forex),
            "commodities" | "commodity" => Ok(Self::Commodities),
            "indices" | "index" => Ok(Self::Indices),
            _ => Err(ChartError::InvalidAssetCategory(s.to_string())),
        }
    }
}

/// 대시보드 심볼을 원격 시세 제공자의 티커로 변환합니다.
///
/// 6자리 통화쌍은 `=X`, 원자재는 선물 티커, 지수는 `^` 티커를 사용합니다.
/// 그 외 심볼은 그대로 반환합니다.
pub fn provider_ticker(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    if upper.contains('=') || upper.starts_with('^') {
        return upper;
    }

    match upper.as_str() {
        "GOLD" => return "GC=F".to_string(),
        "SILVER" => return "SI=F".to_string(),
        "OIL" => return "CL=F".to_string(),
        "S&P500" | "SPX" => return "^GSPC".to_string(),
        "NASDAQ" => return "^IXIC".to_string(),
        "DOW" => return "^DJI".to_string(),
        _ => {}
    }

    let is_currency_pair = upper.len() == 6
        && ["EUR", "GBP", "USD", "JPY", "AUD"]
            .iter()
            .any(|prefix| upper.starts_with(prefix));
    if is_currency_pair {
        format!("{}=X", upper)
    } else {
        upper
    }
}
