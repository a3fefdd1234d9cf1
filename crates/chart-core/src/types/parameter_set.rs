//! 지표 파라미터 세트.
//!
//! 파라미터 세트는 계산할 지표 조합과 기간을 미리 묶어 둔 이름입니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// 사전 정의된 지표 파라미터 세트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSet {
    /// 모든 보조 지표 포함
    #[default]
    Default,
    ShortTerm,
    MediumTerm,
    HighFreq,
    TightChannel,
    WideChannel,
    TrendFollowing,
    Momentum,
    Volatility,
    Ichimoku,
}

impl ParameterSet {
    /// 선언 순서의 전체 목록.
    pub const ALL: [ParameterSet; 10] = [
        ParameterSet::Default,
        ParameterSet::ShortTerm,
        ParameterSet::MediumTerm,
        ParameterSet::HighFreq,
        ParameterSet::TightChannel,
        ParameterSet::WideChannel,
        ParameterSet::TrendFollowing,
        ParameterSet::Momentum,
        ParameterSet::Volatility,
        ParameterSet::Ichimoku,
    ];

    /// 식별자 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::ShortTerm => "short_term",
            Self::MediumTerm => "medium_term",
            Self::HighFreq => "high_freq",
            Self::TightChannel => "tight_channel",
            Self::WideChannel => "wide_channel",
            Self::TrendFollowing => "trend_following",
            Self::Momentum => "momentum",
            Self::Volatility => "volatility",
            Self::Ichimoku => "ichimoku",
        }
    }

    /// 차트 제목에 쓰는 이름.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::ShortTerm => "Short-Term Trading",
            Self::MediumTerm => "Medium-Term Trend",
            Self::HighFreq => "High-Frequency",
            Self::TightChannel => "Tight Channel",
            Self::WideChannel => "Wide Channel",
            Self::TrendFollowing => "Trend Following",
            Self::Momentum => "Momentum Validation",
            Self::Volatility => "Volatility Trading",
            Self::Ichimoku => "Ichimoku Cloud",
        }
    }

    /// 세트에 포함되는 대표 지표 설명.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Default => "SMA(20,50,200), RSI(14), MACD(12,26,9), Bollinger(20,2) and all optional studies",
            Self::ShortTerm => "SMA(9,21), EMA(12,26), RSI(7), MACD",
            Self::MediumTerm => "SMA(50,200), EMA(50,200), RSI(14), MACD",
            Self::HighFreq => "RSI(7), MACD(5,35,5)",
            Self::TightChannel => "Bollinger(14,1.5)",
            Self::WideChannel => "Bollinger(30,2.5)",
            Self::TrendFollowing => "SMA(50,200), EMA(12,26), ADX(14), MACD",
            Self::Momentum => "RSI(14), MACD, Stochastic(14,3,3)",
            Self::Volatility => "Bollinger(20,2), Bollinger(14,1.5), RSI(14)",
            Self::Ichimoku => "Ichimoku(9,26,52), Parabolic SAR, OBV",
        }
    }

    /// 세트 식별자 목록.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|set| set.as_str()).collect()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterSet {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|set| set.as_str() == normalized)
            .ok_or_else(|| {
                ChartError::InvalidParameterSet(format!(
                    "{}. Choose from: {}",
                    s,
                    Self::names().join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for set in ParameterSet::ALL {
            assert_eq!(set.as_str().parse::<ParameterSet>().unwrap(), set);
        }
        assert_eq!(
            "Trend_Following".parse::<ParameterSet>().unwrap(),
            ParameterSet::TrendFollowing
        );
    }

    #[test]
    fn test_parse_invalid_lists_choices() {
        let err = "scalping".parse::<ParameterSet>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("scalping"));
        assert!(message.contains("ichimoku"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ParameterSet::TightChannel).unwrap();
        assert_eq!(json, "\"tight_channel\"");
        let parsed: ParameterSet = serde_json::from_str("\"high_freq\"").unwrap();
        assert_eq!(parsed, ParameterSet::HighFreq);
    }
}
