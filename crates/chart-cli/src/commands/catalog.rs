//! 파라미터 세트와 자산 카탈로그 출력.

use chart_analytics::optimal_indicators;
use chart_core::{provider_ticker, AssetCategory, ParameterSet};

/// 파라미터 세트 목록 (이름, 제목, 설명).
pub fn format_parameters() -> String {
    let mut out = String::new();
    for set in ParameterSet::ALL {
        out.push_str(&format!(
            "{:<16} {:<22} {}\n",
            set.as_str(),
            set.title(),
            set.description()
        ));
    }
    out
}

/// 유형별 자산 목록. `category`가 있으면 그 유형만 출력합니다.
pub fn format_assets(category: Option<AssetCategory>) -> String {
    let categories: Vec<AssetCategory> = match category {
        Some(category) => vec![category],
        None => AssetCategory::ALL.to_vec(),
    };

    let mut out = String::new();
    for category in categories {
        out.push_str(&format!("[{}]\n", category.as_str()));
        for symbol in category.symbols() {
            out.push_str(&format!("  {:<8} {}\n", symbol, provider_ticker(symbol)));
        }
        out.push_str(&format!(
            "  recommended: {}\n",
            optimal_indicators(Some(category)).join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parameters_lists_all_sets() {
        let out = format_parameters();
        assert_eq!(out.lines().count(), 10);
        assert!(out.lines().next().unwrap().starts_with("default"));
        assert!(out.contains("Ichimoku Cloud"));
    }

    #[test]
    fn test_format_assets_single_category() {
        let out = format_assets(Some(AssetCategory::Commodities));
        assert!(out.starts_with("[commodities]"));
        assert!(out.contains("GC=F"));
        assert!(!out.contains("EURUSD"));

        let all = format_assets(None);
        assert!(all.contains("[forex]") && all.contains("[indices]"));
    }
}
