//! 지표 이름 → 페인 분류 조회.

use chart_render::{ChartConfig, PaneId};
use serde::Serialize;

/// 이름 하나의 분류 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub name: String,
    /// 분류되지 않으면 `None` (Figure에서 제외됨)
    pub pane: Option<PaneId>,
    pub legend_group: Option<String>,
    pub visible: bool,
}

pub fn classify_names(config: &ChartConfig, names: &[String]) -> Vec<Classification> {
    names
        .iter()
        .map(|name| {
            let descriptor = config
                .resolve(name)
                .and_then(|resolved| config.descriptor(resolved.index).map(|d| (resolved.pane, d)));
            match descriptor {
                Some((pane, descriptor)) => Classification {
                    name: name.clone(),
                    pane: Some(pane),
                    legend_group: Some(descriptor.legend_group.clone()),
                    visible: (descriptor.default_visible && !config.is_hidden_by_default(name))
                        || config.is_default_visible(name),
                },
                None => Classification {
                    name: name.clone(),
                    pane: None,
                    legend_group: None,
                    visible: false,
                },
            }
        })
        .collect()
}

/// 표 형식 출력.
pub fn format_table(results: &[Classification]) -> String {
    let width = results
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = format!("{:<width$}  {:<10}  {:<8}  {}\n", "NAME", "PANE", "VISIBLE", "GROUP");
    for result in results {
        let pane = result.pane.map_or("-", |p| p.as_str());
        let visible = if result.pane.is_none() {
            "-"
        } else if result.visible {
            "yes"
        } else {
            "legend"
        };
        out.push_str(&format!(
            "{:<width$}  {:<10}  {:<8}  {}\n",
            result.name,
            pane,
            visible,
            result.legend_group.as_deref().unwrap_or("-"),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_names() {
        let config = ChartConfig::standard();
        let results = classify_names(&config, &names(&["SMA20", "RSI", "MACD_Signal", "OBV", "Foo"]));

        let panes: Vec<Option<PaneId>> = results.iter().map(|r| r.pane).collect();
        assert_eq!(
            panes,
            vec![
                Some(PaneId::Price),
                Some(PaneId::Oscillator),
                Some(PaneId::Macd),
                Some(PaneId::Volume),
                None
            ]
        );
        assert!(results[0].visible);
        assert!(!results[4].visible);
        assert!(results[4].legend_group.is_none());
    }

    #[test]
    fn test_format_table() {
        let config = ChartConfig::standard();
        let table = format_table(&classify_names(&config, &names(&["RSI", "Unknown"])));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].contains("oscillator"));
        assert!(lines[2].starts_with("Unknown"));
    }
}
