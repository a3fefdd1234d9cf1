//! 페인 배치와 레이아웃 정책.

use std::collections::BTreeMap;

use crate::figure::{
    LayoutSpec, LegendSpec, PaneId, PaneSpec, RangeButton, RangeSelector, RangeSlider,
    ReferenceLine, ShapeLine, ShapeSpec, XAxisSpec, YAxisSpec,
};

/// 오실레이터 페인 고정 범위.
const OSCILLATOR_RANGE: [f64; 2] = [0.0, 100.0];

/// 페인 위치 → 축 id ("y", "y2", ...).
pub fn axis_id(position: usize) -> String {
    if position == 0 {
        "y".to_string()
    } else {
        format!("y{}", position + 1)
    }
}

/// 축 id → 레이아웃 키 ("yaxis", "yaxis2", ...).
fn layout_key(axis: &str) -> String {
    format!("yaxis{}", axis.trim_start_matches('y'))
}

/// 페인별 기준선.
fn reference_lines(pane: PaneId) -> Vec<ReferenceLine> {
    let dashed = |y: f64, color: &str| ReferenceLine {
        y,
        color: color.to_string(),
        dash: "dash".to_string(),
    };
    match pane {
        PaneId::Oscillator => vec![dashed(70.0, "red"), dashed(50.0, "gray"), dashed(30.0, "green")],
        PaneId::Macd => vec![dashed(0.0, "gray")],
        _ => Vec::new(),
    }
}

fn range_selector() -> RangeSelector {
    let button = |count: u32, label: &str, step: &str, stepmode: &str| RangeButton {
        count: Some(count),
        label: label.to_string(),
        step: Some(step.to_string()),
        stepmode: Some(stepmode.to_string()),
    };
    RangeSelector {
        buttons: vec![
            button(1, "1m", "month", "backward"),
            button(3, "3m", "month", "backward"),
            button(6, "6m", "month", "backward"),
            button(1, "YTD", "year", "todate"),
            button(1, "1y", "year", "backward"),
            RangeButton {
                count: None,
                label: "all".to_string(),
                step: Some("all".to_string()),
                stepmode: None,
            },
        ],
    }
}

fn legend() -> LegendSpec {
    LegendSpec {
        orientation: "h".to_string(),
        x: 0.5,
        xanchor: "center".to_string(),
        y: 1.02,
        yanchor: "bottom".to_string(),
        groupclick: "togglegroup".to_string(),
    }
}

/// 페인을 위에서 아래로 같은 높이로 나눕니다.
///
/// `panes`는 배치 순서대로 정렬되어 있어야 합니다. n개 중 i번째 페인은
/// `[(n-i-1)/n, (n-i)/n]` 구간을 차지합니다.
pub fn compose_layout(panes: &[PaneId], height: u32, title: &str) -> (Vec<PaneSpec>, LayoutSpec) {
    let count = panes.len();
    let mut specs = Vec::with_capacity(count);
    let mut yaxes = BTreeMap::new();
    let mut shapes = Vec::new();

    for (position, pane) in panes.iter().enumerate() {
        let n = count as f64;
        let i = position as f64;
        let domain = [(n - i - 1.0) / n, (n - i) / n];
        let axis = axis_id(position);
        let range = (*pane == PaneId::Oscillator).then_some(OSCILLATOR_RANGE);
        let lines = reference_lines(*pane);

        shapes.extend(lines.iter().map(|line| ShapeSpec {
            shape_type: "line".to_string(),
            xref: "paper".to_string(),
            x0: 0.0,
            x1: 1.0,
            yref: axis.clone(),
            y0: line.y,
            y1: line.y,
            line: ShapeLine {
                color: line.color.clone(),
                width: 1.0,
                dash: line.dash.clone(),
            },
        }));

        yaxes.insert(
            layout_key(&axis),
            YAxisSpec {
                domain,
                anchor: "x".to_string(),
                title: pane.axis_title().to_string(),
                autorange: range.is_none(),
                range,
            },
        );

        specs.push(PaneSpec {
            id: *pane,
            yaxis: axis,
            domain,
            range,
            reference_lines: lines,
        });
    }

    // x축은 가장 아래 페인에 붙임
    let xaxis = specs.last().map(|bottom| XAxisSpec {
        axis_type: "date".to_string(),
        tickformat: "%Y-%m-%d".to_string(),
        anchor: bottom.yaxis.clone(),
        domain: [0.0, 1.0],
        rangeselector: range_selector(),
        rangeslider: RangeSlider { visible: false },
    });

    let layout = LayoutSpec {
        title: title.to_string(),
        height,
        hovermode: "x unified".to_string(),
        showlegend: true,
        legend: legend(),
        xaxis,
        yaxes,
        shapes,
    };

    (specs, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ids() {
        assert_eq!(axis_id(0), "y");
        assert_eq!(axis_id(2), "y3");
        assert_eq!(layout_key("y"), "yaxis");
        assert_eq!(layout_key("y3"), "yaxis3");
    }

    #[test]
    fn test_three_pane_domains() {
        let (panes, layout) =
            compose_layout(&[PaneId::Price, PaneId::Oscillator, PaneId::Macd], 800, "EURUSD");

        let domains: Vec<[f64; 2]> = panes.iter().map(|p| p.domain).collect();
        let third = 1.0 / 3.0;
        assert!((domains[0][0] - 2.0 * third).abs() < 1e-12);
        assert_eq!(domains[0][1], 1.0);
        assert!((domains[1][0] - third).abs() < 1e-12);
        assert_eq!(domains[2][0], 0.0);

        assert_eq!(panes[1].range, Some([0.0, 100.0]));
        assert_eq!(panes[1].reference_lines.len(), 3);
        assert_eq!(panes[2].reference_lines[0].y, 0.0);
        assert_eq!(layout.shapes.len(), 4);
        assert_eq!(layout.xaxis.as_ref().unwrap().anchor, "y3");
    }

    #[test]
    fn test_layout_json_keys() {
        let (_, layout) = compose_layout(&[PaneId::Price, PaneId::Volume], 600, "GOLD");
        let json = serde_json::to_value(&layout).unwrap();

        assert_eq!(json["height"], 600);
        assert_eq!(json["hovermode"], "x unified");
        assert_eq!(json["legend"]["groupclick"], "togglegroup");
        assert_eq!(json["yaxis2"]["title"], "Volume");
        assert_eq!(json["xaxis"]["type"], "date");
        assert_eq!(json["xaxis"]["rangeslider"]["visible"], false);
        assert_eq!(json["xaxis"]["rangeselector"]["buttons"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_no_panes() {
        let (panes, layout) = compose_layout(&[], 800, "");
        assert!(panes.is_empty());
        assert!(layout.xaxis.is_none());
        assert!(layout.yaxes.is_empty());
    }
}
