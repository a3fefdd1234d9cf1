//! 차트 위젯이 그대로 소비하는 Figure 명세.
//!
//! 직렬화 형태는 Plotly의 `data`/`layout` 규칙을 따르며
//! 트레이스마다 소속 페인(`pane`)을 추가로 담습니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// 차트의 세로 영역.
///
/// 선언 순서가 위에서 아래로의 배치 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneId {
    Price,
    Oscillator,
    Macd,
    Overlay,
    Volume,
}

impl PaneId {
    /// 배치 순서.
    pub const ORDER: [PaneId; 5] = [
        PaneId::Price,
        PaneId::Oscillator,
        PaneId::Macd,
        PaneId::Overlay,
        PaneId::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Oscillator => "oscillator",
            Self::Macd => "macd",
            Self::Overlay => "overlay",
            Self::Volume => "volume",
        }
    }

    /// 값 축 제목.
    pub fn axis_title(&self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::Oscillator => "Oscillators",
            Self::Macd => "MACD",
            Self::Overlay => "Volatility",
            Self::Volume => "Volume",
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 트레이스 표시 형태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    Line,
    Markers,
    Bar,
    Candlestick,
}

impl DisplayType {
    fn plotly_type(&self) -> &'static str {
        match self {
            Self::Line | Self::Markers => "scatter",
            Self::Bar => "bar",
            Self::Candlestick => "candlestick",
        }
    }

    fn plotly_mode(&self) -> Option<&'static str> {
        match self {
            Self::Line => Some("lines"),
            Self::Markers => Some("markers"),
            Self::Bar | Self::Candlestick => None,
        }
    }
}

/// 범례 표시 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// 범례에만 표시되고 클릭하면 나타남
    LegendOnly,
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Visible => serializer.serialize_bool(true),
            Self::LegendOnly => serializer.serialize_str("legendonly"),
        }
    }
}

/// 선 스타일.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub width: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// 마커 색상 (단일 또는 점별).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Single(String),
    PerPoint(Vec<String>),
}

/// 마커/막대 스타일.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: MarkerColor,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// 하나의 페인에 묶인 시리즈.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,

    #[serde(rename = "type")]
    plotly_type: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'static str>,

    #[serde(skip)]
    pub display: DisplayType,

    pub pane: PaneId,

    /// 공유 x축 날짜 레이블
    pub x: Vec<String>,

    /// 값 (결측은 null)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Option<f64>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Vec<Option<f64>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Vec<Option<f64>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Vec<Option<f64>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Vec<Option<f64>>>,

    pub xaxis: String,

    /// 조립 단계에서 페인 위치에 따라 채워짐
    pub yaxis: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,

    pub visible: Visibility,

    pub legendgroup: String,
}

impl Trace {
    /// 값 시리즈 트레이스.
    pub fn series(
        name: impl Into<String>,
        display: DisplayType,
        pane: PaneId,
        x: Vec<String>,
        y: Vec<Option<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            plotly_type: display.plotly_type(),
            mode: display.plotly_mode(),
            display,
            pane,
            x,
            y: Some(y),
            open: None,
            high: None,
            low: None,
            close: None,
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
            line: None,
            marker: None,
            fill: None,
            fillcolor: None,
            visible: Visibility::Visible,
            legendgroup: String::new(),
        }
    }

    /// 캔들스틱 트레이스.
    pub fn candlestick(
        name: impl Into<String>,
        x: Vec<String>,
        open: Vec<Option<f64>>,
        high: Vec<Option<f64>>,
        low: Vec<Option<f64>>,
        close: Vec<Option<f64>>,
    ) -> Self {
        let display = DisplayType::Candlestick;
        Self {
            name: name.into(),
            plotly_type: display.plotly_type(),
            mode: display.plotly_mode(),
            display,
            pane: PaneId::Price,
            x,
            y: None,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
            line: None,
            marker: None,
            fill: None,
            fillcolor: None,
            visible: Visibility::Visible,
            legendgroup: String::new(),
        }
    }

    pub fn with_legend_group(mut self, group: impl Into<String>) -> Self {
        self.legendgroup = group.into();
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_visibility(mut self, visible: Visibility) -> Self {
        self.visible = visible;
        self
    }

    /// 표시 형태를 바꿉니다. `type`/`mode` 필드도 함께 갱신됩니다.
    pub fn set_display(&mut self, display: DisplayType) {
        self.display = display;
        self.plotly_type = display.plotly_type();
        self.mode = display.plotly_mode();
    }
}

/// 수평 기준선.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub color: String,
    pub dash: String,
}

/// 배치된 페인.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneSpec {
    pub id: PaneId,

    /// 트레이스가 참조하는 축 id ("y", "y2", ...)
    pub yaxis: String,

    /// [하단, 상단] 높이 비율
    pub domain: [f64; 2],

    /// 고정 범위 (없으면 자동)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,

    pub reference_lines: Vec<ReferenceLine>,
}

/// 범례 정책.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSpec {
    pub orientation: String,
    pub x: f64,
    pub xanchor: String,
    pub y: f64,
    pub yanchor: String,
    pub groupclick: String,
}

/// 범위 선택 버튼.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSelector {
    pub buttons: Vec<RangeButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

/// 공유 x축.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxisSpec {
    #[serde(rename = "type")]
    pub axis_type: String,
    pub tickformat: String,
    pub anchor: String,
    pub domain: [f64; 2],
    pub rangeselector: RangeSelector,
    pub rangeslider: RangeSlider,
}

/// 페인별 값 축.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxisSpec {
    pub domain: [f64; 2],
    pub anchor: String,
    pub title: String,
    pub autorange: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeLine {
    pub color: String,
    pub width: f64,
    pub dash: String,
}

/// 레이아웃 도형 (기준선).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeSpec {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub xref: String,
    pub x0: f64,
    pub x1: f64,
    pub yref: String,
    pub y0: f64,
    pub y1: f64,
    pub line: ShapeLine,
}

/// 레이아웃.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub title: String,

    pub height: u32,

    pub hovermode: String,

    pub showlegend: bool,

    pub legend: LegendSpec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<XAxisSpec>,

    /// "yaxis", "yaxis2", ... 키로 펼쳐짐
    #[serde(flatten)]
    pub yaxes: BTreeMap<String, YAxisSpec>,

    pub shapes: Vec<ShapeSpec>,
}

/// 완성된 Figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSpec {
    pub title: String,
    pub traces: Vec<Trace>,
    pub panes: Vec<PaneSpec>,
    pub layout: LayoutSpec,
}

impl FigureSpec {
    /// 트레이스가 하나도 없는지.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// 특정 페인의 트레이스.
    pub fn traces_in(&self, pane: PaneId) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(move |t| t.pane == pane)
    }

    /// 배치된 페인 id 목록.
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes.iter().map(|p| p.id).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_serialization() {
        assert_eq!(serde_json::to_value(Visibility::Visible).unwrap(), true);
        assert_eq!(
            serde_json::to_value(Visibility::LegendOnly).unwrap(),
            "legendonly"
        );
    }

    #[test]
    fn test_series_trace_plotly_fields() {
        let trace = Trace::series(
            "RSI",
            DisplayType::Line,
            PaneId::Oscillator,
            vec!["2024-01-01".into()],
            vec![Some(55.0)],
        );
        let json = serde_json::to_value(&trace).unwrap();

        assert_eq!(json["type"], "scatter");
        assert_eq!(json["mode"], "lines");
        assert_eq!(json["pane"], "oscillator");
        assert!(json.get("open").is_none());
        assert!(json.get("display").is_none());
    }

    #[test]
    fn test_set_display_updates_type() {
        let mut trace = Trace::series(
            "MACD_Histogram",
            DisplayType::Line,
            PaneId::Macd,
            vec![],
            vec![],
        );
        trace.set_display(DisplayType::Bar);
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "bar");
        assert!(json.get("mode").is_none());
    }

    #[test]
    fn test_pane_order() {
        let mut panes = vec![PaneId::Volume, PaneId::Price, PaneId::Macd];
        panes.sort();
        assert_eq!(panes, vec![PaneId::Price, PaneId::Macd, PaneId::Volume]);
    }
}
