//! 지표 디스크립터 테이블.
//!
//! 어떤 지표가 어느 페인에 그려지고 어떤 스타일과 기본 표시 상태를 갖는지는
//! 전부 이 테이블에서 결정됩니다. 새 지표를 추가하려면 디스크립터 하나를
//! 추가하면 됩니다.
//!
//! 테이블은 [`ChartConfig::new`]에서 한 번 조회 구조로 변환되고,
//! 이후에는 `Arc<ChartConfig>`로 공유되며 변경되지 않습니다.

use std::collections::BTreeMap;

use crate::figure::{DisplayType, PaneId};

/// 지표 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    SimpleMovingAverage,
    ExponentialMovingAverage,
    Ichimoku,
    ParabolicSar,
    Rsi,
    RsiFast,
    StochasticK,
    StochasticD,
    Adx,
    PlusDi,
    MinusDi,
    Macd,
    MacdHighFrequency,
    BollingerBands,
    BollingerTight,
    BollingerWide,
    Obv,
    ObvAverage,
}

/// 이름 패턴 (정확히 일치 또는 접두사).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
}

impl NamePattern {
    pub fn exact(name: &str) -> Self {
        Self::Exact(name.to_string())
    }

    pub fn prefix(prefix: &str) -> Self {
        Self::Prefix(prefix.to_string())
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}

/// 지표 이름을 페인에 연결하는 방식.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// 가격 페인 위에 겹쳐 그림
    MainPlot(NamePattern),
    /// 보조 페인의 멤버 토큰
    Member { pane: PaneId, token: String },
}

impl Placement {
    pub fn pane(&self) -> PaneId {
        match self {
            Self::MainPlot(_) => PaneId::Price,
            Self::Member { pane, .. } => *pane,
        }
    }
}

/// 멤버 토큰 매칭.
///
/// 이름이 토큰과 같거나, `토큰_`로 시작하거나, 토큰으로 끝나면 일치합니다.
pub fn member_matches(name: &str, token: &str) -> bool {
    name == token
        || name
            .strip_prefix(token)
            .is_some_and(|rest| rest.starts_with('_'))
        || name.ends_with(token)
}

/// 스타일 덮어쓰기. 지정한 필드만 적용됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub dash: Option<String>,
    pub fill: Option<String>,
    pub fillcolor: Option<String>,
    pub display: Option<DisplayType>,
}

impl StyleOverride {
    pub fn color(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Default::default()
        }
    }

    pub fn with_dash(mut self, dash: &str) -> Self {
        self.dash = Some(dash.to_string());
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_display(mut self, display: DisplayType) -> Self {
        self.display = Some(display);
        self
    }

    /// `other`에 지정된 필드로 덮어씁니다.
    pub fn merge(&mut self, other: &StyleOverride) {
        if other.color.is_some() {
            self.color = other.color.clone();
        }
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.dash.is_some() {
            self.dash = other.dash.clone();
        }
        if other.fill.is_some() {
            self.fill = other.fill.clone();
        }
        if other.fillcolor.is_some() {
            self.fillcolor = other.fillcolor.clone();
        }
        if other.display.is_some() {
            self.display = other.display;
        }
    }
}

/// 지표 디스크립터.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDescriptor {
    pub kind: IndicatorKind,
    pub placement: Placement,
    /// false면 기본 표시 그룹에 속하지 않는 한 범례에만 표시
    pub default_visible: bool,
    pub legend_group: String,
    pub style: StyleOverride,
}

impl IndicatorDescriptor {
    pub fn main_plot(kind: IndicatorKind, pattern: NamePattern, legend_group: &str) -> Self {
        Self {
            kind,
            placement: Placement::MainPlot(pattern),
            default_visible: true,
            legend_group: legend_group.to_string(),
            style: StyleOverride::default(),
        }
    }

    pub fn member(kind: IndicatorKind, pane: PaneId, token: &str, legend_group: &str) -> Self {
        Self {
            kind,
            placement: Placement::Member {
                pane,
                token: token.to_string(),
            },
            default_visible: true,
            legend_group: legend_group.to_string(),
            style: StyleOverride::default(),
        }
    }

    pub fn with_style(mut self, style: StyleOverride) -> Self {
        self.style = style;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }

    pub fn pane(&self) -> PaneId {
        self.placement.pane()
    }
}

/// 상단/중간/하단 밴드 묶음. 하단 → 중간 → 상단 순으로 그려집니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandGroup {
    pub low: String,
    pub mid: String,
    pub high: String,
    /// 하단 트레이스의 채우기 색
    pub fill_color: String,
}

impl BandGroup {
    /// `X_Low`, `X_Mid`, `X_High` 묶음.
    pub fn with_prefix(prefix: &str, fill_color: &str) -> Self {
        Self {
            low: format!("{}_Low", prefix),
            mid: format!("{}_Mid", prefix),
            high: format!("{}_High", prefix),
            fill_color: fill_color.to_string(),
        }
    }

    /// 그리기 순서의 멤버.
    pub fn members(&self) -> [&str; 3] {
        [&self.low, &self.mid, &self.high]
    }
}

/// 본선/시그널/히스토그램 묶음. 선언된 순서대로 그려집니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalGroup {
    pub line: String,
    pub signal: String,
    pub histogram: String,
}

impl SignalGroup {
    /// `X`, `X_Signal`, `X_Histogram` 묶음.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            line: prefix.to_string(),
            signal: format!("{}_Signal", prefix),
            histogram: format!("{}_Histogram", prefix),
        }
    }

    pub fn members(&self) -> [&str; 3] {
        [&self.line, &self.signal, &self.histogram]
    }
}

/// 구름대 묶음. 경계 두 개를 먼저, 나머지 선을 나중에 그립니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudGroup {
    pub span_a: String,
    pub span_b: String,
    pub lines: Vec<String>,
    /// span_b가 span_a까지 채우는 색
    pub fill_color: String,
}

impl CloudGroup {
    pub fn members(&self) -> Vec<&str> {
        let mut members = vec![self.span_a.as_str(), self.span_b.as_str()];
        members.extend(self.lines.iter().map(String::as_str));
        members
    }
}

/// 고정 색상.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub histogram_positive: String,
    pub histogram_negative: String,
    pub transparent: String,
    pub close_line: String,
    pub volume_bar: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            histogram_positive: "green".to_string(),
            histogram_negative: "red".to_string(),
            transparent: "rgba(0,0,0,0)".to_string(),
            close_line: "black".to_string(),
            volume_bar: "rgba(128,128,128,0.5)".to_string(),
        }
    }
}

/// 이름 해석 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub pane: PaneId,
    /// 디스크립터 선언 순서
    pub index: usize,
}

/// 불변 차트 설정.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    descriptors: Vec<IndicatorDescriptor>,
    hidden_by_default: Vec<NamePattern>,
    default_visible: Vec<NamePattern>,
    name_styles: BTreeMap<String, StyleOverride>,
    band_groups: Vec<BandGroup>,
    signal_groups: Vec<SignalGroup>,
    cloud_groups: Vec<CloudGroup>,
    histogram_token: String,
    palette: Palette,
    height: u32,

    // 조회 구조
    main_exact: BTreeMap<String, usize>,
    main_prefixes: Vec<(String, usize)>,
    members: Vec<(PaneId, Vec<(String, usize)>)>,
}

/// [`ChartConfig`] 구성 요소.
#[derive(Debug, Clone, Default)]
pub struct ChartTable {
    pub descriptors: Vec<IndicatorDescriptor>,
    pub hidden_by_default: Vec<NamePattern>,
    pub default_visible: Vec<NamePattern>,
    pub name_styles: BTreeMap<String, StyleOverride>,
    pub band_groups: Vec<BandGroup>,
    pub signal_groups: Vec<SignalGroup>,
    pub cloud_groups: Vec<CloudGroup>,
    pub histogram_token: String,
    pub palette: Palette,
}

impl ChartConfig {
    /// 기본 차트 높이 (px).
    pub const DEFAULT_HEIGHT: u32 = 800;

    /// 테이블을 조회 구조로 변환합니다.
    pub fn new(table: ChartTable) -> Self {
        let mut main_exact = BTreeMap::new();
        let mut main_prefixes = Vec::new();
        let mut members: Vec<(PaneId, Vec<(String, usize)>)> = PaneId::ORDER
            .iter()
            .filter(|pane| **pane != PaneId::Price)
            .map(|pane| (*pane, Vec::new()))
            .collect();

        for (index, descriptor) in table.descriptors.iter().enumerate() {
            match &descriptor.placement {
                Placement::MainPlot(NamePattern::Exact(name)) => {
                    main_exact.entry(name.clone()).or_insert(index);
                }
                Placement::MainPlot(NamePattern::Prefix(prefix)) => {
                    main_prefixes.push((prefix.clone(), index));
                }
                Placement::Member { pane, token } => {
                    if let Some((_, list)) = members.iter_mut().find(|(p, _)| p == pane) {
                        list.push((token.clone(), index));
                    } else {
                        // 가격 페인 멤버는 접두사로 취급
                        main_prefixes.push((token.clone(), index));
                    }
                }
            }
        }
        // 긴 접두사 우선, 같으면 선언 순서
        main_prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.1.cmp(&b.1)));

        Self {
            descriptors: table.descriptors,
            hidden_by_default: table.hidden_by_default,
            default_visible: table.default_visible,
            name_styles: table.name_styles,
            band_groups: table.band_groups,
            signal_groups: table.signal_groups,
            cloud_groups: table.cloud_groups,
            histogram_token: table.histogram_token,
            palette: table.palette,
            height: Self::DEFAULT_HEIGHT,
            main_exact,
            main_prefixes,
            members,
        }
    }

    /// 대시보드 표준 테이블.
    pub fn standard() -> Self {
        Self::new(standard_table())
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn descriptors(&self) -> &[IndicatorDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, index: usize) -> Option<&IndicatorDescriptor> {
        self.descriptors.get(index)
    }

    pub fn band_groups(&self) -> &[BandGroup] {
        &self.band_groups
    }

    pub fn signal_groups(&self) -> &[SignalGroup] {
        &self.signal_groups
    }

    pub fn cloud_groups(&self) -> &[CloudGroup] {
        &self.cloud_groups
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn name_style(&self, name: &str) -> Option<&StyleOverride> {
        self.name_styles.get(name)
    }

    /// 히스토그램 표시 대상인지.
    pub fn is_histogram(&self, name: &str) -> bool {
        !self.histogram_token.is_empty() && name.contains(self.histogram_token.as_str())
    }

    pub fn is_hidden_by_default(&self, name: &str) -> bool {
        self.hidden_by_default.iter().any(|p| p.matches(name))
    }

    pub fn is_default_visible(&self, name: &str) -> bool {
        self.default_visible.iter().any(|p| p.matches(name))
    }

    pub(crate) fn main_lookup(&self, name: &str) -> Option<usize> {
        self.main_exact.get(name).copied().or_else(|| {
            self.main_prefixes
                .iter()
                .find(|(prefix, _)| name.starts_with(prefix.as_str()))
                .map(|(_, index)| *index)
        })
    }

    pub(crate) fn member_lists(&self) -> &[(PaneId, Vec<(String, usize)>)] {
        &self.members
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn styles(entries: &[(&str, StyleOverride)]) -> BTreeMap<String, StyleOverride> {
    entries
        .iter()
        .map(|(name, style)| (name.to_string(), style.clone()))
        .collect()
}

/// 표준 디스크립터 테이블.
pub fn standard_table() -> ChartTable {
    use IndicatorKind as K;
    use PaneId::{Macd, Oscillator, Overlay, Volume};

    let band_fill = "rgba(0,0,255,0.1)";

    let descriptors = vec![
        // 가격 페인
        IndicatorDescriptor::main_plot(K::SimpleMovingAverage, NamePattern::prefix("SMA"), "moving_averages")
            .with_style(StyleOverride::color("blue")),
        IndicatorDescriptor::main_plot(K::ExponentialMovingAverage, NamePattern::prefix("EMA"), "moving_averages")
            .with_style(StyleOverride::color("purple")),
        IndicatorDescriptor::main_plot(K::Ichimoku, NamePattern::prefix("Ichimoku_"), "ichimoku"),
        IndicatorDescriptor::main_plot(K::ParabolicSar, NamePattern::exact("SAR"), "sar")
            .with_style(StyleOverride::color("blue").with_display(DisplayType::Markers)),
        // 오실레이터
        IndicatorDescriptor::member(K::Rsi, Oscillator, "RSI", "rsi")
            .with_style(StyleOverride::color("purple")),
        IndicatorDescriptor::member(K::RsiFast, Oscillator, "RSI7", "rsi")
            .with_style(StyleOverride::color("violet"))
            .hidden(),
        IndicatorDescriptor::member(K::StochasticK, Oscillator, "STOCH_K", "stochastic")
            .with_style(StyleOverride::color("green")),
        IndicatorDescriptor::member(K::StochasticD, Oscillator, "STOCH_D", "stochastic")
            .with_style(StyleOverride::color("red")),
        IndicatorDescriptor::member(K::Adx, Oscillator, "ADX", "adx")
            .with_style(StyleOverride::color("orange")),
        IndicatorDescriptor::member(K::PlusDi, Oscillator, "PDI", "adx")
            .with_style(StyleOverride::color("green").with_dash("dot"))
            .hidden(),
        IndicatorDescriptor::member(K::MinusDi, Oscillator, "NDI", "adx")
            .with_style(StyleOverride::color("red").with_dash("dot"))
            .hidden(),
        // MACD
        IndicatorDescriptor::member(K::Macd, Macd, "MACD", "macd")
            .with_style(StyleOverride::color("blue")),
        IndicatorDescriptor::member(K::MacdHighFrequency, Macd, "MACD_HF", "macd_hf")
            .with_style(StyleOverride::color("teal"))
            .hidden(),
        // 변동성 밴드
        IndicatorDescriptor::member(K::BollingerBands, Overlay, "BB", "bollinger")
            .with_style(StyleOverride::color("blue")),
        IndicatorDescriptor::member(K::BollingerTight, Overlay, "BB_Tight", "bollinger_tight")
            .with_style(StyleOverride::color("green"))
            .hidden(),
        IndicatorDescriptor::member(K::BollingerWide, Overlay, "BB_Wide", "bollinger_wide")
            .with_style(StyleOverride::color("red"))
            .hidden(),
        // 거래량
        IndicatorDescriptor::member(K::Obv, Volume, "OBV", "volume")
            .with_style(StyleOverride::color("purple")),
        IndicatorDescriptor::member(K::ObvAverage, Volume, "OBV_MA", "volume")
            .with_style(StyleOverride::color("orange")),
    ];

    let hidden_by_default = ["SMA5", "SMA10", "SMA100", "SMA150", "EMA5", "EMA10", "EMA100", "EMA150"]
        .iter()
        .map(|name| NamePattern::exact(name))
        .collect();

    let default_visible = [
        "SMA20", "SMA50", "SMA200", "EMA12", "EMA26", "EMA50", "EMA200", "RSI", "STOCH_K",
        "STOCH_D", "ADX", "MACD", "MACD_Signal", "MACD_Histogram", "BB_High", "BB_Mid", "BB_Low",
        "OBV", "OBV_MA",
    ]
    .iter()
    .map(|name| NamePattern::exact(name))
    .collect();

    let name_styles = styles(&[
        ("SMA20", StyleOverride::color("orange")),
        ("SMA50", StyleOverride::color("blue")),
        ("SMA200", StyleOverride::color("red")),
        ("EMA12", StyleOverride::color("green")),
        ("EMA26", StyleOverride::color("purple")),
        ("EMA50", StyleOverride::color("teal")),
        ("EMA200", StyleOverride::color("brown")),
        ("MACD_Signal", StyleOverride::color("red")),
        ("MACD_HF_Signal", StyleOverride::color("salmon")),
        ("BB_Mid", StyleOverride::color("blue").with_dash("dash")),
        ("BB_Tight_Mid", StyleOverride::color("green").with_dash("dash")),
        ("BB_Wide_Mid", StyleOverride::color("red").with_dash("dash")),
        ("Ichimoku_Tenkan", StyleOverride::color("red")),
        ("Ichimoku_Kijun", StyleOverride::color("blue")),
        ("Ichimoku_SpanA", StyleOverride::color("green")),
        ("Ichimoku_SpanB", StyleOverride::color("red")),
        ("Ichimoku_Chikou", StyleOverride::color("purple").with_width(1.5)),
    ]);

    ChartTable {
        descriptors,
        hidden_by_default,
        default_visible,
        name_styles,
        band_groups: vec![
            BandGroup::with_prefix("BB", band_fill),
            BandGroup::with_prefix("BB_Tight", band_fill),
            BandGroup::with_prefix("BB_Wide", band_fill),
        ],
        signal_groups: vec![
            SignalGroup::with_prefix("MACD"),
            SignalGroup::with_prefix("MACD_HF"),
        ],
        cloud_groups: vec![CloudGroup {
            span_a: "Ichimoku_SpanA".to_string(),
            span_b: "Ichimoku_SpanB".to_string(),
            lines: vec![
                "Ichimoku_Tenkan".to_string(),
                "Ichimoku_Kijun".to_string(),
                "Ichimoku_Chikou".to_string(),
            ],
            fill_color: "rgba(0,128,0,0.1)".to_string(),
        }],
        histogram_token: "Histogram".to_string(),
        palette: Palette::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_matching_rules() {
        assert!(member_matches("RSI", "RSI"));
        assert!(member_matches("MACD_Signal", "MACD"));
        assert!(member_matches("Fast_ADX", "ADX"));
        assert!(!member_matches("MACDX", "MACD"));
        assert!(!member_matches("RSI7", "RSI"));
    }

    #[test]
    fn test_prefixes_sorted_longest_first() {
        let config = ChartConfig::standard();
        let lengths: Vec<usize> = config.main_prefixes.iter().map(|(p, _)| p.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn test_visibility_lists() {
        let config = ChartConfig::standard();
        assert!(config.is_hidden_by_default("SMA5"));
        assert!(!config.is_hidden_by_default("SMA20"));
        assert!(config.is_default_visible("MACD_Histogram"));
        assert!(!config.is_default_visible("MACD_HF"));
    }

    #[test]
    fn test_style_merge_keeps_unset_fields() {
        let mut base = StyleOverride::color("blue").with_width(2.0);
        base.merge(&StyleOverride::default().with_dash("dash"));
        assert_eq!(base.color.as_deref(), Some("blue"));
        assert_eq!(base.width, Some(2.0));
        assert_eq!(base.dash.as_deref(), Some("dash"));
    }

    #[test]
    fn test_band_group_order() {
        let band = BandGroup::with_prefix("BB", "rgba(0,0,255,0.1)");
        assert_eq!(band.members(), ["BB_Low", "BB_Mid", "BB_High"]);
    }

    #[test]
    fn test_signal_group_order() {
        let config = ChartConfig::standard();
        let members: Vec<[&str; 3]> = config.signal_groups().iter().map(|g| g.members()).collect();
        assert_eq!(
            members,
            vec![
                ["MACD", "MACD_Signal", "MACD_Histogram"],
                ["MACD_HF", "MACD_HF_Signal", "MACD_HF_Histogram"],
            ]
        );
    }

    #[test]
    fn test_histogram_token() {
        let config = ChartConfig::standard();
        assert!(config.is_histogram("MACD_HF_Histogram"));
        assert!(!config.is_histogram("MACD_Signal"));
    }
}
