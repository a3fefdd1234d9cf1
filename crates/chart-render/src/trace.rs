//! 스타일이 적용된 트레이스 생성.
//!
//! 규칙 적용 순서 (뒤가 앞을 덮어씀):
//! 1. 기본값: 선, 두께 1, 숨김 목록에 없으면 표시
//! 2. 기본 표시 그룹은 숨김 목록과 무관하게 표시
//! 3. 히스토그램 토큰을 포함하면 부호별 색상의 막대
//! 4. 이름별 스타일 (색상, 두께, 대시, 채우기)
//! 5. 밴드/시그널/구름대 묶음의 그리기 순서와 채우기

use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::{ChartConfig, IndicatorDescriptor, StyleOverride};
use crate::extractor::PriceSeries;
use crate::figure::{
    DisplayType, LineStyle, MarkerColor, MarkerStyle, PaneId, Trace, Visibility,
};

const DEFAULT_LINE_WIDTH: f64 = 1.0;
const MARKER_SIZE: f64 = 4.0;

/// 묶음 규칙에 따른 채우기.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFill {
    pub fill: String,
    pub fillcolor: String,
}

impl GroupFill {
    fn to_previous(color: &str) -> Self {
        Self {
            fill: "tonexty".to_string(),
            fillcolor: color.to_string(),
        }
    }
}

/// 한 페인에 배치될 지표.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneEntry<'s> {
    pub name: &'s str,
    pub values: &'s [Option<f64>],
    /// 디스크립터 선언 순서
    pub index: usize,
}

/// 트레이스 생성기.
pub struct TraceBuilder<'a> {
    config: &'a ChartConfig,
    dates: &'a [String],
}

impl<'a> TraceBuilder<'a> {
    pub fn new(config: &'a ChartConfig, dates: &'a [String]) -> Self {
        Self { config, dates }
    }

    /// 가격 트레이스: OHLC가 모두 있으면 캔들스틱, 종가만 있으면 선.
    pub fn price_trace(&self, price: &PriceSeries) -> Option<Trace> {
        if price.has_ohlc() {
            let trace = Trace::candlestick(
                "Price",
                self.dates.to_vec(),
                price.open.clone(),
                price.high.clone(),
                price.low.clone(),
                price.close.clone(),
            );
            return Some(trace.with_legend_group("price"));
        }

        if price.has_close() {
            let trace = Trace::series(
                "Close",
                DisplayType::Line,
                PaneId::Price,
                self.dates.to_vec(),
                price.close.clone(),
            )
            .with_line(LineStyle {
                color: Some(self.config.palette().close_line.clone()),
                width: DEFAULT_LINE_WIDTH,
                dash: None,
            })
            .with_legend_group("price");
            return Some(trace);
        }

        None
    }

    /// 거래량 막대. 양수 거래량이 없으면 생략합니다.
    pub fn volume_trace(&self, price: &PriceSeries) -> Option<Trace> {
        if !price.has_volume() {
            return None;
        }
        let trace = Trace::series(
            "Volume",
            DisplayType::Bar,
            PaneId::Volume,
            self.dates.to_vec(),
            price.volume.clone(),
        )
        .with_marker(MarkerStyle {
            color: MarkerColor::Single(self.config.palette().volume_bar.clone()),
            size: None,
        })
        .with_legend_group("volume");
        Some(trace)
    }

    /// 지표 트레이스. 유한한 값이 없으면 `None`.
    pub fn build(
        &self,
        name: &str,
        values: &[Option<f64>],
        pane: PaneId,
        descriptor: Option<&IndicatorDescriptor>,
    ) -> Option<Trace> {
        let y: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        if y.iter().all(Option::is_none) {
            return None;
        }

        let mut style = StyleOverride {
            width: Some(DEFAULT_LINE_WIDTH),
            ..Default::default()
        };
        if let Some(descriptor) = descriptor {
            style.merge(&descriptor.style);
        }
        if let Some(named) = self.config.name_style(name) {
            style.merge(named);
        }

        let histogram = self.config.is_histogram(name);
        let display = if histogram {
            DisplayType::Bar
        } else {
            style.display.unwrap_or(DisplayType::Line)
        };

        // 히스토그램은 결측 위치도 높이 0의 투명 막대로 채움
        let (y, bar_colors) = if histogram {
            let colors = self.sign_colors(&y);
            let filled: Vec<Option<f64>> = y.iter().map(|v| Some(v.unwrap_or(0.0))).collect();
            (filled, Some(colors))
        } else {
            (y, None)
        };

        let legend_group = descriptor
            .map(|d| d.legend_group.clone())
            .unwrap_or_else(|| name.to_string());

        let mut trace = Trace::series(name, display, pane, self.dates.to_vec(), y)
            .with_legend_group(legend_group)
            .with_visibility(self.visibility(name, descriptor));

        match display {
            DisplayType::Bar if histogram => {
                trace.marker = Some(MarkerStyle {
                    color: MarkerColor::PerPoint(bar_colors.unwrap_or_default()),
                    size: None,
                });
            }
            DisplayType::Bar => {
                if let Some(color) = &style.color {
                    trace.marker = Some(MarkerStyle {
                        color: MarkerColor::Single(color.clone()),
                        size: None,
                    });
                }
            }
            DisplayType::Markers => {
                trace.marker = Some(MarkerStyle {
                    color: MarkerColor::Single(
                        style.color.clone().unwrap_or_else(|| "blue".to_string()),
                    ),
                    size: Some(MARKER_SIZE),
                });
            }
            DisplayType::Line | DisplayType::Candlestick => {
                trace.line = Some(LineStyle {
                    color: style.color.clone(),
                    width: style.width.unwrap_or(DEFAULT_LINE_WIDTH),
                    dash: style.dash.clone(),
                });
            }
        }
        trace.fill = style.fill;
        trace.fillcolor = style.fillcolor;

        Some(trace)
    }

    fn visibility(&self, name: &str, descriptor: Option<&IndicatorDescriptor>) -> Visibility {
        let shown = descriptor.map_or(true, |d| d.default_visible)
            && !self.config.is_hidden_by_default(name);
        if shown || self.config.is_default_visible(name) {
            Visibility::Visible
        } else {
            Visibility::LegendOnly
        }
    }

    /// 0 이상은 양수 색, 음수는 음수 색, 결측은 투명.
    fn sign_colors(&self, values: &[Option<f64>]) -> Vec<String> {
        let palette = self.config.palette();
        values
            .iter()
            .map(|v| match v {
                Some(x) if *x >= 0.0 => palette.histogram_positive.clone(),
                Some(_) => palette.histogram_negative.clone(),
                None => palette.transparent.clone(),
            })
            .collect()
    }
}

/// 페인 안의 그리기 순서를 정합니다.
///
/// (디스크립터 선언 순서, 이름) 순으로 정렬한 뒤,
/// 묶음은 첫 멤버 위치에서 묶음 순서대로 한꺼번에 배치합니다.
pub fn arrange<'s>(
    config: &ChartConfig,
    mut entries: Vec<PaneEntry<'s>>,
) -> Vec<(PaneEntry<'s>, Option<GroupFill>)> {
    entries.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(b.name)));

    let by_name: BTreeMap<&str, PaneEntry<'s>> =
        entries.iter().map(|entry| (entry.name, *entry)).collect();
    let mut emitted: BTreeSet<&str> = BTreeSet::new();
    let mut ordered = Vec::with_capacity(entries.len());

    for entry in &entries {
        if emitted.contains(entry.name) {
            continue;
        }

        let group = group_members(config, entry.name);
        match group {
            Some(members) => {
                for (member, fill) in members {
                    if let Some(found) = by_name.get(member.as_str()) {
                        if emitted.insert(found.name) {
                            ordered.push((*found, fill));
                        }
                    }
                }
            }
            None => {
                emitted.insert(entry.name);
                ordered.push((*entry, None));
            }
        }
    }

    ordered
}

/// 이름이 속한 묶음의 멤버와 채우기 규칙.
fn group_members(config: &ChartConfig, name: &str) -> Option<Vec<(String, Option<GroupFill>)>> {
    if let Some(band) = config
        .band_groups()
        .iter()
        .find(|band| band.members().contains(&name))
    {
        return Some(vec![
            (band.low.clone(), Some(GroupFill::to_previous(&band.fill_color))),
            (band.mid.clone(), None),
            (band.high.clone(), None),
        ]);
    }

    if let Some(signal) = config
        .signal_groups()
        .iter()
        .find(|signal| signal.members().contains(&name))
    {
        return Some(
            signal
                .members()
                .iter()
                .map(|member| (member.to_string(), None))
                .collect(),
        );
    }

    if let Some(cloud) = config
        .cloud_groups()
        .iter()
        .find(|cloud| cloud.members().contains(&name))
    {
        let mut members = vec![
            (cloud.span_a.clone(), None),
            (cloud.span_b.clone(), Some(GroupFill::to_previous(&cloud.fill_color))),
        ];
        members.extend(cloud.lines.iter().map(|line| (line.clone(), None)));
        return Some(members);
    }

    None
}
