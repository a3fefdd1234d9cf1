//! 행 → Figure 변환 파이프라인.
//!
//! 추출 → 분류 → 트레이스 생성 → 레이아웃 조립 순서로 진행되며
//! 같은 입력에는 항상 같은 Figure를 돌려줍니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use chart_core::PriceRow;
use tracing::{debug, info_span};

use crate::descriptor::ChartConfig;
use crate::extractor::extract;
use crate::figure::{FigureSpec, PaneId, Trace};
use crate::layout::compose_layout;
use crate::trace::{arrange, PaneEntry, TraceBuilder};

/// 차트 파이프라인. 설정은 불변이며 여러 요청에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct ChartPipeline {
    config: Arc<ChartConfig>,
}

impl ChartPipeline {
    pub fn new(config: Arc<ChartConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// 빈 Figure (트레이스, 페인 없음).
    pub fn empty_figure(&self, title: &str) -> FigureSpec {
        let (panes, layout) = compose_layout(&[], self.config.height(), title);
        FigureSpec {
            title: title.to_string(),
            traces: Vec::new(),
            panes,
            layout,
        }
    }

    /// 행 목록을 Figure로 변환합니다.
    pub fn render(&self, rows: &[PriceRow], title: &str) -> FigureSpec {
        let span = info_span!("render_figure", title = %title, rows = rows.len());
        let _guard = span.enter();

        let extracted = extract(rows);
        if extracted.is_empty() {
            debug!("입력 행 없음");
            return self.empty_figure(title);
        }

        let config = self.config.as_ref();
        let builder = TraceBuilder::new(config, &extracted.dates);

        let mut by_pane: BTreeMap<PaneId, Vec<PaneEntry<'_>>> = BTreeMap::new();
        for series in &extracted.indicators {
            match config.resolve(&series.name) {
                Some(resolved) => by_pane.entry(resolved.pane).or_default().push(PaneEntry {
                    name: &series.name,
                    values: &series.values,
                    index: resolved.index,
                }),
                None => debug!(indicator = %series.name, "분류되지 않은 지표 제외"),
            }
        }

        let mut pane_traces: BTreeMap<PaneId, Vec<Trace>> = BTreeMap::new();
        if let Some(price) = builder.price_trace(&extracted.price) {
            pane_traces.entry(PaneId::Price).or_default().push(price);
        }
        if let Some(volume) = builder.volume_trace(&extracted.price) {
            pane_traces.entry(PaneId::Volume).or_default().push(volume);
        }

        for (pane, entries) in by_pane {
            for (entry, group_fill) in arrange(config, entries) {
                let descriptor = config.descriptor(entry.index);
                let Some(mut trace) = builder.build(entry.name, entry.values, pane, descriptor)
                else {
                    continue;
                };
                if let Some(group_fill) = group_fill {
                    trace.fill = Some(group_fill.fill);
                    trace.fillcolor = Some(group_fill.fillcolor);
                }
                pane_traces.entry(pane).or_default().push(trace);
            }
        }

        pane_traces.retain(|_, traces| !traces.is_empty());
        if pane_traces.is_empty() {
            debug!("그릴 트레이스 없음");
            return self.empty_figure(title);
        }

        // BTreeMap 순서 = PaneId 선언 순서 = 위에서 아래
        let used: Vec<PaneId> = pane_traces.keys().copied().collect();
        let (panes, layout) = compose_layout(&used, config.height(), title);

        let mut traces = Vec::new();
        for (pane_spec, (_, pane_group)) in panes.iter().zip(pane_traces) {
            traces.extend(pane_group.into_iter().map(|mut trace| {
                trace.yaxis = pane_spec.yaxis.clone();
                trace
            }));
        }

        debug!(traces = traces.len(), panes = panes.len(), "Figure 생성 완료");

        FigureSpec {
            title: title.to_string(),
            traces,
            panes,
            layout,
        }
    }
}

impl Default for ChartPipeline {
    fn default() -> Self {
        Self::new(Arc::new(ChartConfig::standard()))
    }
}
