//! Figure JSON / HTML 리포트 생성.

use std::sync::Arc;

use anyhow::Result;
use chart_analytics::IndicatorCalculator;
use chart_core::{ParameterSet, Period, PriceRow, RenderConfig};
use chart_render::{ChartConfig, ChartPipeline, ReportMeta, ReportRenderer};
use tracing::{info, info_span};

/// 렌더 설정.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub parameter_set: ParameterSet,
    pub period: Period,
    /// 입력에 이미 지표 열이 있으면 계산을 건너뜀
    pub raw: bool,
    /// HTML 리포트로 출력
    pub html: bool,
    pub pretty: bool,
    pub title: Option<String>,
    pub render: RenderConfig,
}

/// 행을 Figure JSON 또는 HTML 리포트 문자열로 변환합니다.
pub fn render_rows(rows: Vec<PriceRow>, label: &str, options: &RenderOptions) -> Result<String> {
    let _span = info_span!("render", source = %label, parameter_set = %options.parameter_set).entered();

    let rows = if options.raw {
        rows
    } else {
        IndicatorCalculator::new().calculate(rows, options.parameter_set)?
    };

    let config = ChartConfig::standard().with_height(options.render.height);
    let pipeline = ChartPipeline::new(Arc::new(config));
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| format!("{} - {}", label, options.parameter_set.title()));
    let figure = pipeline.render(&rows, &title);
    info!(traces = figure.traces.len(), panes = figure.panes.len(), "Figure 생성");

    if options.html {
        let renderer = ReportRenderer::new(options.render.plotly_js_url.clone())?;
        let meta = ReportMeta {
            symbol: label.to_string(),
            parameter_set: options.parameter_set,
            period: options.period,
        };
        return Ok(renderer.render(&figure, &rows, &meta)?);
    }

    let json = if options.pretty {
        serde_json::to_string_pretty(&figure)?
    } else {
        figure.to_json()?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_data::SampleSeries;
    use serde_json::Value;

    fn options() -> RenderOptions {
        RenderOptions {
            parameter_set: ParameterSet::Momentum,
            period: Period::Max,
            raw: false,
            html: false,
            pretty: false,
            title: None,
            render: RenderConfig::default(),
        }
    }

    #[test]
    fn test_render_figure_json() {
        let rows = SampleSeries::for_symbol("OIL", 120).generate();
        let json = render_rows(rows, "OIL", &options()).unwrap();
        let figure: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(figure["title"], "OIL - Momentum Validation");
        assert_eq!(figure["traces"][0]["name"], "Price");
        assert_eq!(figure["layout"]["height"], 800);
    }

    #[test]
    fn test_raw_rows_skip_calculation() {
        let rows = SampleSeries::for_symbol("OIL", 30).generate();
        let options = RenderOptions {
            raw: true,
            ..options()
        };
        let figure: Value = serde_json::from_str(&render_rows(rows, "OIL", &options).unwrap()).unwrap();
        let names: Vec<&str> = figure["traces"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Price", "Volume"]);
    }

    #[test]
    fn test_render_html_report() {
        let rows = SampleSeries::for_symbol("GOLD", 120).generate();
        let options = RenderOptions {
            html: true,
            title: Some("Gold daily".into()),
            ..options()
        };
        let html = render_rows(rows, "GOLD", &options).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Gold daily</title>"));
    }
}
