//! 단일 파일 HTML 리포트.
//!
//! Figure JSON을 Plotly 스크립트에 그대로 넘기고, 그 아래에 최신 판독값과
//! 추세 신호 표를 붙입니다.

use chart_analytics::{latest_readings, trend_signals, ReadingSection};
use chart_core::{ParameterSet, Period, PriceRow};
use minijinja::{context, Environment};
use serde::Serialize;
use tracing::debug;

use crate::error::RenderResult;
use crate::figure::FigureSpec;

const TEMPLATE_NAME: &str = "report.html";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>{{ title }}</title>
    <script src="{{ plotly_js_url }}"></script>
    <style>
      body { font-family: sans-serif; margin: 24px; }
      table { border-collapse: collapse; margin-bottom: 16px; }
      td { padding: 2px 12px; border-bottom: 1px solid #ddd; }
      .bullish { color: green; }
      .bearish { color: red; }
    </style>
  </head>
  <body>
    <h1>{{ title }}</h1>
    <p>{{ parameter_title }} · {{ period }}{% if as_of %} · {{ as_of }}{% endif %}</p>
    <div id="chart"></div>
    {%- if signals %}
    <h2>Trend</h2>
    <table>
      <tr><td>Short term</td><td class="{{ signals.short_term|lower }}">{{ signals.short_term }}</td></tr>
      <tr><td>Long term</td><td class="{{ signals.long_term|lower }}">{{ signals.long_term }}</td></tr>
    </table>
    {%- endif %}
    {%- for section in sections %}
    <h2>{{ section.title }}</h2>
    <table>
      {%- for point in section.data_points %}
      <tr><td>{{ point.name }}</td><td>{{ point.value }}</td></tr>
      {%- endfor %}
    </table>
    {%- endfor %}
    <script>
      const figure = {{ figure_json|safe }};
      Plotly.newPlot("chart", figure.traces, figure.layout, { responsive: true });
    </script>
  </body>
</html>
"#;

/// 리포트 머리말 정보.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub symbol: String,
    pub parameter_set: ParameterSet,
    pub period: Period,
}

#[derive(Serialize)]
struct SignalLabels {
    short_term: &'static str,
    long_term: &'static str,
}

/// HTML 리포트 렌더러. 템플릿은 생성 시 한 번 컴파일됩니다.
pub struct ReportRenderer {
    env: Environment<'static>,
    plotly_js_url: String,
}

impl ReportRenderer {
    pub fn new(plotly_js_url: impl Into<String>) -> RenderResult<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self {
            env,
            plotly_js_url: plotly_js_url.into(),
        })
    }

    /// Figure와 행으로 리포트를 생성합니다.
    pub fn render(&self, figure: &FigureSpec, rows: &[PriceRow], meta: &ReportMeta) -> RenderResult<String> {
        let figure_json = embed_json(&figure.to_json()?);

        let readings = latest_readings(rows);
        let sections: Vec<&ReadingSection> = readings
            .as_ref()
            .map(|r| r.sections().to_vec())
            .unwrap_or_default();
        let signals = trend_signals(rows).map(|s| SignalLabels {
            short_term: s.short_term.label(),
            long_term: s.long_term.label(),
        });
        let as_of = rows.last().map(PriceRow::date_label);

        let template = self.env.get_template(TEMPLATE_NAME)?;
        let html = template.render(context! {
            title => figure.title,
            plotly_js_url => self.plotly_js_url,
            parameter_title => meta.parameter_set.title(),
            period => meta.period.to_string(),
            as_of => as_of,
            signals => signals,
            sections => sections,
            figure_json => figure_json,
        })?;

        debug!(symbol = %meta.symbol, bytes = html.len(), "리포트 생성");
        Ok(html)
    }
}

/// `<script>` 안에 넣을 수 있도록 닫는 태그 시퀀스를 끊습니다.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
