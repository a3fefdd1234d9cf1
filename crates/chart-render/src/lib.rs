//! # Chart Render
//!
//! 지표 컬럼이 붙은 가격 행을 다중 페인 Figure 명세로 변환합니다.
//!
//! 처리 단계:
//! - 추출: 가격 열과 지표 열 분리 (`extractor`)
//! - 분류: 지표 이름 → 페인 (`classifier`, `descriptor`)
//! - 트레이스 생성: 스타일, 표시 상태, 묶음 순서 (`trace`)
//! - 레이아웃 조립: 페인 높이 비율, 축, 기준선, 범례 (`layout`)
//!
//! Figure는 JSON으로 직렬화되어 API 응답이나 HTML 리포트(`html`)로 나갑니다.

pub mod classifier;
pub mod descriptor;
pub mod error;
pub mod extractor;
pub mod figure;
pub mod html;
pub mod layout;
pub mod pipeline;
pub mod trace;

pub use descriptor::{
    standard_table, BandGroup, ChartConfig, ChartTable, CloudGroup, IndicatorDescriptor,
    IndicatorKind, NamePattern, Palette, Placement, Resolved, SignalGroup, StyleOverride,
};
pub use error::{RenderError, RenderResult};
pub use extractor::{extract, ExtractedSeries, IndicatorSeries, PriceSeries};
pub use figure::*;
pub use html::{ReportMeta, ReportRenderer};
pub use layout::compose_layout;
pub use pipeline::ChartPipeline;
pub use trace::TraceBuilder;
