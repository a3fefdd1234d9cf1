//! CLI 명령 흐름 통합 테스트

use std::path::PathBuf;

use chart_cli::commands::calculate::{calculate_rows, format_rows, RowFormat};
use chart_cli::commands::input::InputSource;
use chart_cli::commands::render::{render_rows, RenderOptions};
use chart_cli::commands::sample::write_sample;
use chart_core::{DataConfig, ParameterSet, Period, RenderConfig};
use serde_json::Value;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("chart-cli-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn data_config(dir: &PathBuf) -> DataConfig {
    DataConfig {
        data_dir: dir.clone(),
        remote_fallback: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sample_then_render_by_symbol() {
    let dir = scratch_dir("render");
    write_sample(&dir, "NASDAQ", 300, None, Some(15000.0)).unwrap();

    let source = InputSource::Symbol("NASDAQ".into());
    let rows = source.load(&data_config(&dir), Period::SixMonths).await.unwrap();
    assert!(rows.len() < 300);

    let options = RenderOptions {
        parameter_set: ParameterSet::Default,
        period: Period::SixMonths,
        raw: false,
        html: false,
        pretty: true,
        title: None,
        render: RenderConfig::default(),
    };
    let figure: Value = serde_json::from_str(&render_rows(rows, &source.label(), &options).unwrap()).unwrap();
    let panes: Vec<&str> = figure["panes"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert_eq!(panes, vec!["price", "oscillator", "macd", "overlay", "volume"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_calculate_then_render_raw_file() {
    let dir = scratch_dir("raw");
    let sample = write_sample(&dir, "EURUSD", 120, None, Some(1.1)).unwrap();

    let rows = InputSource::File(sample)
        .load(&data_config(&dir), Period::Max)
        .await
        .unwrap();
    let rows = calculate_rows(rows, ParameterSet::Volatility).unwrap();
    let calculated = dir.join("eurusd_indicators.json");
    std::fs::write(&calculated, format_rows(&rows, RowFormat::Json).unwrap()).unwrap();

    let source = InputSource::File(calculated);
    let reloaded = source.load(&data_config(&dir), Period::Max).await.unwrap();
    assert_eq!(reloaded.len(), 120);

    let options = RenderOptions {
        parameter_set: ParameterSet::Volatility,
        period: Period::Max,
        raw: true,
        html: false,
        pretty: false,
        title: None,
        render: RenderConfig::default(),
    };
    let figure: Value = serde_json::from_str(&render_rows(reloaded, &source.label(), &options).unwrap()).unwrap();
    assert_eq!(figure["title"], "eurusd_indicators - Volatility Trading");
    let names: Vec<&str> = figure["traces"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"BB_Tight_Low"));

    let _ = std::fs::remove_dir_all(&dir);
}
