//! 차트 대시보드 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 데이터 디렉터리의 GOLD 파일로 Figure JSON 생성
//! chartdash render -s GOLD -p ichimoku --period 6mo -o Charts/gold.json
//!
//! # CSV 파일로 HTML 리포트 생성
//! chartdash render -i Data/EURUSD_20240301.csv --html -o Reports/eurusd.html
//!
//! # 지표 열 계산 후 CSV로 저장
//! chartdash calculate -s OIL -p volatility -o out/oil.csv
//!
//! # 지표 이름이 어느 페인에 그려지는지 확인
//! chartdash classify SMA20 RSI7 MACD_HF_Histogram BB_Wide_Low
//!
//! # 파라미터 세트 / 자산 목록
//! chartdash parameters
//! chartdash assets -c forex
//!
//! # 데모용 샘플 파일 생성
//! chartdash sample -s GOLD --days 500 --price 1900
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use chart_cli::commands::calculate::{calculate_rows, format_rows, RowFormat};
use chart_cli::commands::catalog::{format_assets, format_parameters};
use chart_cli::commands::classify::{classify_names, format_table};
use chart_cli::commands::input::{write_output, InputSource};
use chart_cli::commands::render::{render_rows, RenderOptions};
use chart_cli::commands::sample::write_sample;
use chart_core::{init_logging, parse_date_str, AppConfig, AssetCategory, ParameterSet, Period};
use chart_render::ChartConfig;

#[derive(Parser)]
#[command(name = "chartdash")]
#[command(about = "Charting dashboard CLI - 기술적 지표 차트 생성 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 기본값과 CHART__ 환경 변수만 사용)
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 가격 행을 Figure JSON 또는 HTML 리포트로 렌더링
    Render {
        /// 입력 파일 (CSV 또는 JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 데이터 디렉터리의 심볼 (예: GOLD, EURUSD)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 파라미터 세트 (기본: 설정값)
        #[arg(short, long)]
        parameter_set: Option<String>,

        /// 조회 기간 (1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
        #[arg(long)]
        period: Option<String>,

        /// 입력의 지표 열을 그대로 사용 (계산 생략)
        #[arg(long, default_value = "false")]
        raw: bool,

        /// HTML 리포트로 출력
        #[arg(long, default_value = "false")]
        html: bool,

        /// 들여쓰기된 JSON
        #[arg(long, default_value = "false")]
        pretty: bool,

        /// 차트 제목
        #[arg(short, long)]
        title: Option<String>,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 지표 열을 계산하여 CSV/JSON으로 내보내기
    Calculate {
        /// 입력 파일 (CSV 또는 JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 데이터 디렉터리의 심볼
        #[arg(short, long)]
        symbol: Option<String>,

        /// 파라미터 세트 (기본: 설정값)
        #[arg(short, long)]
        parameter_set: Option<String>,

        /// 조회 기간
        #[arg(long)]
        period: Option<String>,

        /// 출력 형식 (csv, json). 생략하면 출력 파일 확장자로 결정
        #[arg(short, long)]
        format: Option<String>,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 지표 이름이 배치될 페인 조회
    Classify {
        /// 지표 이름
        #[arg(required = true)]
        names: Vec<String>,

        /// JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 파라미터 세트 목록
    Parameters,

    /// 자산 카탈로그
    Assets {
        /// 자산 유형 (forex, commodities, indices)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// 데모용 샘플 데이터 파일 생성
    Sample {
        /// 심볼
        #[arg(short, long)]
        symbol: String,

        /// 거래일 수
        #[arg(long, default_value = "260")]
        days: usize,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// 시작 가격
        #[arg(long)]
        price: Option<f64>,

        /// 저장 디렉터리 (기본: 설정의 data_dir)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn resolve_query(
    config: &AppConfig,
    parameter_set: Option<String>,
    period: Option<String>,
) -> Result<(ParameterSet, Period)> {
    let parameter_set = parameter_set
        .as_deref()
        .unwrap_or(&config.data.default_parameter_set)
        .parse()?;
    let period = period
        .as_deref()
        .unwrap_or(&config.data.default_period)
        .parse()?;
    Ok((parameter_set, period))
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Render {
            input,
            symbol,
            parameter_set,
            period,
            raw,
            html,
            pretty,
            title,
            output,
        } => {
            let source = InputSource::from_args(input, symbol)?;
            let (parameter_set, period) = resolve_query(&config, parameter_set, period)?;
            let rows = source.load(&config.data, period).await?;

            let options = RenderOptions {
                parameter_set,
                period,
                raw,
                html,
                pretty,
                title,
                render: config.render.clone(),
            };
            let content = render_rows(rows, &source.label(), &options)?;
            write_output(output.as_deref(), &content)?;
        }

        Commands::Calculate {
            input,
            symbol,
            parameter_set,
            period,
            format,
            output,
        } => {
            let source = InputSource::from_args(input, symbol)?;
            let (parameter_set, period) = resolve_query(&config, parameter_set, period)?;
            let format = RowFormat::resolve(format.as_deref(), output.as_deref())?;

            let rows = source.load(&config.data, period).await?;
            let rows = calculate_rows(rows, parameter_set)?;
            write_output(output.as_deref(), &format_rows(&rows, format)?)?;
        }

        Commands::Classify { names, json } => {
            let chart = ChartConfig::standard();
            let results = classify_names(&chart, &names);
            let content = if json {
                serde_json::to_string_pretty(&results)?
            } else {
                format_table(&results)
            };
            write_output(None, &content)?;
        }

        Commands::Parameters => {
            write_output(None, &format_parameters())?;
        }

        Commands::Assets { category } => {
            let category = category
                .as_deref()
                .map(str::parse::<AssetCategory>)
                .transpose()?;
            write_output(None, &format_assets(category))?;
        }

        Commands::Sample {
            symbol,
            days,
            start,
            price,
            data_dir,
        } => {
            let start = start
                .as_deref()
                .map(|raw| parse_date_str(raw).map(|dt| dt.date()))
                .transpose()?;
            let data_dir = data_dir.unwrap_or_else(|| config.data.data_dir.clone());
            let path = write_sample(&data_dir, &symbol, days, start, price)?;
            println!("샘플 데이터 저장: {}", path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    // stdout은 명령 출력용
    init_logging(config.logging.to_log_config().with_stderr(true))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
