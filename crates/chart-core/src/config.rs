//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `CHART__` 접두사 환경 변수 순으로 병합합니다.
//! 예: `CHART__SERVER__PORT=8080`, `CHART__DATA__DATA_DIR=/srv/data`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{LogConfig, LogFormat};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 데이터 소스 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 렌더링 설정
    #[serde(default)]
    pub render: RenderConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// [`LogConfig`]로 변환합니다. 알 수 없는 형식은 pretty로 처리합니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

/// 데이터 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// CSV 데이터 디렉토리
    pub data_dir: PathBuf,
    /// 기본 조회 기간 (1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
    pub default_period: String,
    /// 기본 파라미터 세트
    pub default_parameter_set: String,
    /// 로컬 파일이 없을 때 원격 시세 제공자 사용 여부
    pub remote_fallback: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Data"),
            default_period: "1y".to_string(),
            default_parameter_set: "default".to_string(),
            remote_fallback: false,
        }
    }
}

/// 렌더링 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// 차트 전체 높이 (픽셀)
    pub height: u32,
    /// Plotly 스크립트 URL (HTML 리포트용)
    pub plotly_js_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            height: 800,
            plotly_js_url: "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("data.data_dir", "Data")?
            .set_default("data.default_period", "1y")?
            .set_default("data.default_parameter_set", "default")?
            .set_default("data.remote_fallback", false)?
            .set_default("render.height", 800)?
            .set_default(
                "render.plotly_js_url",
                "https://cdn.plot.ly/plotly-2.35.2.min.js",
            )?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CHART")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.data.default_period, "1y");
        assert_eq!(config.render.height, 800);
        assert!(!config.data.remote_fallback);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join("chart-core-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("app.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[data]\ndata_dir = \"/tmp/market\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/market"));
        assert_eq!(config.data.default_parameter_set, "default");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_logging_config_conversion() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        let log_config = logging.to_log_config();
        assert_eq!(log_config.level, "debug");
        assert_eq!(log_config.format, LogFormat::Json);
    }
}
