pub mod cli;
pub mod toml_config;

use crate::domain::model::{InterestConfig, OutputFormat};
use crate::domain::ports::ConfigProvider;
use crate::render::map::MapView;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::{ArgGroup, Parser};
use std::path::Path;
use std::time::Duration;
use toml_config::{ApiConfig, TomlConfig};

pub const DEFAULT_CONFIG_FILE: &str = "venue-maps.toml";
pub const TOKEN_ENV_VAR: &str = "FOURSQUARE_TOKEN";

#[derive(Debug, Clone, Parser)]
#[command(name = "venue-maps")]
#[command(about = "Export saved Foursquare lists as KML, an interactive map or CSV")]
#[command(group(
    ArgGroup::new("output")
        .required(true)
        .multiple(false)
        .args(["kml", "map", "csv"])
))]
pub struct CliConfig {
    /// Write a KML document to this path
    #[arg(long, value_name = "PATH")]
    pub kml: Option<String>,

    /// Write an interactive HTML map to this path
    #[arg(long, value_name = "PATH")]
    pub map: Option<String>,

    /// Write a CSV export to this path
    #[arg(long, value_name = "PATH")]
    pub csv: Option<String>,

    /// Path to TOML configuration file (defaults to ./venue-maps.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// Foursquare OAuth token, overrides the config file
    #[arg(long)]
    pub token: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 取得唯一的輸出格式與路徑
    pub fn output_target(&self) -> Result<(OutputFormat, &str)> {
        let targets: Vec<(OutputFormat, &str)> = [
            (OutputFormat::Kml, self.kml.as_deref()),
            (OutputFormat::Map, self.map.as_deref()),
            (OutputFormat::Csv, self.csv.as_deref()),
        ]
        .into_iter()
        .filter_map(|(format, path)| path.map(|path| (format, path)))
        .collect();

        match targets.as_slice() {
            [target] => Ok(*target),
            [] => Err(ExportError::MissingConfigError {
                field: "--kml, --map or --csv".to_string(),
            }),
            _ => Err(ExportError::ConfigError {
                message: "Only one of --kml, --map or --csv may be given".to_string(),
            }),
        }
    }

    /// 載入設定檔；明確指定的檔案必須存在，預設檔案不存在時使用內建設定
    pub fn load_file_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                TomlConfig::from_file(DEFAULT_CONFIG_FILE)
            }
            None => {
                tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                Ok(TomlConfig::default())
            }
        }
    }
}

/// 合併命令列與設定檔後的執行設定
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub format: OutputFormat,
    pub output_path: String,
    pub token: String,
    pub api: ApiConfig,
    pub map: MapView,
    pub interest: InterestConfig,
}

impl ExportConfig {
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let file = cli.load_file_config()?;
        Self::resolve(cli, file, std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// token 優先順序：命令列、設定檔、環境變數
    pub fn resolve(cli: &CliConfig, file: TomlConfig, env_token: Option<String>) -> Result<Self> {
        file.validate()?;
        let (format, output_path) = cli.output_target()?;

        let token = cli
            .token
            .clone()
            .or_else(|| file.token().map(str::to_string))
            .or(env_token)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ExportError::MissingConfigError {
                field: format!("api.token (or --token / {})", TOKEN_ENV_VAR),
            })?;

        let interest = file.interest_config()?;
        Ok(Self {
            format,
            output_path: output_path.to_string(),
            token,
            api: file.api,
            map: file.map,
            interest,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output path", &self.output_path)?;
        validate_non_empty_string("api.token", &self.token)?;
        if self.interest.is_empty() {
            return Err(ExportError::MissingConfigError {
                field: "lists".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for ExportConfig {
    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn interest(&self) -> &InterestConfig {
        &self.interest
    }

    fn map_view(&self) -> &MapView {
        &self.map
    }
}
