use crate::adapters::foursquare::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::domain::model::{InterestConfig, InterestEntry};
use crate::render::color::name_to_rgb;
use crate::render::map::MapView;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub map: MapView,
    /// 要輸出的清單，依檔案中的順序
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub token: Option<String>,
    pub base_url: String,
    pub version: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub name: String,
    pub color: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ExportError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FOURSQUARE_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 設定檔中的 token；仍是 `${...}` 佔位字串時視為未設定
    pub fn token(&self) -> Option<&str> {
        self.api
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty() && !is_placeholder(token))
    }

    /// 沒有設定任何清單時使用預設清單
    pub fn interest_config(&self) -> Result<InterestConfig> {
        if self.lists.is_empty() {
            return Ok(InterestConfig::default());
        }
        InterestConfig::new(
            self.lists
                .iter()
                .map(|list| InterestEntry::new(&list.name, list.color.as_deref()))
                .collect(),
        )
    }
}

fn is_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_non_empty_string("api.version", &self.api.version)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;

        validate_range("map.center[0]", self.map.center[0], -90.0, 90.0)?;
        validate_range("map.center[1]", self.map.center[1], -180.0, 180.0)?;
        validate_range("map.zoom", self.map.zoom, 0, 19)?;
        if let Some(link) = &self.map.link {
            validate_url("map.link", link)?;
        }

        for list in &self.lists {
            validate_non_empty_string("lists.name", &list.name)?;
            if let Some(color) = &list.color {
                name_to_rgb(color)?;
            }
        }
        // 重複的清單名稱在這裡被拒絕
        self.interest_config()?;

        Ok(())
    }
}
