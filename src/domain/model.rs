use crate::utils::error::{ExportError, Result};
use serde::Deserialize;
use std::collections::HashSet;

/// 找不到地址時使用的替代字串
pub const MISSING_ADDRESS: &str = "NO ADDRESS!";

/// 使用者儲存的清單 (只保留實際用到的欄位)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListInfo {
    pub id: String,
    pub name: String,
}

/// `users/self/lists` 回應中的一個分組 (預設清單 / 自訂清單)
#[derive(Debug, Clone, Deserialize)]
pub struct ListGroup {
    #[serde(default)]
    pub items: Vec<ListInfo>,
}

/// `lists/{id}` 回應中的清單內容
#[derive(Debug, Clone, Deserialize)]
pub struct ListDetail {
    #[serde(rename = "listItems")]
    pub list_items: ListItems,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListItems {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    /// 清單項目也可能是 tip 或照片，這時沒有 venue
    #[serde(default)]
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "formattedAddress")]
    pub formatted_address: Option<Vec<String>>,
}

impl Location {
    /// 優先使用 formattedAddress，其次 address，最後才用替代字串
    pub fn display_address(&self) -> String {
        if let Some(lines) = &self.formatted_address {
            if !lines.is_empty() {
                return lines.join(" ");
            }
        }
        match &self.address {
            Some(address) if !address.trim().is_empty() => address.clone(),
            _ => MISSING_ADDRESS.to_string(),
        }
    }
}

impl ListDetail {
    /// API 回報的總數比實際回傳的項目多時，代表清單被截斷了 (尚未實作分頁)
    pub fn truncated_count(&self) -> Option<usize> {
        match self.list_items.count {
            Some(total) if total > self.list_items.items.len() => Some(total),
            _ => None,
        }
    }

    /// 將清單內容轉成 Place，只能走訪一次
    pub fn into_places(
        self,
        list_name: &str,
        color: Option<&str>,
    ) -> impl Iterator<Item = Place> {
        let list_name = list_name.to_string();
        let color = color.map(str::to_string);
        self.list_items
            .items
            .into_iter()
            .filter_map(|item| {
                if item.venue.is_none() {
                    tracing::debug!("Skipping list item without a venue");
                }
                item.venue
            })
            .map(move |venue| Place::from_venue(&list_name, venue, color.clone()))
    }
}

/// 一個清單中的一個地點，建立後不再變動
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub list_name: String,
    pub venue_name: String,
    pub address: String,
    pub color: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub fn from_venue(list_name: &str, venue: Venue, color: Option<String>) -> Self {
        Self {
            list_name: list_name.to_string(),
            address: venue.location.display_address(),
            venue_name: venue.name,
            color,
            lat: venue.location.lat,
            lng: venue.location.lng,
        }
    }

    pub fn list_key(&self) -> String {
        self.list_name.to_lowercase()
    }

    pub fn description(&self) -> String {
        format!(
            "{}\n{}\nList: {}",
            self.venue_name, self.address, self.list_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestEntry {
    name: String,
    color: Option<String>,
}

impl InterestEntry {
    pub fn new(name: &str, color: Option<&str>) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            color: color.map(|c| c.trim().to_lowercase()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

/// 要輸出的清單以及對應顏色；順序決定資料夾與圖例的順序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestConfig {
    entries: Vec<InterestEntry>,
}

impl InterestConfig {
    pub fn new(entries: Vec<InterestEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.is_empty() {
                return Err(ExportError::InvalidConfigValueError {
                    field: "lists.name".to_string(),
                    value: entry.name.clone(),
                    reason: "List name cannot be empty".to_string(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ExportError::InvalidConfigValueError {
                    field: "lists.name".to_string(),
                    value: entry.name.clone(),
                    reason: "List is configured more than once".to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterestEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&InterestEntry> {
        self.entries.iter().find(|entry| entry.name == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 依設定順序列出不重複的顏色
    pub fn colors(&self) -> Vec<&str> {
        let mut colors: Vec<&str> = Vec::new();
        for color in self.entries.iter().filter_map(InterestEntry::color) {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
        colors
    }
}

impl Default for InterestConfig {
    fn default() -> Self {
        Self {
            entries: vec![
                InterestEntry::new("my saved places", Some("red")),
                InterestEntry::new("my liked places", Some("pink")),
                InterestEntry::new("london-food", None),
                InterestEntry::new("london", Some("blue")),
                InterestEntry::new("london-todo", Some("red")),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Kml,
    Map,
    Csv,
}

impl OutputFormat {
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Kml => "KML",
            OutputFormat::Map => "interactive map",
            OutputFormat::Csv => "CSV",
        }
    }
}

/// 已完整產生於記憶體中的輸出，等待寫入
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub format: OutputFormat,
    pub contents: String,
    pub place_count: usize,
}
