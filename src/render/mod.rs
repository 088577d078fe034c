pub mod color;
pub mod csv;
pub mod kml;
pub mod map;

use crate::domain::model::{InterestConfig, Place};
use indexmap::IndexMap;

/// 同一個清單的地點
#[derive(Debug)]
pub struct PlaceGroup<'a> {
    pub name: String,
    pub configured_color: Option<String>,
    pub places: Vec<&'a Place>,
}

impl PlaceGroup<'_> {
    /// 顏色以清單為單位指定，因此取第一個地點的顏色
    pub fn color(&self) -> Option<&str> {
        match self.places.first() {
            Some(place) => place.color.as_deref(),
            None => self.configured_color.as_deref(),
        }
    }
}

/// 依設定順序分組；沒有地點的清單也會產生空的分組，
/// 未設定的清單依出現順序排在最後
pub fn group_places<'a>(places: &'a [Place], interest: &InterestConfig) -> Vec<PlaceGroup<'a>> {
    let mut groups: IndexMap<String, PlaceGroup<'a>> = interest
        .iter()
        .map(|entry| {
            (
                entry.name().to_string(),
                PlaceGroup {
                    name: entry.name().to_string(),
                    configured_color: entry.color().map(str::to_string),
                    places: Vec::new(),
                },
            )
        })
        .collect();

    for place in places {
        let group = groups.entry(place.list_key()).or_insert_with(|| PlaceGroup {
            name: place.list_name.clone(),
            configured_color: place.color.clone(),
            places: Vec::new(),
        });
        if group.places.is_empty() {
            // 資料夾名稱使用清單原本的顯示名稱
            group.name = place.list_name.clone();
        }
        group.places.push(place);
    }

    groups.into_values().collect()
}
