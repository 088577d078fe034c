use crate::domain::model::{InterestConfig, ListInfo, Place};
use crate::domain::ports::VenueSource;
use crate::utils::error::{ExportError, Result};
use indexmap::IndexMap;

/// 取得所有儲存的清單 (預設 + 自訂)，以小寫名稱為鍵
pub async fn resolve_lists<V: VenueSource + ?Sized>(
    source: &V,
) -> Result<IndexMap<String, ListInfo>> {
    let groups = source.user_lists().await?;

    let lists: IndexMap<String, ListInfo> = groups
        .into_iter()
        .flat_map(|group| group.items)
        .map(|list| (list.name.to_lowercase(), list))
        .collect();

    tracing::info!("📋 Found {} lists:", lists.len());
    for name in lists.keys() {
        tracing::info!("  - {}", name);
    }

    Ok(lists)
}

/// 依設定順序抓取每個清單的地點
pub async fn extract_places<V: VenueSource + ?Sized>(
    source: &V,
    lists: &IndexMap<String, ListInfo>,
    interest: &InterestConfig,
) -> Result<Vec<Place>> {
    for name in lists.keys() {
        if !interest.contains(name) {
            tracing::info!("skipping list {}", name);
        }
    }

    // 在發出任何請求前先確認設定的清單都存在
    let mut selected = Vec::with_capacity(interest.len());
    for entry in interest.iter() {
        let list = lists
            .get(entry.name())
            .ok_or_else(|| ExportError::MissingList {
                name: entry.name().to_string(),
            })?;
        selected.push((list, entry.color()));
    }

    let mut places = Vec::new();
    for (list, color) in selected {
        tracing::info!("🔍 Scanning list: {}", list.name);
        let detail = source.list_detail(&list.id).await?;

        // TODO: page through listItems with offset/limit instead of only warning
        if let Some(total) = detail.truncated_count() {
            tracing::warn!(
                "⚠️ List '{}' has {} items but only {} were returned",
                list.name,
                total,
                detail.list_items.items.len()
            );
        }

        let before = places.len();
        places.extend(detail.into_places(&list.name, color));
        tracing::info!("{} items", places.len() - before);
    }

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{InterestEntry, ListDetail, ListGroup};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSource {
        groups: Vec<ListGroup>,
        details: HashMap<String, serde_json::Value>,
        requested: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn new(groups: serde_json::Value) -> Self {
            Self {
                groups: serde_json::from_value(groups).unwrap(),
                details: HashMap::new(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn with_detail(mut self, id: &str, detail: serde_json::Value) -> Self {
            self.details.insert(id.to_string(), detail);
            self
        }
    }

    #[async_trait]
    impl VenueSource for MockSource {
        async fn user_lists(&self) -> Result<Vec<ListGroup>> {
            Ok(self.groups.clone())
        }

        async fn list_detail(&self, list_id: &str) -> Result<ListDetail> {
            self.requested.lock().unwrap().push(list_id.to_string());
            let value = self.details.get(list_id).cloned().unwrap_or_else(|| {
                serde_json::json!({"listItems": {"count": 0, "items": []}})
            });
            Ok(serde_json::from_value(value)?)
        }
    }

    fn groups() -> serde_json::Value {
        serde_json::json!([
            {"type": "created", "items": [
                {"id": "saved", "name": "My Saved Places"},
                {"id": "liked", "name": "My Liked Places"}
            ]},
            {"type": "yours", "items": [
                {"id": "ldn", "name": "London"},
                {"id": "paris", "name": "Paris"}
            ]}
        ])
    }

    fn venue_items(names: &[&str]) -> serde_json::Value {
        let items: Vec<serde_json::Value> = names
            .iter()
            .map(|name| {
                serde_json::json!({"venue": {
                    "name": name,
                    "location": {"lat": 51.5, "lng": -0.1, "address": "Somewhere"}
                }})
            })
            .collect();
        serde_json::json!({"listItems": {"count": names.len(), "items": items}})
    }

    #[tokio::test]
    async fn test_resolve_lists_concatenates_groups() {
        let source = MockSource::new(groups());
        let lists = resolve_lists(&source).await.unwrap();

        let keys: Vec<&str> = lists.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["my saved places", "my liked places", "london", "paris"]
        );
        assert_eq!(lists["london"].id, "ldn");
        assert_eq!(lists["london"].name, "London");
    }

    #[tokio::test]
    async fn test_extract_places_in_configured_order() {
        let source = MockSource::new(groups())
            .with_detail("saved", venue_items(&["Saved A", "Saved B"]))
            .with_detail("ldn", venue_items(&["Big Ben"]));
        let lists = resolve_lists(&source).await.unwrap();
        let interest = InterestConfig::new(vec![
            InterestEntry::new("london", Some("blue")),
            InterestEntry::new("my saved places", Some("red")),
        ])
        .unwrap();

        let places = extract_places(&source, &lists, &interest).await.unwrap();

        let names: Vec<&str> = places.iter().map(|p| p.venue_name.as_str()).collect();
        assert_eq!(names, vec!["Big Ben", "Saved A", "Saved B"]);
        assert_eq!(places[0].list_name, "London");
        assert_eq!(places[0].color.as_deref(), Some("blue"));
        assert_eq!(places[1].color.as_deref(), Some("red"));
        // 未設定的清單 (liked, paris) 不會被請求
        assert_eq!(*source.requested.lock().unwrap(), vec!["ldn", "saved"]);
    }

    #[tokio::test]
    async fn test_missing_interesting_list_fails_before_fetching() {
        let source = MockSource::new(groups());
        let lists = resolve_lists(&source).await.unwrap();
        let interest = InterestConfig::new(vec![
            InterestEntry::new("london", None),
            InterestEntry::new("london-todo", Some("red")),
        ])
        .unwrap();

        let result = extract_places(&source, &lists, &interest).await;

        assert!(matches!(result, Err(ExportError::MissingList { name }) if name == "london-todo"));
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_list_is_still_returned() {
        let source = MockSource::new(groups()).with_detail(
            "ldn",
            serde_json::json!({"listItems": {"count": 500, "items": [
                {"venue": {"name": "Only one", "location": {"lat": 1.0, "lng": 2.0}}}
            ]}}),
        );
        let lists = resolve_lists(&source).await.unwrap();
        let interest = InterestConfig::new(vec![InterestEntry::new("london", None)]).unwrap();

        let places = extract_places(&source, &lists, &interest).await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].address, crate::domain::model::MISSING_ADDRESS);
    }
}
