use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;
use venue_maps::config::toml_config::ApiConfig;
use venue_maps::domain::model::{InterestConfig, InterestEntry, OutputFormat};
use venue_maps::render::map::MapView;
use venue_maps::{ExportConfig, ExportEngine, ExportError, ExportPipeline, FoursquareClient, LocalStorage};

const TOKEN: &str = "secret-token";
const VERSION: &str = "20190425";

async fn mock_lists(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/self/lists")
                .query_param("oauth_token", TOKEN)
                .query_param("v", VERSION);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "meta": {"code": 200},
                    "response": {"lists": {"groups": [
                        {"type": "created", "count": 2, "items": [
                            {"id": "saved-id", "name": "My Saved Places"},
                            {"id": "liked-id", "name": "My Liked Places"}
                        ]},
                        {"type": "yours", "count": 2, "items": [
                            {"id": "london-id", "name": "London"},
                            {"id": "food-id", "name": "london-food"}
                        ]}
                    ]}}
                }));
        })
        .await
}

async fn mock_list<'a>(
    server: &'a MockServer,
    id: &str,
    items: serde_json::Value,
) -> httpmock::Mock<'a> {
    let path = format!("/lists/{}", id);
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(path)
                .query_param("oauth_token", TOKEN);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "meta": {"code": 200},
                    "response": {"list": {"id": id, "listItems": items}}
                }));
        })
        .await
}

fn venue(name: &str, lat: f64, lng: f64, address: Option<&str>) -> serde_json::Value {
    let mut location = serde_json::json!({"lat": lat, "lng": lng});
    if let Some(address) = address {
        location["formattedAddress"] = serde_json::json!([address, "UK"]);
    }
    serde_json::json!({"venue": {"id": name, "name": name, "location": location}})
}

fn interest() -> InterestConfig {
    InterestConfig::new(vec![
        InterestEntry::new("london", Some("blue")),
        InterestEntry::new("london-food", None),
        InterestEntry::new("my saved places", Some("red")),
    ])
    .unwrap()
}

fn export_config(server: &MockServer, format: OutputFormat, output_path: String) -> ExportConfig {
    ExportConfig {
        format,
        output_path,
        token: TOKEN.to_string(),
        api: ApiConfig {
            token: None,
            base_url: server.base_url(),
            version: VERSION.to_string(),
            timeout_seconds: 5,
        },
        map: MapView::default(),
        interest: interest(),
    }
}

async fn run_export(server: &MockServer, format: OutputFormat, output_path: String) -> venue_maps::Result<String> {
    let config = export_config(server, format, output_path);
    let source = FoursquareClient::new(
        &config.api.base_url,
        &config.token,
        &config.api.version,
        Duration::from_secs(5),
    )?;
    let pipeline = ExportPipeline::new(source, LocalStorage::default(), config);
    ExportEngine::new(pipeline).run().await
}

async fn mock_all_lists(server: &MockServer) -> Vec<httpmock::Mock<'_>> {
    vec![
        mock_lists(server).await,
        mock_list(
            server,
            "london-id",
            serde_json::json!({"count": 2, "items": [
                venue("Big Ben", 51.5007, -0.1246, Some("Westminster")),
                venue("Tower Bridge", 51.5055, -0.0754, None)
            ]}),
        )
        .await,
        mock_list(
            server,
            "food-id",
            serde_json::json!({"count": 1, "items": [
                venue("Dishoom", 51.5245, -0.0768, Some("Shoreditch"))
            ]}),
        )
        .await,
        mock_list(
            server,
            "saved-id",
            serde_json::json!({"count": 1, "items": [
                venue("Some place", 11.123, 0.4, Some("London"))
            ]}),
        )
        .await,
    ]
}

#[tokio::test]
async fn test_end_to_end_kml_export() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out").join("places.kml");

    let server = MockServer::start_async().await;
    let mocks = mock_all_lists(&server).await;
    let liked = mock_list(&server, "liked-id", serde_json::json!({"items": []})).await;

    let result = run_export(&server, OutputFormat::Kml, output.to_str().unwrap().to_string()).await;

    assert!(result.is_ok(), "export failed: {:?}", result.err());
    for mock in &mocks {
        mock.assert_async().await;
    }
    // 未設定的清單不會被抓取
    liked.assert_hits_async(0).await;

    let kml = std::fs::read_to_string(&output).unwrap();
    assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

    // 資料夾順序依設定
    let london = kml.find("<Folder id=\"London\">").unwrap();
    let food = kml.find("<Folder id=\"london-food\">").unwrap();
    let saved = kml.find("<Folder id=\"My Saved Places\">").unwrap();
    assert!(london < food && food < saved);

    // 每種顏色只有一組樣式
    assert_eq!(kml.matches("<Style ").count(), 2);
    assert_eq!(kml.matches("<StyleMap ").count(), 2);
    assert_eq!(kml.matches("<styleUrl>#style-blue</styleUrl>").count(), 2);
    assert_eq!(kml.matches("<styleUrl>#style-red</styleUrl>").count(), 1);

    assert!(kml.contains("<coordinates>0.4,11.123</coordinates>"));
    assert!(kml.contains("Tower Bridge\nNO ADDRESS!\nList: London"));
}

#[tokio::test]
async fn test_end_to_end_map_export() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("map.html");

    let server = MockServer::start_async().await;
    let _mocks = mock_all_lists(&server).await;

    let result = run_export(&server, OutputFormat::Map, output.to_str().unwrap().to_string()).await;
    assert!(result.is_ok(), "export failed: {:?}", result.err());

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("setView([51.538,-0.14], 10)"));
    assert!(html.contains("Big Ben <span style=\\\"color:blue\\\">London<\\/span>"));
    assert!(html.contains("Dishoom london-food"));
    assert!(html.contains("<span style=\"color:red\">my saved places</span>"));
    assert!(html.contains("L.control.fullscreen()"));
}

#[tokio::test]
async fn test_end_to_end_csv_export() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("places.csv");

    let server = MockServer::start_async().await;
    let _mocks = mock_all_lists(&server).await;

    run_export(&server, OutputFormat::Csv, output.to_str().unwrap().to_string())
        .await
        .unwrap();

    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "List,Name,Address,Latitude,Longitude,Color");
    assert_eq!(lines[1], "London,Big Ben,Westminster UK,51.5007,-0.1246,blue");
    assert_eq!(lines[3], "london-food,Dishoom,Shoreditch UK,51.5245,-0.0768,");
}

#[tokio::test]
async fn test_missing_list_aborts_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("places.kml");

    let server = MockServer::start_async().await;
    let lists = mock_lists(&server).await;

    let mut config = export_config(&server, OutputFormat::Kml, output.to_str().unwrap().to_string());
    config.interest = InterestConfig::new(vec![
        InterestEntry::new("london", Some("blue")),
        InterestEntry::new("london-todo", Some("red")),
    ])
    .unwrap();
    let source = FoursquareClient::new(&server.base_url(), TOKEN, VERSION, Duration::from_secs(5)).unwrap();
    let result = ExportEngine::new(ExportPipeline::new(source, LocalStorage::default(), config))
        .run()
        .await;

    lists.assert_async().await;
    match result {
        Err(ExportError::MissingList { name }) => assert_eq!(name, "london-todo"),
        other => panic!("expected MissingList, got {:?}", other),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_upstream_failure_aborts_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("places.kml");

    let server = MockServer::start_async().await;
    let lists = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/self/lists");
            then.status(401)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "meta": {
                        "code": 401,
                        "errorType": "invalid_auth",
                        "errorDetail": "OAuth token invalid or revoked."
                    },
                    "response": {}
                }));
        })
        .await;

    let result = run_export(&server, OutputFormat::Kml, output.to_str().unwrap().to_string()).await;

    lists.assert_async().await;
    match result {
        Err(err @ ExportError::UpstreamError { .. }) => {
            assert_eq!(err.exit_code(), 2);
            assert!(err.to_string().contains("OAuth token invalid or revoked."));
        }
        other => panic!("expected UpstreamError, got {:?}", other),
    }
    assert!(!output.exists());
}
