use crate::domain::model::{InterestConfig, Place};
use crate::utils::error::{ExportError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// 預設中心點 (倫敦)，不從資料推算
pub const DEFAULT_CENTER: [f64; 2] = [51.538, -0.14];
pub const DEFAULT_ZOOM: u8 = 10;

const MAP_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{title}}</title>

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>

  <!-- Leaflet.markercluster 1.4.1 -->
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.Default.css" />
  <script src="https://unpkg.com/leaflet.markercluster@1.4.1/dist/leaflet.markercluster.js"></script>

  <!-- Leaflet.fullscreen 3.0.2 -->
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.2/Control.FullScreen.css" />
  <script src="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.2/Control.FullScreen.js"></script>

  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
  </style>
</head>

<body>
  <div id="map"></div>
{{legend}}
  <script>
    const map = L.map('map').setView({{center}}, {{zoom}});
    L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
      maxZoom: 19,
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);

    const rows = {{markers}};
    const cluster = L.markerClusterGroup();
    for (const row of rows) {
      const [lat, lon, color, tooltip, popup] = row;
      const marker = L.circleMarker(
        new L.LatLng(lat, lon),
        {
          radius: 7,
          color: color || '#3388ff',
          fill: true,
          fillColor: color || '#3388ff',
        }
      );
      marker.bindPopup(popup);
      marker.bindTooltip(tooltip, {permanent: true});
      cluster.addLayer(marker);
    }
    map.addLayer(cluster);

    L.control.fullscreen().addTo(map);
  </script>
</body>

</html>
"#;

/// 地圖的中心點、縮放與圖例連結
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub link: Option<String>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            link: None,
        }
    }
}

/// 叢集圖層中的一列：緯度、經度、顏色、tooltip、popup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRow(pub f64, pub f64, pub Option<String>, pub String, pub String);

#[derive(Debug, Clone)]
pub struct LeafletMap {
    view: MapView,
    rows: Vec<MarkerRow>,
    legend: Vec<String>,
}

impl LeafletMap {
    pub fn build(places: &[Place], interest: &InterestConfig, view: &MapView) -> Self {
        let rows = places
            .iter()
            .map(|place| {
                let tooltip = format!(
                    "{} {}",
                    htmlescape::encode_minimal(&place.venue_name),
                    style_list(&place.list_name, place.color.as_deref())
                );
                let popup = place
                    .description()
                    .lines()
                    .map(htmlescape::encode_minimal)
                    .collect::<Vec<_>>()
                    .join("<br>");
                MarkerRow(place.lat, place.lng, place.color.clone(), tooltip, popup)
            })
            .collect();

        // 圖例直接來自設定，沒有地點的清單也要列出
        let legend = interest
            .iter()
            .map(|entry| style_list(entry.name(), entry.color()))
            .collect();

        Self {
            view: view.clone(),
            rows,
            legend,
        }
    }

    pub fn rows(&self) -> &[MarkerRow] {
        &self.rows
    }

    pub fn legend_html(&self) -> String {
        let link = match &self.view.link {
            Some(link) => format!(
                " <a href=\"{}\">map</a>",
                htmlescape::encode_minimal(link)
            ),
            None => String::new(),
        };
        format!(
            "  <div id=\"legend\" style=\"position: fixed; bottom: 50px; left: 50px; min-width: 100px; \
             border: 2px solid grey; z-index: 9999; font-size: 14px; background: white; padding: 4px;\">\
             &nbsp; Legend: {}{}</div>",
            self.legend.join(" "),
            link
        )
    }

    pub fn to_html(&self) -> Result<String> {
        let markers = script_json(&serde_json::to_string(&self.rows)?);
        let center = serde_json::to_string(&self.view.center)?;
        let legend = self.legend_html();
        let zoom = self.view.zoom.to_string();

        // 一次掃描填入，填入的內容不會再被當成 placeholder
        let placeholder = Regex::new(r"\{\{(\w+)\}\}").map_err(|e| ExportError::RenderError {
            message: format!("invalid map template pattern: {}", e),
        })?;
        let html = placeholder.replace_all(MAP_TEMPLATE, |caps: &Captures| {
            match &caps[1] {
                "title" => "Foursquare lists".to_string(),
                "legend" => legend.clone(),
                "center" => center.clone(),
                "zoom" => zoom.clone(),
                "markers" => markers.clone(),
                _ => caps[0].to_string(),
            }
        });
        Ok(html.into_owned())
    }
}

/// 有顏色時用 span 上色，沒有顏色就是純文字
fn style_list(name: &str, color: Option<&str>) -> String {
    let name = htmlescape::encode_minimal(name);
    match color {
        Some(color) => format!(
            "<span style=\"color:{}\">{}</span>",
            htmlescape::encode_minimal(color),
            name
        ),
        None => name,
    }
}

/// 避免資料中的 `</script>` 提早結束 script 區塊
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
