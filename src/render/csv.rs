use crate::domain::model::Place;
use crate::utils::error::{ExportError, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "List")]
    list: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Color")]
    color: Option<&'a str>,
}

const HEADER: [&str; 6] = ["List", "Name", "Address", "Latitude", "Longitude", "Color"];

pub fn render_csv(places: &[Place]) -> Result<String> {
    // 標題列手動寫入，沒有地點時仍然輸出
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for place in places {
        writer.serialize(CsvRow {
            list: &place.list_name,
            name: &place.venue_name,
            address: &place.address,
            latitude: place.lat,
            longitude: place.lng,
            color: place.color.as_deref(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::RenderError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
