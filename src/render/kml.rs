use crate::domain::model::{InterestConfig, Place};
use crate::render::color::kml_color;
use crate::render::group_places;
use crate::utils::error::{ExportError, Result};
use chrono::{Local, NaiveDate};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const ICON_HREF: &str = "http://www.gstatic.com/mapspro/images/stock/503-wht-blank_maps.png";
const DOCUMENT_ID: &str = "docid";
const DOCUMENT_DESCRIPTION: &str = "Foursquare lists";

/// 一種顏色對應的 Style + StyleMap
#[derive(Debug, Clone)]
struct IconStyle {
    id: String,
    normal_id: String,
    kml_color: String,
}

/// 單次輸出用的樣式表：每種顏色只建立一次
#[derive(Debug, Default)]
struct StyleRegistry {
    styles: Vec<IconStyle>,
}

impl StyleRegistry {
    fn style_url(&mut self, color: &str) -> Result<String> {
        let id = format!("style-{}", color.to_lowercase());
        if !self.styles.iter().any(|style| style.id == id) {
            tracing::debug!("Registering KML style for color {}", color);
            self.styles.push(IconStyle {
                normal_id: format!("{}-normal", id),
                kml_color: kml_color(color)?,
                id: id.clone(),
            });
        }
        Ok(format!("#{}", id))
    }
}

struct Folder<'a> {
    name: String,
    style_url: Option<String>,
    places: Vec<&'a Place>,
}

pub struct KmlRenderer {
    generated_on: NaiveDate,
}

impl KmlRenderer {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self { generated_on }
    }

    pub fn document_name(&self) -> String {
        format!("foursquare-{}", self.generated_on.format("%Y%m%d"))
    }

    pub fn render(&self, places: &[Place], interest: &InterestConfig) -> Result<String> {
        // 先確認所有設定的顏色都合法，再開始輸出
        for color in interest.colors() {
            kml_color(color)?;
        }

        let mut registry = StyleRegistry::default();
        let mut folders = Vec::new();
        for group in group_places(places, interest) {
            // 只有實際用到的顏色才產生樣式
            let style_url = match group.color() {
                Some(color) if !group.places.is_empty() => Some(registry.style_url(color)?),
                _ => None,
            };
            folders.push(Folder {
                name: group.name,
                style_url,
                places: group.places,
            });
        }

        tracing::debug!(
            "Writing KML with {} folders and {} styles",
            folders.len(),
            registry.styles.len()
        );

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer
            .create_element("kml")
            .with_attribute(("xmlns", KML_NAMESPACE))
            .write_inner_content(|w| {
                w.create_element("Document")
                    .with_attribute(("id", DOCUMENT_ID))
                    .write_inner_content(|w| {
                        write_text(w, "name", &self.document_name())?;
                        write_text(w, "description", DOCUMENT_DESCRIPTION)?;
                        for style in &registry.styles {
                            write_style(w, style)?;
                        }
                        for folder in &folders {
                            write_folder(w, folder)?;
                        }
                        Ok(())
                    })?;
                Ok(())
            })?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| ExportError::RenderError {
            message: format!("KML output is not valid UTF-8: {}", e),
        })
    }
}

impl Default for KmlRenderer {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> std::io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_style<W: Write>(writer: &mut Writer<W>, style: &IconStyle) -> std::io::Result<()> {
    writer
        .create_element("Style")
        .with_attribute(("id", style.normal_id.as_str()))
        .write_inner_content(|w| {
            w.create_element("IconStyle").write_inner_content(|w| {
                write_text(w, "color", &style.kml_color)?;
                w.create_element("Icon")
                    .write_inner_content(|w| write_text(w, "href", ICON_HREF))?;
                Ok(())
            })?;
            Ok(())
        })?;

    let normal_url = format!("#{}", style.normal_id);
    writer
        .create_element("StyleMap")
        .with_attribute(("id", style.id.as_str()))
        .write_inner_content(|w| {
            for key in ["normal", "highlight"] {
                w.create_element("Pair").write_inner_content(|w| {
                    write_text(w, "key", key)?;
                    write_text(w, "styleUrl", &normal_url)
                })?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_folder<W: Write>(writer: &mut Writer<W>, folder: &Folder<'_>) -> std::io::Result<()> {
    writer
        .create_element("Folder")
        .with_attribute(("id", folder.name.as_str()))
        .write_inner_content(|w| {
            write_text(w, "name", &folder.name)?;
            for place in &folder.places {
                write_placemark(w, place, folder.style_url.as_deref())?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_placemark<W: Write>(
    writer: &mut Writer<W>,
    place: &Place,
    style_url: Option<&str>,
) -> std::io::Result<()> {
    writer
        .create_element("Placemark")
        .with_attribute(("id", place.venue_name.as_str()))
        .write_inner_content(|w| {
            write_text(w, "name", &place.venue_name)?;
            write_text(w, "description", &place.description())?;
            if let Some(url) = style_url {
                write_text(w, "styleUrl", url)?;
            }
            // KML 座標順序是經度在前
            w.create_element("Point").write_inner_content(|w| {
                write_text(w, "coordinates", &format!("{},{}", place.lng, place.lat))
            })?;
            Ok(())
        })?;
    Ok(())
}
