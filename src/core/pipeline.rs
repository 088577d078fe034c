use crate::core::places::{extract_places, resolve_lists};
use crate::core::{ConfigProvider, Pipeline, Storage, VenueSource};
use crate::domain::model::{OutputFormat, Place, RenderedOutput};
use crate::render::csv::render_csv;
use crate::render::kml::KmlRenderer;
use crate::render::map::LeafletMap;
use crate::utils::error::Result;

pub struct ExportPipeline<V: VenueSource, S: Storage, C: ConfigProvider> {
    source: V,
    storage: S,
    config: C,
    kml: KmlRenderer,
}

impl<V: VenueSource, S: Storage, C: ConfigProvider> ExportPipeline<V, S, C> {
    pub fn new(source: V, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
            kml: KmlRenderer::default(),
        }
    }

    pub fn with_kml_renderer(mut self, kml: KmlRenderer) -> Self {
        self.kml = kml;
        self
    }
}

#[async_trait::async_trait]
impl<V: VenueSource, S: Storage, C: ConfigProvider> Pipeline for ExportPipeline<V, S, C> {
    async fn extract(&self) -> Result<Vec<Place>> {
        let lists = resolve_lists(&self.source).await?;
        extract_places(&self.source, &lists, self.config.interest()).await
    }

    async fn transform(&self, places: Vec<Place>) -> Result<RenderedOutput> {
        let format = self.config.output_format();
        tracing::debug!("Rendering {} places as {}", places.len(), format.label());

        let contents = match format {
            OutputFormat::Kml => self.kml.render(&places, self.config.interest())?,
            OutputFormat::Map => {
                LeafletMap::build(&places, self.config.interest(), self.config.map_view())
                    .to_html()?
            }
            OutputFormat::Csv => render_csv(&places)?,
        };

        Ok(RenderedOutput {
            format,
            contents,
            place_count: places.len(),
        })
    }

    async fn load(&self, output: RenderedOutput) -> Result<String> {
        let output_path = self.config.output_path().to_string();

        tracing::debug!(
            "Writing {} ({} bytes) to storage",
            output.format.label(),
            output.contents.len()
        );
        self.storage
            .write_file(&output_path, output.contents.as_bytes())
            .await?;

        Ok(output_path)
    }
}
