use crate::domain::model::{InterestConfig, ListDetail, ListGroup, OutputFormat, Place, RenderedOutput};
use crate::render::map::MapView;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_format(&self) -> OutputFormat;
    fn output_path(&self) -> &str;
    fn interest(&self) -> &InterestConfig;
    fn map_view(&self) -> &MapView;
}

/// 儲存清單的來源 (Foursquare API 或測試替身)
#[async_trait]
pub trait VenueSource: Send + Sync {
    async fn user_lists(&self) -> Result<Vec<ListGroup>>;
    async fn list_detail(&self, list_id: &str) -> Result<ListDetail>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Place>>;
    async fn transform(&self, places: Vec<Place>) -> Result<RenderedOutput>;
    async fn load(&self, output: RenderedOutput) -> Result<String>;
}
