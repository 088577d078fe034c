use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 依序執行 extract、transform、load；任何一步失敗都不會寫出檔案
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting export...");

        // Extract
        let places = self.pipeline.extract().await?;
        tracing::info!("Extracted {} places", places.len());

        // Transform
        let output = self.pipeline.transform(places).await?;
        tracing::info!(
            "Rendered {} places as {}",
            output.place_count,
            output.format.label()
        );

        // Load
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(output_path)
    }
}
