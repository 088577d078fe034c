pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

pub use adapters::foursquare::FoursquareClient;
pub use config::{cli::LocalStorage, CliConfig, ExportConfig};
pub use self::core::{etl::ExportEngine, pipeline::ExportPipeline};
pub use utils::error::{ExportError, Result};
