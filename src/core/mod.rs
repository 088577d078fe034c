pub mod etl;
pub mod pipeline;
pub mod places;

pub use crate::domain::model::{Place, RenderedOutput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, VenueSource};
pub use crate::utils::error::Result;
