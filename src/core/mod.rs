pub mod analysis;
pub mod calorie;
pub mod etl;
pub mod goal;
pub mod health;

pub use crate::domain::model::{FetchedPage, FoodRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
