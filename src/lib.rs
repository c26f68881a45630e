pub mod cloud;
pub mod config;
pub mod error;
pub mod render;

pub use cloud::{CloudCache, CloudData, InterestBatch, LabelItem};
pub use config::CloudConfig;
pub use error::CloudError;
pub use render::ViewMode;
