pub mod aggregator;
pub mod analyzers;
pub mod batch;
pub mod engine;

pub use crate::domain::model::{AnalysisRecord, Finding, ResultTable, UploadedDocument};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
