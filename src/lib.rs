pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use app::AuditPipeline;
pub use config::PolicyConfig;
pub use crate::core::{batch::BatchOrchestrator, engine::AuditEngine};
pub use report::ReportFormat;
pub use utils::error::{AuditError, Result};
