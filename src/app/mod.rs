pub mod pipelines;

pub use pipelines::AuditPipeline;
