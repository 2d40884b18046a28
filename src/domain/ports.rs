use crate::domain::model::{ResultTable, UploadedDocument};
use crate::domain::policy::HeuristicPolicy;
use crate::report::ReportFormat;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn report_formats(&self) -> Vec<ReportFormat>;
    fn bundle_reports(&self) -> bool;
    fn policy(&self) -> &HeuristicPolicy;
}

/// Extract uploads, analyze them, write the reports.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<UploadedDocument>>;
    async fn transform(&self, documents: Vec<UploadedDocument>) -> Result<ResultTable>;
    async fn load(&self, table: &ResultTable) -> Result<Vec<String>>;
}
