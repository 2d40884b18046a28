use crate::core::batch::BatchOrchestrator;
use crate::core::{ConfigProvider, Pipeline, ResultTable, Storage, UploadedDocument};
use crate::report::{self, REPORT_BASENAME};
use crate::utils::error::Result;
use std::path::Path;

/// Reads uploads through `reader`, writes reports through `writer`.
pub struct AuditPipeline<R: Storage, W: Storage, C: ConfigProvider> {
    pub(crate) reader: R,
    pub(crate) writer: W,
    pub(crate) config: C,
}

impl<R: Storage, W: Storage, C: ConfigProvider> AuditPipeline<R, W, C> {
    pub fn new(reader: R, writer: W, config: C) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }
}

/// The declared filename is the last path component.
fn declared_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[async_trait::async_trait]
impl<R: Storage, W: Storage, C: ConfigProvider> Pipeline for AuditPipeline<R, W, C> {
    async fn extract(&self) -> Result<Vec<UploadedDocument>> {
        let mut documents = Vec::with_capacity(self.config.input_files().len());

        for path in self.config.input_files() {
            tracing::debug!("Reading upload: {}", path);
            let bytes = self.reader.read_file(path).await?;
            tracing::debug!("{}: {} bytes", path, bytes.len());
            documents.push(UploadedDocument::new(declared_name(path), bytes));
        }

        Ok(documents)
    }

    async fn transform(&self, documents: Vec<UploadedDocument>) -> Result<ResultTable> {
        let orchestrator = BatchOrchestrator::new(self.config.policy())?;
        Ok(orchestrator.run(&documents))
    }

    async fn load(&self, table: &ResultTable) -> Result<Vec<String>> {
        let mut rendered = Vec::new();
        for format in self.config.report_formats() {
            rendered.push((format.file_name(), format.render(table)?));
        }

        let mut written = Vec::new();
        for (name, content) in &rendered {
            tracing::debug!("Writing {} ({} bytes)", name, content.len());
            self.writer.write_file(name, content.as_bytes()).await?;
            written.push(format!("{}/{}", self.config.output_path(), name));
        }

        if self.config.bundle_reports() {
            let zip_name = format!("{}.zip", REPORT_BASENAME);
            let zip_data = report::bundle(&rendered)?;
            tracing::debug!("Writing {} ({} bytes)", zip_name, zip_data.len());
            self.writer.write_file(&zip_name, &zip_data).await?;
            written.push(format!("{}/{}", self.config.output_path(), zip_name));
        }

        Ok(written)
    }
}
