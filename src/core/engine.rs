use crate::domain::model::ResultTable;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub table: ResultTable,
    /// Report files written by the load stage.
    pub written: Vec<String>,
}

pub struct AuditEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<AuditOutcome> {
        tracing::info!("🚀 Starting accessibility pre-flight check");

        tracing::info!("📥 Reading uploaded documents...");
        let documents = self.pipeline.extract().await?;
        tracing::info!("Read {} document(s)", documents.len());

        tracing::info!("🔍 Analyzing documents...");
        let table = self.pipeline.transform(documents).await?;
        tracing::info!("Analyzed {} document(s)", table.len());

        tracing::info!("💾 Writing reports...");
        let written = self.pipeline.load(&table).await?;
        for path in &written {
            tracing::info!("📁 Report saved to: {}", path);
        }

        Ok(AuditOutcome { table, written })
    }
}
