use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// 依序執行擷取、建立、輸出；任何一步失敗即中止
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting report generation");
        self.monitor.log_stats("Start");

        let ingested = self.pipeline.extract().await?;
        tracing::info!(
            "Ingested {} records ({} rows skipped)",
            ingested.records.len(),
            ingested.dropped_rows
        );
        self.monitor.log_stats("Ingest");

        let document = self.pipeline.transform(ingested.records).await?;
        tracing::info!("Built report with {} pages", document.page_count());
        self.monitor.log_stats("Build");

        let output_path = self.pipeline.load(document).await?;
        tracing::info!("Report saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
