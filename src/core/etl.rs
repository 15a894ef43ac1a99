use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
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

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting scrape run...");
        self.monitor.log_phase("Start");

        // Extract
        let listings = self.pipeline.extract().await?;
        tracing::info!("Extracted {} listings", listings.len());
        self.monitor.log_phase("Extract");

        // Transform
        let result = self.pipeline.transform(listings).await?;
        tracing::info!(
            "Store holds {} listings in {} brand groups",
            result.store.len(),
            result.groups.len()
        );
        self.monitor.log_phase("Transform");

        // Load
        let report_path = self.pipeline.load(result).await?;
        tracing::info!("Report saved to: {}", report_path);
        self.monitor.log_phase("Load");
        self.monitor.log_summary();

        Ok(report_path)
    }
}
