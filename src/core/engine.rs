use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting aerodynamic analysis...");

        // Generate
        println!("Generating aerofoil...");
        let aerofoil = self.pipeline.generate().await?;
        println!(
            "Generated {} with {} surface points",
            aerofoil.name,
            aerofoil.coordinates.len()
        );
        self.monitor.log_stats("Generate");

        // Analyse
        println!("Analysing alpha sweep...");
        let results = self.pipeline.analyse(&aerofoil).await?;
        let converged = results.iter().filter(|r| r.coefficients.is_some()).count();
        println!("Analysed {} angles ({} converged)", results.len(), converged);
        self.monitor.log_stats("Analyse");

        // Report
        println!("Writing polar report...");
        let output_path = self.pipeline.report(&aerofoil, results).await?;
        println!("Output saved to: {}", output_path);
        self.monitor.log_stats("Report");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
