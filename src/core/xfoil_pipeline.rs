use std::path::Path;

use crate::aerofoil::Aerofoil;
use crate::core::report;
use crate::core::{AlphaResult, ConfigProvider, Pipeline, SolverBackend, Storage};
use crate::drivers::{Naca456Driver, XfoilDriver};
use crate::utils::error::Result;

/// Panel-method pipeline: naca456 coordinates straight into an xfoil
/// viscous polar, no meshing step.
pub struct XfoilPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> XfoilPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for XfoilPipeline<S, C> {
    async fn generate(&self) -> Result<Aerofoil> {
        let designation = self.config.designation()?;
        tracing::debug!("Parsed NACA {} designation", designation.name);

        let driver = Naca456Driver::new(
            self.config.naca456_path(),
            Path::new(self.config.work_dir()),
        );
        driver.run(&designation).await
    }

    async fn analyse(&self, aerofoil: &Aerofoil) -> Result<Vec<AlphaResult>> {
        let driver = XfoilDriver::new(
            self.config.xfoil_path(),
            Path::new(self.config.work_dir()),
            self.config.reynolds_number(),
            self.config.mach(),
        );
        driver.sweep(aerofoil, self.config.alphas()).await
    }

    async fn report(&self, aerofoil: &Aerofoil, results: Vec<AlphaResult>) -> Result<String> {
        report::write_polar(
            &self.storage,
            &self.config,
            SolverBackend::Xfoil,
            aerofoil,
            results,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::su2_pipeline::tests::{MockConfig, MockStorage};
    use crate::domain::model::Coefficients;

    #[tokio::test]
    async fn test_report_labels_solver_as_xfoil() {
        let storage = MockStorage::new();
        let pipeline = XfoilPipeline::new(storage.clone(), MockConfig::new());
        let aerofoil = Aerofoil {
            name: "64-110".to_string(),
            ..Default::default()
        };
        let results = vec![AlphaResult {
            alpha: 4.0,
            coefficients: Some(Coefficients {
                lift: 0.69,
                drag: 0.0081,
                pitching_moment: -0.049,
            }),
        }];

        let output_path = pipeline.report(&aerofoil, results).await.unwrap();
        assert_eq!(output_path, "test_output/polar.json");

        let json = storage.get_file("polar.json").await.unwrap();
        let report: crate::domain::model::PolarReport = serde_json::from_slice(&json).unwrap();
        assert_eq!(report.solver, "xfoil");
        assert_eq!(report.aerofoil, "64-110");
    }
}
