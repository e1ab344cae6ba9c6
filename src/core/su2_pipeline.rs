use std::path::Path;

use crate::aerofoil::Aerofoil;
use crate::core::report;
use crate::core::{AlphaResult, ConfigProvider, Pipeline, SolverBackend, Storage};
use crate::drivers::{GmshDriver, Naca456Driver, Su2Driver};
use crate::mesh::cgrid;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// CFD pipeline: naca456 coordinates, gmsh C-grid mesh, SU2 alpha sweep.
pub struct Su2Pipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> Su2Pipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for Su2Pipeline<S, C> {
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
        let mesh_config = self.config.mesh();
        mesh_config.validate()?;

        let statements = cgrid::geometry(aerofoil, &mesh_config)?;
        tracing::debug!("Built C-grid geometry: {} statements", statements.len());

        let work_dir = Path::new(self.config.work_dir());
        let mesh_path = GmshDriver::new(self.config.gmsh_path(), work_dir)
            .run(&statements)
            .await?;
        tracing::info!("Mesh written to {}", mesh_path.display());

        let driver = Su2Driver::new(
            self.config.su2_path(),
            work_dir,
            self.config.skip_iterations(),
            self.config.su2_overrides(),
        );
        driver.sweep(self.config.alphas()).await
    }

    async fn report(&self, aerofoil: &Aerofoil, results: Vec<AlphaResult>) -> Result<String> {
        report::write_polar(
            &self.storage,
            &self.config,
            SolverBackend::Su2,
            aerofoil,
            results,
        )
        .await
    }
}
