use async_trait::async_trait;

use crate::aerofoil::naca::NacaDesignation;
use crate::aerofoil::Aerofoil;
use crate::domain::model::{AlphaResult, SolverBackend};
use crate::mesh::MeshConfig;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn naca(&self) -> &str;

    /// The designation handed to naca456. Providers with explicit aerofoil
    /// overrides layer them on top of the parsed name.
    fn designation(&self) -> Result<NacaDesignation> {
        NacaDesignation::parse(self.naca())
    }
    fn alphas(&self) -> &[f64];
    fn solver(&self) -> SolverBackend;
    fn output_path(&self) -> &str;
    fn work_dir(&self) -> &str;
    fn output_formats(&self) -> Vec<String>;
    fn mesh(&self) -> MeshConfig;

    fn naca456_path(&self) -> Option<&str>;
    fn gmsh_path(&self) -> Option<&str>;
    fn su2_path(&self) -> Option<&str>;
    fn xfoil_path(&self) -> Option<&str>;

    fn skip_iterations(&self) -> usize;
    fn su2_overrides(&self) -> Vec<(String, String)>;
    fn reynolds_number(&self) -> f64;
    fn mach(&self) -> f64;
}

/// The three phases of an analysis run: generate the aerofoil geometry,
/// evaluate the alpha sweep, write the polar.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn generate(&self) -> Result<Aerofoil>;
    async fn analyse(&self, aerofoil: &Aerofoil) -> Result<Vec<AlphaResult>>;
    async fn report(&self, aerofoil: &Aerofoil, results: Vec<AlphaResult>) -> Result<String>;
}
