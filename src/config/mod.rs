pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, SolverBackend};
#[cfg(feature = "cli")]
use crate::mesh::MeshConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, validate_positive_number,
    validate_range, Validate,
};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "aerox")]
#[command(about = "Aerodynamic polar analysis of NACA aerofoils")]
pub struct CliConfig {
    #[arg(long, help = "NACA designation, e.g. 2412 or 64-110")]
    pub naca: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "0",
        allow_hyphen_values = true,
        help = "Angles of attack in degrees"
    )]
    pub alphas: Vec<f64>,

    #[arg(long, default_value = "su2", help = "Analysis backend: su2 or xfoil")]
    pub solver: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "./work", help = "Scratch directory for tool runs")]
    pub work_dir: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Path to the naca456 executable")]
    pub naca456_path: Option<String>,

    #[arg(long, help = "Path to the gmsh executable")]
    pub gmsh_path: Option<String>,

    #[arg(long, help = "Path to the SU2_CFD executable")]
    pub su2_path: Option<String>,

    #[arg(long, help = "Path to the xfoil executable")]
    pub xfoil_path: Option<String>,

    #[arg(
        long,
        default_value = "10",
        help = "Initial time steps discarded when averaging CFD coefficients"
    )]
    pub skip_iterations: usize,

    #[arg(long, default_value = "1000000")]
    pub reynolds_number: f64,

    #[arg(long, default_value = "0")]
    pub mach: f64,

    #[arg(long, help = "Load the full configuration from a TOML file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system resource monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn naca(&self) -> &str {
        &self.naca
    }

    fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    fn solver(&self) -> SolverBackend {
        // validate() rejects anything unparseable before a run starts
        self.solver.parse().unwrap_or(SolverBackend::Su2)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn work_dir(&self) -> &str {
        &self.work_dir
    }

    fn output_formats(&self) -> Vec<String> {
        self.output_formats.clone()
    }

    fn mesh(&self) -> MeshConfig {
        MeshConfig::default()
    }

    fn naca456_path(&self) -> Option<&str> {
        self.naca456_path.as_deref()
    }

    fn gmsh_path(&self) -> Option<&str> {
        self.gmsh_path.as_deref()
    }

    fn su2_path(&self) -> Option<&str> {
        self.su2_path.as_deref()
    }

    fn xfoil_path(&self) -> Option<&str> {
        self.xfoil_path.as_deref()
    }

    fn skip_iterations(&self) -> usize {
        self.skip_iterations
    }

    fn su2_overrides(&self) -> Vec<(String, String)> {
        vec![]
    }

    fn reynolds_number(&self) -> f64 {
        self.reynolds_number
    }

    fn mach(&self) -> f64 {
        self.mach
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("naca", &self.naca)?;
        crate::aerofoil::naca::NacaDesignation::parse(&self.naca)?;
        self.solver.parse::<SolverBackend>()?;
        validate_path("output_path", &self.output_path)?;
        validate_path("work_dir", &self.work_dir)?;
        validate_output_formats("output_formats", &self.output_formats)?;

        if self.alphas.is_empty() {
            return Err(crate::utils::error::AeroxError::MissingConfigError {
                field: "alphas".to_string(),
            });
        }
        for alpha in &self.alphas {
            validate_range("alphas", *alpha, -90.0, 90.0)?;
        }

        validate_positive_number("reynolds_number", self.reynolds_number)?;
        validate_range("mach", self.mach, 0.0, 2.0)?;

        self.mesh().validate()?;
        Ok(())
    }
}
