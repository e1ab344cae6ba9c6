use crate::aerofoil::naca::NacaDesignation;
use crate::core::{ConfigProvider, SolverBackend};
use crate::mesh::MeshConfig;
use crate::utils::error::{AeroxError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, validate_positive_number,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineConfig>,
    pub aerofoil: AerofoilConfig,
    pub solver: SolverConfig,
    pub mesh: Option<MeshTable>,
    pub xfoil: Option<XfoilConfig>,
    pub tools: Option<ToolsConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// The designation name plus optional overrides of the derived naca456
/// parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerofoilConfig {
    pub naca: String,
    pub camber_type: Option<String>,
    pub max_camber_fraction: Option<f64>,
    pub max_camber_position: Option<f64>,
    pub thickness_type: Option<String>,
    pub thickness_fraction: Option<f64>,
    pub chord_length: Option<f64>,
    pub lift_coefficient: Option<f64>,
    pub constant_loading_fraction: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: String,
    pub alphas: Vec<f64>,
    pub skip_iterations: Option<usize>,
    pub su2_overrides: Option<BTreeMap<String, String>>,
}

/// Optional mesh overrides layered on top of [`MeshConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshTable {
    pub grid_width: Option<f64>,
    pub wake_width: Option<f64>,
    pub wake_progression: Option<f64>,
    pub layers: Option<usize>,
    pub thickness: Option<f64>,
    pub initial_cell_thickness: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XfoilConfig {
    pub reynolds_number: Option<f64>,
    pub mach: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub naca456: Option<String>,
    pub gmsh: Option<String>,
    pub su2: Option<String>,
    pub xfoil: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub work_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AeroxError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AeroxError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` with the value of the environment variable.
    /// Unset variables are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AeroxError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("aerofoil.naca", &self.aerofoil.naca)?;
        self.designation()?;
        self.solver.backend.parse::<SolverBackend>()?;

        if self.solver.alphas.is_empty() {
            return Err(AeroxError::MissingConfigError {
                field: "solver.alphas".to_string(),
            });
        }
        for alpha in &self.solver.alphas {
            validate_range("solver.alphas", *alpha, -90.0, 90.0)?;
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(xfoil) = &self.xfoil {
            if let Some(re) = xfoil.reynolds_number {
                validate_positive_number("xfoil.reynolds_number", re)?;
            }
            if let Some(mach) = xfoil.mach {
                validate_range("xfoil.mach", mach, 0.0, 2.0)?;
            }
        }

        self.mesh_config().validate()?;
        Ok(())
    }

    fn mesh_config(&self) -> MeshConfig {
        let mut mesh = MeshConfig::default();
        if let Some(table) = &self.mesh {
            if let Some(grid_width) = table.grid_width {
                mesh.grid_width = grid_width;
            }
            if let Some(wake_width) = table.wake_width {
                mesh.wake_width = wake_width;
            }
            if table.wake_progression.is_some() {
                mesh.wake_progression = table.wake_progression;
            }
            if let Some(layers) = table.layers {
                mesh.layers = layers;
            }
            if let Some(thickness) = table.thickness {
                mesh.thickness = thickness;
            }
            if let Some(initial) = table.initial_cell_thickness {
                mesh.initial_cell_thickness = initial;
            }
        }
        mesh
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn naca(&self) -> &str {
        &self.aerofoil.naca
    }

    fn designation(&self) -> Result<NacaDesignation> {
        let mut designation = NacaDesignation::parse(&self.aerofoil.naca)?;
        let overrides = &self.aerofoil;
        if let Some(camber_type) = &overrides.camber_type {
            designation.camber_type = camber_type.clone();
        }
        if overrides.max_camber_fraction.is_some() {
            designation.max_camber_fraction = overrides.max_camber_fraction;
        }
        if overrides.max_camber_position.is_some() {
            designation.max_camber_position = overrides.max_camber_position;
        }
        if let Some(thickness_type) = &overrides.thickness_type {
            designation.thickness_type = thickness_type.clone();
        }
        if let Some(thickness_fraction) = overrides.thickness_fraction {
            designation.thickness_fraction = thickness_fraction;
        }
        if let Some(chord_length) = overrides.chord_length {
            designation.chord_length = chord_length;
        }
        if overrides.lift_coefficient.is_some() {
            designation.lift_coefficient = overrides.lift_coefficient;
        }
        if let Some(a) = overrides.constant_loading_fraction {
            designation.constant_loading_fraction = a;
        }
        Ok(designation)
    }

    fn alphas(&self) -> &[f64] {
        &self.solver.alphas
    }

    fn solver(&self) -> SolverBackend {
        self.solver.backend.parse().unwrap_or(SolverBackend::Su2)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn work_dir(&self) -> &str {
        self.load.work_dir.as_deref().unwrap_or("./work")
    }

    fn output_formats(&self) -> Vec<String> {
        self.load.output_formats.clone()
    }

    fn mesh(&self) -> MeshConfig {
        self.mesh_config()
    }

    fn naca456_path(&self) -> Option<&str> {
        self.tools.as_ref().and_then(|t| t.naca456.as_deref())
    }

    fn gmsh_path(&self) -> Option<&str> {
        self.tools.as_ref().and_then(|t| t.gmsh.as_deref())
    }

    fn su2_path(&self) -> Option<&str> {
        self.tools.as_ref().and_then(|t| t.su2.as_deref())
    }

    fn xfoil_path(&self) -> Option<&str> {
        self.tools.as_ref().and_then(|t| t.xfoil.as_deref())
    }

    fn skip_iterations(&self) -> usize {
        self.solver.skip_iterations.unwrap_or(10)
    }

    fn su2_overrides(&self) -> Vec<(String, String)> {
        self.solver
            .su2_overrides
            .as_ref()
            .map(|overrides| {
                overrides
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn reynolds_number(&self) -> f64 {
        self.xfoil
            .as_ref()
            .and_then(|x| x.reynolds_number)
            .unwrap_or(1e6)
    }

    fn mach(&self) -> f64 {
        self.xfoil.as_ref().and_then(|x| x.mach).unwrap_or(0.0)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_TOML: &str = r#"
[pipeline]
name = "polar-sweep"

[aerofoil]
naca = "2412"

[solver]
backend = "su2"
alphas = [-4.0, 0.0, 4.0, 8.0]
skip_iterations = 20

[solver.su2_overrides]
EXT_ITER = "500"

[mesh]
grid_width = 0.02
layers = 80

[load]
output_path = "./output"
output_formats = ["json", "csv"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC_TOML).unwrap();
        assert_eq!(config.naca(), "2412");
        assert_eq!(config.solver(), SolverBackend::Su2);
        assert_eq!(config.alphas(), &[-4.0, 0.0, 4.0, 8.0]);
        assert_eq!(config.skip_iterations(), 20);
        assert_eq!(
            config.su2_overrides(),
            vec![("EXT_ITER".to_string(), "500".to_string())]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mesh_overrides_layer_on_defaults() {
        let config = TomlConfig::from_toml_str(BASIC_TOML).unwrap();
        let mesh = config.mesh();
        assert_eq!(mesh.grid_width, 0.02);
        assert_eq!(mesh.layers, 80);
        // untouched fields keep their defaults
        assert_eq!(mesh.thickness, 5.0);
        assert_eq!(mesh.wake_progression, None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AEROX_TEST_NACA", "0012");
        let toml_content = r#"
[aerofoil]
naca = "${AEROX_TEST_NACA}"

[solver]
backend = "xfoil"
alphas = [0.0]

[load]
output_path = "./out"
output_formats = ["json"]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.naca(), "0012");
        std::env::remove_var("AEROX_TEST_NACA");
    }

    #[test]
    fn test_validation_rejects_unknown_backend() {
        let toml_content = BASIC_TOML.replace("backend = \"su2\"", "backend = \"fluent\"");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_alphas() {
        let toml_content = BASIC_TOML.replace("alphas = [-4.0, 0.0, 4.0, 8.0]", "alphas = []");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BASIC_TOML.as_bytes()).unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.naca(), "2412");
        assert_eq!(config.output_path(), "./output");
    }

    #[test]
    fn test_aerofoil_overrides_apply_to_designation() {
        let toml_content = r#"
[aerofoil]
naca = "2412"
thickness_fraction = 0.15
chord_length = 2.0

[solver]
backend = "su2"
alphas = [0.0]

[load]
output_path = "./out"
output_formats = ["json"]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let designation = config.designation().unwrap();
        // parsed from the name
        assert_eq!(designation.camber_type, "2");
        assert_eq!(designation.max_camber_fraction, Some(0.02));
        // overridden
        assert!((designation.thickness_fraction - 0.15).abs() < 1e-12);
        assert!((designation.chord_length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_required_table_fails() {
        let toml_content = r#"
[solver]
backend = "su2"
alphas = [0.0]
"#;
        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }
}
