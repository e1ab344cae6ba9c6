use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::AeroxError;

/// Aerodynamic force coefficients at one flow condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub lift: f64,
    pub drag: f64,
    pub pitching_moment: f64,
}

/// Outcome of analysing one angle of attack. `coefficients` is `None` when
/// the analysis failed to converge at this angle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaResult {
    pub alpha: f64,
    pub coefficients: Option<Coefficients>,
}

/// The assembled polar written out at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolarReport {
    pub aerofoil: String,
    pub solver: String,
    pub results: Vec<AlphaResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    Su2,
    Xfoil,
}

impl SolverBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverBackend::Su2 => "su2",
            SolverBackend::Xfoil => "xfoil",
        }
    }
}

impl FromStr for SolverBackend {
    type Err = AeroxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "su2" => Ok(SolverBackend::Su2),
            "xfoil" => Ok(SolverBackend::Xfoil),
            other => Err(AeroxError::InvalidConfigValueError {
                field: "solver.backend".to_string(),
                value: other.to_string(),
                reason: "Supported backends: su2, xfoil".to_string(),
            }),
        }
    }
}
