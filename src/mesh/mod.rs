pub mod cgrid;

use serde::{Deserialize, Serialize};

use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, Validate};

/// Parameters of the structured C-grid built around the aerofoil.
///
/// All dimensions are in chord units (the chord is typically 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Maximum streamwise cell width along the aerofoil surface.
    pub grid_width: f64,
    /// Average streamwise cell width in the wake behind the trailing edge.
    pub wake_width: f64,
    /// Progression of wake cell widths away from the trailing edge.
    /// 1 is uniform; `None` derives it from the local surface spacing.
    pub wake_progression: Option<f64>,
    /// Number of cell layers between the surface and the outer grid boundary.
    pub layers: usize,
    /// Distance from the surface to the outer grid boundary.
    pub thickness: f64,
    /// Thickness of the cell immediately adjacent to the surface; layers
    /// grow geometrically from there.
    pub initial_cell_thickness: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            grid_width: 0.05,
            wake_width: 0.1,
            wake_progression: None,
            layers: 50,
            thickness: 5.0,
            initial_cell_thickness: 4.2e-5,
        }
    }
}

impl Validate for MeshConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("mesh.grid_width", self.grid_width)?;
        validate_positive_number("mesh.wake_width", self.wake_width)?;
        validate_positive_number("mesh.thickness", self.thickness)?;
        validate_positive_number("mesh.initial_cell_thickness", self.initial_cell_thickness)?;
        validate_positive_number("mesh.layers", self.layers as f64)?;
        if let Some(progression) = self.wake_progression {
            validate_positive_number("mesh.wake_progression", progression)?;
        }
        Ok(())
    }
}
