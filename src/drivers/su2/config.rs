use std::fmt;
use std::io::BufRead;

use crate::utils::error::Result;

/// The unsteady RANS setup the pipeline runs: SA turbulence,
/// second-order dual time stepping, JST convective scheme, Cauchy window
/// convergence on the time-averaged force coefficients, and the
/// `aerofoil`/`far_field` markers matching the generated mesh.
const BASE_CONFIG: &str = "
SOLVER= RANS
KIND_TURB_MODEL= SA
MATH_PROBLEM= DIRECT
TIME_DOMAIN = YES
TIME_MARCHING= DUAL_TIME_STEPPING-2ND_ORDER
TIME_STEP= 5e-4
TIME_ITER= 200
INNER_ITER= 50
MACH_NUMBER= 0.3
AOA= 1.0
REF_DIMENSIONALIZATION = DIMENSIONAL
FREESTREAM_TEMPERATURE= 293.0
REYNOLDS_NUMBER= 1e+3
REYNOLDS_LENGTH= 1.0
REF_ORIGIN_MOMENT_X = 0.25
REF_ORIGIN_MOMENT_Y = 0.00
REF_ORIGIN_MOMENT_Z = 0.00
REF_LENGTH= 1.0
REF_AREA= 0
MARKER_HEATFLUX= (aerofoil, 0.0)
MARKER_FAR= (far_field)
MARKER_PLOTTING= (aerofoil)
MARKER_MONITORING= (aerofoil)
NUM_METHOD_GRAD= WEIGHTED_LEAST_SQUARES
CFL_NUMBER= 20.0
CFL_ADAPT= NO
CFL_ADAPT_PARAM= (1.5, 0.5, 1.0, 100.0)
RK_ALPHA_COEFF= (0.66667, 0.66667, 1.000000)
LINEAR_SOLVER= FGMRES
LINEAR_SOLVER_ERROR= 1E-6
LINEAR_SOLVER_ITER= 5
CONV_NUM_METHOD_FLOW= JST
JST_SENSOR_COEFF= ( 0.5, 0.01)
TIME_DISCRE_FLOW= EULER_IMPLICIT
CONV_NUM_METHOD_TURB= SCALAR_UPWIND
MUSCL_TURB= NO
TIME_DISCRE_TURB= EULER_IMPLICIT
CONV_CRITERIA = RESIDUAL
CONV_FIELD= REL_RMS_DENSITY
CONV_RESIDUAL_MINVAL= -3
WINDOW_CAUCHY_CRIT = YES
CONV_WINDOW_FIELD = (TAVG_DRAG, TAVG_LIFT)
CONV_WINDOW_STARTITER = 0
CONV_WINDOW_CAUCHY_EPS = 1E-3
CONV_WINDOW_CAUCHY_ELEMS = 10
WINDOW_START_ITER = 500
WINDOW_FUNCTION = HANN_SQUARE
HISTORY_WRT_FREQ_INNER=50
SCREEN_WRT_FREQ_INNER=50
MESH_FILENAME=mesh.su2
MESH_FORMAT= SU2
TABULAR_FORMAT=TECPLOT
CONV_FILENAME=history
WRT_SOL_FREQ=200
WRT_SOL_FREQ_DUALTIME=1
WRT_CON_FREQ_DUALTIME=10
WRT_CON_FREQ=1
WRT_CSV_SOL=NO
SCREEN_OUTPUT=(TIME_ITER, INNER_ITER, AERO_COEFF)
HISTORY_OUTPUT=(ITER, TIME_DOMAIN, AERO_COEFF)
OUTPUT_FILES=(RESTART)
";

/// An SU2 `.cfg` file as an ordered key/value list.
///
/// SU2 configs are `KEY= VALUE` lines with `%` comments. Insertion order is
/// preserved on write so diffs against hand-edited configs stay readable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Su2Config {
    entries: Vec<(String, String)>,
}

impl Su2Config {
    /// The pipeline's canonical solver setup.
    pub fn base() -> Self {
        Self::from_str_lossy(BASE_CONFIG)
    }

    /// Parse config text, skipping comments and non-assignment lines.
    pub fn from_str_lossy(content: &str) -> Self {
        let mut config = Self::default();
        for line in content.lines() {
            let line = line.split('%').next().unwrap_or("");
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            config.set(key.trim(), value.trim());
        }
        config
    }

    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut content = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut content)?;
        Ok(Self::from_str_lossy(&content))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, replacing an existing entry in place or appending.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn merge<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in overrides {
            self.set(&key, value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Su2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
