use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::domain::model::{AlphaResult, Coefficients};
use crate::drivers::su2::config::Su2Config;
use crate::utils::error::{AeroxError, Result};

const CONFIG_FILE: &str = "config.cfg";
const HISTORY_FILE: &str = "history.dat";

/// Runs SU2_CFD once per angle of attack and extracts the force
/// coefficients from the convergence history.
pub struct Su2Driver {
    executable: String,
    work_dir: PathBuf,
    skip_iterations: usize,
    overrides: Vec<(String, String)>,
}

impl Su2Driver {
    pub fn new(
        executable: Option<&str>,
        work_dir: &Path,
        skip_iterations: usize,
        overrides: Vec<(String, String)>,
    ) -> Self {
        Self {
            executable: executable.unwrap_or("SU2_CFD").to_string(),
            work_dir: work_dir.to_path_buf(),
            skip_iterations,
            overrides,
        }
    }

    /// Run the solver for each alpha in the sweep. The mesh is expected in
    /// the working directory as `mesh.su2`.
    pub async fn sweep(&self, alphas: &[f64]) -> Result<Vec<AlphaResult>> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let mut results = Vec::with_capacity(alphas.len());
        for &alpha in alphas {
            tracing::info!("Running SU2 at alpha = {} deg", alpha);

            let mut config = Su2Config::base();
            config.merge(self.overrides.iter().cloned());
            config.set("AOA", alpha);
            tokio::fs::write(self.work_dir.join(CONFIG_FILE), config.to_string()).await?;

            let output = Command::new(&self.executable)
                .arg(CONFIG_FILE)
                .current_dir(&self.work_dir)
                .output()
                .await?;

            let history_path = self.work_dir.join(HISTORY_FILE);
            if !output.status.success() || !history_path.exists() {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                return Err(AeroxError::ToolError {
                    tool: "SU2_CFD".to_string(),
                    status: output.status.to_string(),
                    output: combined,
                });
            }

            let history = tokio::fs::read_to_string(&history_path).await?;
            let coefficients = parse_history(&history, self.skip_iterations)?;
            tracing::debug!(
                "alpha = {}: CL = {:.4}, CD = {:.4}, CMz = {:.4}",
                alpha,
                coefficients.lift,
                coefficients.drag,
                coefficients.pitching_moment
            );
            results.push(AlphaResult {
                alpha,
                coefficients: Some(coefficients),
            });
        }
        Ok(results)
    }
}

/// Extract time-averaged coefficients from an SU2 Tecplot history file.
///
/// The file starts with a `TITLE` line, then a quoted comma-separated
/// header, then one row per solver iteration. With dual time stepping the
/// converged state of each physical time step is its last inner iteration,
/// so only the final row of each `Time_Iter` group is kept. The first
/// `skip_iterations` time steps are discarded as initialisation transient
/// and the remaining rows are averaged.
pub fn parse_history(content: &str, skip_iterations: usize) -> Result<Coefficients> {
    let parse_error = |message: String| AeroxError::ParseError {
        file: HISTORY_FILE.to_string(),
        message,
    };

    let body = content
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or("");

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_matches('"').trim() == name)
            .ok_or_else(|| parse_error(format!("missing column {}", name)))
    };
    let time_column = column("Time_Iter")?;
    let drag_column = column("CD")?;
    let lift_column = column("CL")?;
    let moment_column = column("CMz")?;

    let mut per_step: Vec<(u64, Coefficients)> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |index: usize| -> Result<f64> {
            record
                .get(index)
                .ok_or_else(|| parse_error("short row".to_string()))?
                .parse::<f64>()
                .map_err(|e| parse_error(e.to_string()))
        };

        let time_iter = field(time_column)? as u64;
        let row = Coefficients {
            lift: field(lift_column)?,
            drag: field(drag_column)?,
            pitching_moment: field(moment_column)?,
        };
        match per_step.last_mut() {
            Some((step, coefficients)) if *step == time_iter => *coefficients = row,
            _ => per_step.push((time_iter, row)),
        }
    }

    let total_steps = per_step.len();
    let usable: Vec<Coefficients> = per_step
        .into_iter()
        .filter(|(step, _)| *step > skip_iterations as u64)
        .map(|(_, coefficients)| coefficients)
        .collect();

    if usable.is_empty() {
        return Err(AeroxError::ProcessingError {
            message: format!(
                "CFD run produced {} time steps, none usable after skipping the first {}",
                total_steps, skip_iterations
            ),
        });
    }

    let n = usable.len() as f64;
    Ok(Coefficients {
        lift: usable.iter().map(|c| c.lift).sum::<f64>() / n,
        drag: usable.iter().map(|c| c.drag).sum::<f64>() / n,
        pitching_moment: usable.iter().map(|c| c.pitching_moment).sum::<f64>() / n,
    })
}
