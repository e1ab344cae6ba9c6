use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::aerofoil::Aerofoil;
use crate::domain::model::{AlphaResult, Coefficients};
use crate::utils::error::{AeroxError, Result};

const COORDINATES_FILE: &str = "aerofoil.dat";
const POLAR_FILE: &str = "polar.dat";

/// Drives xfoil in batch mode over stdin: load the aerofoil, switch to
/// viscous analysis, accumulate a polar, and run one `ALFA` per angle.
/// Angles that fail to converge are simply absent from the polar.
pub struct XfoilDriver {
    executable: String,
    work_dir: PathBuf,
    reynolds_number: f64,
    mach: f64,
}

impl XfoilDriver {
    pub fn new(
        executable: Option<&str>,
        work_dir: &Path,
        reynolds_number: f64,
        mach: f64,
    ) -> Self {
        Self {
            executable: executable.unwrap_or("xfoil").to_string(),
            work_dir: work_dir.to_path_buf(),
            reynolds_number,
            mach,
        }
    }

    pub async fn sweep(&self, aerofoil: &Aerofoil, alphas: &[f64]) -> Result<Vec<AlphaResult>> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        tokio::fs::write(
            self.work_dir.join(COORDINATES_FILE),
            coordinates_file(aerofoil),
        )
        .await?;

        // PACC appends to an existing polar, which would mix sweeps
        let polar_path = self.work_dir.join(POLAR_FILE);
        let _ = tokio::fs::remove_file(&polar_path).await;

        let script = self.command_script(alphas);
        tracing::debug!("Running {} for {} alphas", self.executable, alphas.len());

        let mut child = Command::new(&self.executable)
            .current_dir(&self.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes()).await?;
        }
        let output = child.wait_with_output().await?;

        if !polar_path.exists() {
            return Err(AeroxError::ToolError {
                tool: "xfoil".to_string(),
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&output.stdout).into_owned(),
            });
        }

        let polar = tokio::fs::read_to_string(&polar_path).await?;
        let entries = parse_polar(&polar);

        Ok(alphas
            .iter()
            .map(|&alpha| AlphaResult {
                alpha,
                coefficients: entries
                    .iter()
                    .find(|(a, _)| (a - alpha).abs() < 1e-3)
                    .map(|(_, c)| *c),
            })
            .collect())
    }

    fn command_script(&self, alphas: &[f64]) -> String {
        let mut script = String::new();
        let _ = writeln!(script, "LOAD {}", COORDINATES_FILE);
        let _ = writeln!(script, "PANE");
        let _ = writeln!(script, "OPER");
        let _ = writeln!(script, "VISC {}", self.reynolds_number);
        let _ = writeln!(script, "MACH {}", self.mach);
        let _ = writeln!(script, "ITER 100");
        let _ = writeln!(script, "PACC");
        let _ = writeln!(script, "{}", POLAR_FILE);
        let _ = writeln!(script); // no dump file
        for alpha in alphas {
            let _ = writeln!(script, "ALFA {}", alpha);
        }
        let _ = writeln!(script);
        let _ = writeln!(script, "QUIT");
        script
    }
}

/// Labeled coordinate file in the format xfoil's `LOAD` expects: a name
/// line followed by `x y` pairs running around the aerofoil.
fn coordinates_file(aerofoil: &Aerofoil) -> String {
    let mut content = String::new();
    let _ = writeln!(content, "NACA {}", aerofoil.name);
    for (x, y) in &aerofoil.coordinates {
        let _ = writeln!(content, "  {:.6}  {:.6}", x, y);
    }
    content
}

/// Parse an xfoil polar accumulation file. Data rows follow a dashed
/// separator line; columns are alpha, CL, CD, CDp, CM.
fn parse_polar(content: &str) -> Vec<(f64, Coefficients)> {
    let mut entries = Vec::new();
    let mut in_data = false;
    for line in content.lines() {
        if !in_data {
            if line.trim_start().starts_with("---") {
                in_data = true;
            }
            continue;
        }
        let fields: Vec<f64> = line
            .split_whitespace()
            .filter_map(|f| f.parse::<f64>().ok())
            .collect();
        if fields.len() < 5 {
            continue;
        }
        entries.push((
            fields[0],
            Coefficients {
                lift: fields[1],
                drag: fields[2],
                pitching_moment: fields[4],
            },
        ));
    }
    entries
}
