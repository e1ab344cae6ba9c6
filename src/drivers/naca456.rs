use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::aerofoil::naca::NacaDesignation;
use crate::aerofoil::Aerofoil;
use crate::utils::error::{AeroxError, Result};

const INPUT_FILE: &str = "naca.in";
const OUTPUT_FILE: &str = "naca.gnu";
/// Files naca456 leaves behind besides the `.gnu` plot data.
const SCRATCH_FILES: [&str; 3] = ["naca.dbg", "naca.out", INPUT_FILE];

/// Runs the naca456 executable to generate aerofoil surface coordinates.
///
/// naca456 takes the name of its namelist input file on stdin and writes
/// `naca.gnu`, `naca.out` and `naca.dbg` into the current directory, so the
/// driver confines a run to its working directory.
pub struct Naca456Driver {
    executable: String,
    work_dir: PathBuf,
}

impl Naca456Driver {
    pub fn new(executable: Option<&str>, work_dir: &Path) -> Self {
        Self {
            executable: executable.unwrap_or("naca456").to_string(),
            work_dir: work_dir.to_path_buf(),
        }
    }

    pub async fn run(&self, designation: &NacaDesignation) -> Result<Aerofoil> {
        let namelist = designation.to_namelist()?;
        tokio::fs::create_dir_all(&self.work_dir).await?;
        tokio::fs::write(self.work_dir.join(INPUT_FILE), namelist).await?;

        tracing::debug!(
            "Running {} for NACA {} in {}",
            self.executable,
            designation.name,
            self.work_dir.display()
        );

        let mut child = Command::new(&self.executable)
            .current_dir(&self.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(INPUT_FILE.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
        }
        let output = child.wait_with_output().await?;

        let gnu_path = self.work_dir.join(OUTPUT_FILE);
        if !gnu_path.exists() {
            return Err(AeroxError::ToolError {
                tool: "naca456".to_string(),
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&output.stdout).into_owned(),
            });
        }

        let gnu = tokio::fs::read(&gnu_path).await?;
        let mut aerofoil = Aerofoil::from_gnu(gnu.as_slice())?;
        aerofoil.name = designation.name.clone();

        tokio::fs::remove_file(&gnu_path).await?;
        for scratch in SCRATCH_FILES {
            // naca456 does not always write every scratch file
            let _ = tokio::fs::remove_file(self.work_dir.join(scratch)).await;
        }

        Ok(aerofoil)
    }
}
