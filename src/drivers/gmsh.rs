use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::utils::error::{AeroxError, Result};

const GEOMETRY_FILE: &str = "mesh.geo";
const MESH_FILE: &str = "mesh.su2";

/// Runs gmsh to turn a `.geo` geometry description into an SU2 mesh.
pub struct GmshDriver {
    executable: String,
    dimensions: u8,
    work_dir: PathBuf,
}

impl GmshDriver {
    pub fn new(executable: Option<&str>, work_dir: &Path) -> Self {
        Self {
            executable: executable.unwrap_or("gmsh").to_string(),
            dimensions: 2,
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Write `statements` to `mesh.geo` and mesh it into `mesh.su2`.
    /// Returns the path of the generated mesh.
    pub async fn run(&self, statements: &[String]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let mut geometry = statements.join("\n");
        geometry.push('\n');
        tokio::fs::write(self.work_dir.join(GEOMETRY_FILE), geometry).await?;

        tracing::debug!(
            "Meshing {} statements with {} in {}",
            statements.len(),
            self.executable,
            self.work_dir.display()
        );

        let output = Command::new(&self.executable)
            .arg(format!("-{}", self.dimensions))
            .arg(GEOMETRY_FILE)
            .arg("-format")
            .arg("su2")
            .arg("-o")
            .arg(MESH_FILE)
            .current_dir(&self.work_dir)
            .output()
            .await?;

        let mesh_path = self.work_dir.join(MESH_FILE);
        if !output.status.success() || !mesh_path.exists() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(AeroxError::ToolError {
                tool: "gmsh".to_string(),
                status: output.status.to_string(),
                output: combined,
            });
        }

        Ok(mesh_path)
    }
}
