#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use aerox::core::{ConfigProvider, SolverBackend};
use aerox::mesh::MeshConfig;
use aerox::{AnalysisEngine, LocalStorage, Su2Pipeline, XfoilPipeline};

fn fake_tool(dir: &Path, name: &str, script: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path.to_string_lossy().into_owned()
}

const NACA456_SCRIPT: &str = r#"#!/bin/sh
read input
cat > naca.gnu <<'EOF'
0.0,0.0
0.1,0.03
0.25,0.05
0.5,0.06
0.75,0.04
1.0,0.0

0.0,0.0
0.1,-0.02
0.25,-0.04
0.5,-0.05
0.75,-0.03
1.0,0.0
EOF
"#;

const GMSH_SCRIPT: &str = r#"#!/bin/sh
test -f mesh.geo || exit 2
echo "NDIME= 2" > mesh.su2
"#;

const SU2_SCRIPT: &str = r#"#!/bin/sh
test -f mesh.su2 || exit 2
cat > history.dat <<'EOF'
TITLE = "SU2 history"
"Time_Iter", "Inner_Iter", "CD", "CL", "CMz"
0, 0, 0.10, 0.50, 0.010
1, 0, 0.12, 0.52, 0.012
2, 0, 0.20, 0.60, 0.020
EOF
"#;

const XFOIL_SCRIPT: &str = r#"#!/bin/sh
cat > /dev/null
cat > polar.dat <<'EOF'
       XFOIL         Version 6.99

   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
  ------ -------- --------- --------- -------- -------- --------
   0.000   0.2442   0.00547   0.00103  -0.0527   0.6313   0.9290
EOF
"#;

struct TestConfig {
    naca: String,
    alphas: Vec<f64>,
    solver: SolverBackend,
    output_path: String,
    work_dir: String,
    naca456: String,
    gmsh: Option<String>,
    su2: Option<String>,
    xfoil: Option<String>,
}

impl ConfigProvider for TestConfig {
    fn naca(&self) -> &str {
        &self.naca
    }

    fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    fn solver(&self) -> SolverBackend {
        self.solver
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn work_dir(&self) -> &str {
        &self.work_dir
    }

    fn output_formats(&self) -> Vec<String> {
        vec!["json".to_string(), "csv".to_string()]
    }

    fn mesh(&self) -> MeshConfig {
        MeshConfig::default()
    }

    fn naca456_path(&self) -> Option<&str> {
        Some(&self.naca456)
    }

    fn gmsh_path(&self) -> Option<&str> {
        self.gmsh.as_deref()
    }

    fn su2_path(&self) -> Option<&str> {
        self.su2.as_deref()
    }

    fn xfoil_path(&self) -> Option<&str> {
        self.xfoil.as_deref()
    }

    fn skip_iterations(&self) -> usize {
        0
    }

    fn su2_overrides(&self) -> Vec<(String, String)> {
        vec![]
    }

    fn reynolds_number(&self) -> f64 {
        1e6
    }

    fn mach(&self) -> f64 {
        0.0
    }
}

#[tokio::test]
async fn test_su2_pipeline_end_to_end() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let config = TestConfig {
        naca: "2412".to_string(),
        alphas: vec![0.0, 2.0],
        solver: SolverBackend::Su2,
        output_path: output.path().to_string_lossy().into_owned(),
        work_dir: work.path().to_string_lossy().into_owned(),
        naca456: fake_tool(tools.path(), "naca456", NACA456_SCRIPT),
        gmsh: Some(fake_tool(tools.path(), "gmsh", GMSH_SCRIPT)),
        su2: Some(fake_tool(tools.path(), "SU2_CFD", SU2_SCRIPT)),
        xfoil: None,
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = AnalysisEngine::new(Su2Pipeline::new(storage, config));
    let output_path = engine.run().await.unwrap();
    assert!(output_path.ends_with("polar.json"));

    let json = std::fs::read_to_string(output.path().join("polar.json")).unwrap();
    let report: aerox::core::PolarReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.aerofoil, "2412");
    assert_eq!(report.solver, "su2");
    assert_eq!(report.results.len(), 2);
    let c = report.results[0].coefficients.unwrap();
    assert!((c.lift - (0.52 + 0.60) / 2.0).abs() < 1e-12);

    let csv = std::fs::read_to_string(output.path().join("polar.csv")).unwrap();
    assert!(csv.starts_with("alpha,cl,cd,cm\n"));
    assert_eq!(csv.lines().count(), 3);

    // the meshing step really consumed the generated geometry
    let geo = std::fs::read_to_string(work.path().join("mesh.geo")).unwrap();
    assert!(geo.contains("Physical Curve( \"aerofoil\" )"));
    assert!(geo.contains("Physical Curve( \"far_field\" )"));
}

#[tokio::test]
async fn test_xfoil_pipeline_end_to_end() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let config = TestConfig {
        naca: "0012".to_string(),
        alphas: vec![0.0, 8.0],
        solver: SolverBackend::Xfoil,
        output_path: output.path().to_string_lossy().into_owned(),
        work_dir: work.path().to_string_lossy().into_owned(),
        naca456: fake_tool(tools.path(), "naca456", NACA456_SCRIPT),
        gmsh: None,
        su2: None,
        xfoil: Some(fake_tool(tools.path(), "xfoil", XFOIL_SCRIPT)),
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = AnalysisEngine::new(XfoilPipeline::new(storage, config));
    let output_path = engine.run().await.unwrap();
    assert!(output_path.ends_with("polar.json"));

    let json = std::fs::read_to_string(output.path().join("polar.json")).unwrap();
    let report: aerox::core::PolarReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.solver, "xfoil");
    assert_eq!(report.results.len(), 2);
    assert!(report.results[0].coefficients.is_some());
    // alpha 8 is missing from the polar, reported as unconverged
    assert!(report.results[1].coefficients.is_none());
}
