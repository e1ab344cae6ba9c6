#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use aerox::aerofoil::naca::NacaDesignation;
use aerox::drivers::{GmshDriver, Naca456Driver, Su2Driver, XfoilDriver};

/// Install a shell script standing in for an external tool and return its
/// absolute path.
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
test -f "$input" || exit 2
cat > naca.gnu <<'EOF'
0.0,0.0
0.25,0.05
0.5,0.06
0.75,0.04
1.0,0.0

0.0,0.0
0.25,-0.04
0.5,-0.05
0.75,-0.03
1.0,0.0
EOF
"#;

#[tokio::test]
async fn test_naca456_driver_parses_and_cleans_up() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "naca456", NACA456_SCRIPT);

    let designation = NacaDesignation::parse("2412").unwrap();
    let driver = Naca456Driver::new(Some(&executable), work.path());
    let aerofoil = driver.run(&designation).await.unwrap();

    assert_eq!(aerofoil.name, "2412");
    assert_eq!(aerofoil.coordinates.len(), 8);
    assert_eq!(aerofoil.trailing_edge, (1.0, 0.0));

    // scratch files are removed after a successful run
    assert!(!work.path().join("naca.gnu").exists());
    assert!(!work.path().join("naca.in").exists());
}

#[tokio::test]
async fn test_naca456_driver_reports_missing_output() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "naca456", "#!/bin/sh\nexit 1\n");

    let designation = NacaDesignation::parse("0012").unwrap();
    let driver = Naca456Driver::new(Some(&executable), work.path());
    let err = driver.run(&designation).await.unwrap_err();
    assert!(err.to_string().contains("naca456"));
}

const GMSH_SCRIPT: &str = r#"#!/bin/sh
test -f mesh.geo || exit 2
echo "NDIME= 2" > mesh.su2
"#;

#[tokio::test]
async fn test_gmsh_driver_produces_mesh() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "gmsh", GMSH_SCRIPT);

    let driver = GmshDriver::new(Some(&executable), work.path());
    let statements = vec!["Point( 1 ) = { 0, 0, 0 };".to_string()];
    let mesh_path = driver.run(&statements).await.unwrap();

    assert!(mesh_path.ends_with("mesh.su2"));
    let geo = std::fs::read_to_string(work.path().join("mesh.geo")).unwrap();
    assert_eq!(geo, "Point( 1 ) = { 0, 0, 0 };\n");
}

#[tokio::test]
async fn test_gmsh_driver_surfaces_tool_failure() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "gmsh", "#!/bin/sh\necho boom >&2\nexit 1\n");

    let driver = GmshDriver::new(Some(&executable), work.path());
    let err = driver.run(&["Point( 1 ) = { 0, 0, 0 };".to_string()]).await;
    let message = err.unwrap_err().to_string();
    assert!(message.contains("gmsh"));
}

const SU2_SCRIPT: &str = r#"#!/bin/sh
grep -q "^AOA=" config.cfg || exit 3
cat > history.dat <<'EOF'
TITLE = "SU2 history"
"Time_Iter", "Inner_Iter", "CD", "CL", "CMz"
0, 0, 0.10, 0.50, 0.010
1, 0, 0.12, 0.52, 0.012
2, 0, 0.20, 0.60, 0.020
EOF
"#;

#[tokio::test]
async fn test_su2_driver_sweeps_alphas() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "SU2_CFD", SU2_SCRIPT);

    let driver = Su2Driver::new(Some(&executable), work.path(), 0, vec![]);
    let results = driver.sweep(&[0.0, 2.0]).await.unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        let c = result.coefficients.unwrap();
        // time steps 1 and 2 averaged; step 0 is excluded
        assert!((c.lift - (0.52 + 0.60) / 2.0).abs() < 1e-12);
        assert!((c.drag - (0.12 + 0.20) / 2.0).abs() < 1e-12);
    }

    // last written config carries the final alpha
    let config = std::fs::read_to_string(work.path().join("config.cfg")).unwrap();
    assert!(config.contains("AOA=2"));
    assert!(config.contains("SOLVER=RANS"));
}

#[tokio::test]
async fn test_su2_driver_applies_overrides() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "SU2_CFD", SU2_SCRIPT);

    let overrides = vec![("EXT_ITER".to_string(), "500".to_string())];
    let driver = Su2Driver::new(Some(&executable), work.path(), 0, overrides);
    driver.sweep(&[4.0]).await.unwrap();

    let config = std::fs::read_to_string(work.path().join("config.cfg")).unwrap();
    assert!(config.contains("EXT_ITER=500"));
}

const XFOIL_SCRIPT: &str = r#"#!/bin/sh
cat > /dev/null
test -f aerofoil.dat || exit 2
cat > polar.dat <<'EOF'
       XFOIL         Version 6.99

 Calculated polar for: NACA 2412

   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
  ------ -------- --------- --------- -------- -------- --------
   0.000   0.2442   0.00547   0.00103  -0.0527   0.6313   0.9290
   2.000   0.4709   0.00678   0.00126  -0.0512   0.5552   0.8712
EOF
"#;

#[tokio::test]
async fn test_xfoil_driver_matches_converged_alphas() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "xfoil", XFOIL_SCRIPT);

    let aerofoil = aerox::aerofoil::Aerofoil {
        name: "2412".to_string(),
        coordinates: vec![(0.0, 0.0), (0.5, 0.06), (1.0, 0.0), (0.5, -0.05)],
        ..Default::default()
    };

    let driver = XfoilDriver::new(Some(&executable), work.path(), 1e6, 0.0);
    // alpha 4 never converged, so it is absent from the polar
    let results = driver.sweep(&aerofoil, &[0.0, 2.0, 4.0]).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!((results[0].coefficients.unwrap().lift - 0.2442).abs() < 1e-9);
    assert!((results[1].coefficients.unwrap().drag - 0.00678).abs() < 1e-9);
    assert!(results[2].coefficients.is_none());
}

#[tokio::test]
async fn test_xfoil_driver_reports_missing_polar() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let executable = fake_tool(tools.path(), "xfoil", "#!/bin/sh\ncat > /dev/null\nexit 0\n");

    let driver = XfoilDriver::new(Some(&executable), work.path(), 1e6, 0.0);
    let err = driver
        .sweep(&aerox::aerofoil::Aerofoil::default(), &[0.0])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("xfoil"));
}
