use crate::aerofoil::Aerofoil;
use crate::domain::model::{AlphaResult, PolarReport, SolverBackend};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{AeroxError, Result};

pub const JSON_FILE: &str = "polar.json";
pub const CSV_FILE: &str = "polar.csv";

/// Write the polar in each configured output format and return the path of
/// the first file written.
pub async fn write_polar<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    solver: SolverBackend,
    aerofoil: &Aerofoil,
    results: Vec<AlphaResult>,
) -> Result<String> {
    let report = PolarReport {
        aerofoil: aerofoil.name.clone(),
        solver: solver.as_str().to_string(),
        results,
    };

    let mut primary: Option<&str> = None;
    for format in config.output_formats() {
        let filename = match format.as_str() {
            "json" => {
                storage.write_file(JSON_FILE, &polar_json(&report)?).await?;
                JSON_FILE
            }
            "csv" => {
                storage
                    .write_file(CSV_FILE, polar_csv(&report.results).as_bytes())
                    .await?;
                CSV_FILE
            }
            other => {
                return Err(AeroxError::InvalidConfigValueError {
                    field: "output_formats".to_string(),
                    value: other.to_string(),
                    reason: "Supported formats: json, csv".to_string(),
                })
            }
        };
        tracing::debug!("Wrote {} rows to {}", report.results.len(), filename);
        primary.get_or_insert(filename);
    }

    let primary = primary.ok_or_else(|| AeroxError::MissingConfigError {
        field: "output_formats".to_string(),
    })?;
    Ok(format!("{}/{}", config.output_path(), primary))
}

pub fn polar_json(report: &PolarReport) -> Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report)?;
    data.push(b'\n');
    Ok(data)
}

/// `alpha,cl,cd,cm` rows; unconverged angles keep their alpha with empty
/// coefficient fields.
pub fn polar_csv(results: &[AlphaResult]) -> String {
    let mut lines = vec!["alpha,cl,cd,cm".to_string()];
    for result in results {
        match &result.coefficients {
            Some(c) => lines.push(format!(
                "{},{},{},{}",
                result.alpha, c.lift, c.drag, c.pitching_moment
            )),
            None => lines.push(format!("{},,,", result.alpha)),
        }
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Coefficients;

    #[test]
    fn test_polar_csv_marks_unconverged_rows() {
        let results = vec![
            AlphaResult {
                alpha: 0.0,
                coefficients: Some(Coefficients {
                    lift: 0.2,
                    drag: 0.01,
                    pitching_moment: -0.05,
                }),
            },
            AlphaResult {
                alpha: 16.0,
                coefficients: None,
            },
        ];
        let csv = polar_csv(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "alpha,cl,cd,cm");
        assert_eq!(lines[1], "0,0.2,0.01,-0.05");
        assert_eq!(lines[2], "16,,,");
    }

    #[test]
    fn test_polar_json_round_trips() {
        let report = PolarReport {
            aerofoil: "64-110".to_string(),
            solver: "xfoil".to_string(),
            results: vec![],
        };
        let bytes = polar_json(&report).unwrap();
        let parsed: PolarReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.aerofoil, "64-110");
        assert_eq!(parsed.solver, "xfoil");
    }
}
