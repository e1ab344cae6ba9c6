pub mod naca;

use std::io::BufRead;

use crate::utils::error::{AeroxError, Result};

/// 2-D point in chord units.
pub type Coordinate = (f64, f64);

/// Aerofoil surface geometry as produced by naca456.
///
/// `coordinates` runs from the leading edge over the top surface to the
/// trailing edge and back along the bottom surface. `top` and `bottom`
/// exclude the shared leading and trailing edge points; `bottom` is ordered
/// from the trailing edge towards the leading edge.
#[derive(Debug, Clone, Default)]
pub struct Aerofoil {
    pub name: String,
    pub coordinates: Vec<Coordinate>,
    pub top: Vec<Coordinate>,
    pub bottom: Vec<Coordinate>,
    pub leading_edge: Coordinate,
    pub trailing_edge: Coordinate,
}

impl Aerofoil {
    /// Parse the `.gnu` plot file naca456 writes: two blocks of `x,y` pairs
    /// (top surface then bottom surface) separated by a line with fewer than
    /// two comma-separated fields.
    pub fn from_gnu<R: BufRead>(reader: R) -> Result<Self> {
        let mut top: Vec<Coordinate> = Vec::new();
        let mut bottom: Vec<Coordinate> = Vec::new();
        let mut in_bottom = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.trim_end().split(',').collect();
            if fields.len() < 2 {
                in_bottom = true;
                continue;
            }

            let parse = |s: &str| -> Result<f64> {
                s.trim().parse::<f64>().map_err(|e| AeroxError::ParseError {
                    file: "naca.gnu".to_string(),
                    message: format!("line {}: {}", index + 1, e),
                })
            };
            let point = (parse(fields[0])?, parse(fields[1])?);
            if in_bottom {
                bottom.push(point);
            } else {
                top.push(point);
            }
        }

        if top.len() < 2 || bottom.len() < 2 {
            return Err(AeroxError::ParseError {
                file: "naca.gnu".to_string(),
                message: format!(
                    "expected two coordinate blocks, got {} top and {} bottom points",
                    top.len(),
                    bottom.len()
                ),
            });
        }

        bottom.reverse();

        let mut coordinates = top.clone();
        coordinates.extend_from_slice(&bottom[1..bottom.len() - 1]);

        Ok(Self {
            name: String::new(),
            leading_edge: top[0],
            trailing_edge: top[top.len() - 1],
            top: top[1..top.len() - 1].to_vec(),
            bottom: bottom[1..bottom.len() - 1].to_vec(),
            coordinates,
        })
    }
}
