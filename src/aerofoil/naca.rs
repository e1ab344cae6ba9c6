use crate::utils::error::{AeroxError, Result};

/// Camber line types accepted by naca456, with `cl=` only valid for the
/// reflexed and six-series lines.
const LIFT_COEFFICIENT_CAMBERS: [&str; 4] = ["3", "3R", "6", "6A"];

/// A NACA aerofoil definition in the terms the naca456 namelist uses.
#[derive(Debug, Clone, PartialEq)]
pub struct NacaDesignation {
    pub name: String,
    pub camber_type: String,
    pub max_camber_fraction: Option<f64>,
    pub max_camber_position: Option<f64>,
    pub thickness_type: String,
    pub thickness_fraction: f64,
    pub chord_length: f64,
    pub lift_coefficient: Option<f64>,
    /// `a`, the fraction of chord with constant loading (six-series only).
    pub constant_loading_fraction: f64,
}

impl Default for NacaDesignation {
    fn default() -> Self {
        Self {
            name: String::new(),
            camber_type: "0".to_string(),
            max_camber_fraction: None,
            max_camber_position: None,
            thickness_type: "4".to_string(),
            thickness_fraction: 0.12,
            chord_length: 1.0,
            lift_coefficient: None,
            constant_loading_fraction: 1.0,
        }
    }
}

impl NacaDesignation {
    /// Parse a NACA designation such as `"2412"` (four digit) or `"64-110"`
    /// (six series).
    pub fn parse(name: &str) -> Result<Self> {
        if name.len() == 4 && name.chars().all(|c| c.is_ascii_digit()) {
            Self::four_digit(name)
        } else if name.starts_with('6') {
            Self::six_series(name)
        } else {
            Err(AeroxError::InvalidConfigValueError {
                field: "aerofoil.name".to_string(),
                value: name.to_string(),
                reason: "Expected a four digit (e.g. 2412) or six series (e.g. 64-110) designation"
                    .to_string(),
            })
        }
    }

    fn four_digit(name: &str) -> Result<Self> {
        let digits: Vec<f64> = name
            .chars()
            .map(|c| f64::from(c.to_digit(10).unwrap_or(0)))
            .collect();

        let mut designation = Self {
            name: name.to_string(),
            ..Self::default()
        };
        if name.starts_with('0') {
            designation.camber_type = "0".to_string();
        } else {
            designation.camber_type = "2".to_string();
            designation.max_camber_fraction = Some(digits[0] * 0.01);
            designation.max_camber_position = Some(digits[1] * 0.1);
        }
        designation.thickness_fraction = (digits[2] * 10.0 + digits[3]) * 0.01;
        Ok(designation)
    }

    fn six_series(name: &str) -> Result<Self> {
        let invalid = |reason: &str| AeroxError::InvalidConfigValueError {
            field: "aerofoil.name".to_string(),
            value: name.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = name.split('-').collect();
        if parts.len() != 2 {
            return Err(invalid("Expected a six series name of the form 6x-xxx"));
        }
        let suffix = parts[1];
        if suffix.len() != 3 || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("Expected three digits after the dash"));
        }

        // suffix is known to be three ascii digits at this point
        let cl_digit = f64::from(suffix.as_bytes()[0] - b'0');
        let thickness: f64 = suffix[1..3]
            .parse::<f64>()
            .map_err(|_| invalid("Unreadable thickness digits"))?;

        let mut designation = Self {
            name: name.to_string(),
            thickness_type: parts[0].to_string(),
            thickness_fraction: thickness * 0.01,
            lift_coefficient: Some(cl_digit * 0.1),
            ..Self::default()
        };
        designation.camber_type = if suffix.starts_with('0') {
            "0".to_string()
        } else {
            "6".to_string()
        };
        Ok(designation)
    }

    /// Serialise the definition as the `&NACA ... /` Fortran namelist that
    /// naca456 reads. `dencode=3` requests dense surface sampling.
    pub fn to_namelist(&self) -> Result<String> {
        let mut entries: Vec<String> = Vec::new();

        if !self.name.is_empty() {
            entries.push(format!("name={}", self.name));
        }
        entries.push("dencode=3".to_string());

        entries.push(format!("camber='{}'", self.camber_type));
        if let Some(cmax) = self.max_camber_fraction {
            entries.push(format!("cmax={}", cmax));
        }

        entries.push(format!("toc={}", self.thickness_fraction));
        entries.push(format!("profile='{}'", self.thickness_type));

        entries.push(format!("chord={}", self.chord_length));
        if let Some(xmaxc) = self.max_camber_position {
            entries.push(format!("xmaxc={}", xmaxc));
        }

        if let Some(cl) = self.lift_coefficient {
            if !LIFT_COEFFICIENT_CAMBERS.contains(&self.camber_type.as_str()) {
                return Err(AeroxError::InvalidConfigValueError {
                    field: "aerofoil.lift_coefficient".to_string(),
                    value: cl.to_string(),
                    reason: format!(
                        "lift coefficient requires camber type 3, 3R, 6 or 6A, got {}",
                        self.camber_type
                    ),
                });
            }
            entries.push(format!("cl={}", cl));
        }

        if self.camber_type == "6" || self.camber_type == "6A" {
            entries.push(format!("a={}", self.constant_loading_fraction));
        }

        let mut output = String::from("&NACA\n");
        output.push_str(&entries.join(",\n"));
        output.push_str("/\n");
        Ok(output)
    }
}
