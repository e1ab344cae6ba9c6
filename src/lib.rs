pub mod aerofoil;
pub mod config;
pub mod core;
pub mod domain;
pub mod drivers;
pub mod geo;
pub mod mesh;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{AnalysisEngine, Su2Pipeline, XfoilPipeline};
pub use utils::error::{AeroxError, Result};
