pub mod engine;
pub mod report;
pub mod su2_pipeline;
pub mod xfoil_pipeline;

pub use crate::domain::model::{AlphaResult, Coefficients, PolarReport, SolverBackend};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

pub use engine::AnalysisEngine;
pub use su2_pipeline::Su2Pipeline;
pub use xfoil_pipeline::XfoilPipeline;
