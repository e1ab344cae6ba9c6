pub mod config;
pub mod driver;

pub use config::Su2Config;
pub use driver::Su2Driver;
