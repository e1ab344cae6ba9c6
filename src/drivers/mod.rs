pub mod gmsh;
pub mod naca456;
pub mod su2;
pub mod xfoil;

pub use gmsh::GmshDriver;
pub use naca456::Naca456Driver;
pub use su2::{Su2Config, Su2Driver};
pub use xfoil::XfoilDriver;
