pub mod employee;
pub mod position;

pub use employee::*;
pub use position::*;
