pub mod assemble;
pub mod matrix;

pub use assemble::{AssembleStats, assemble_cohorts, discover_partitions};
pub use matrix::ExpressionMatrix;
