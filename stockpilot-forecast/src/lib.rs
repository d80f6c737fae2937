pub mod design;
pub mod error;
pub mod model;
pub mod ols;

pub use design::SeasonalSpec;
pub use error::FitError;
pub use model::{DemandModel, Projection};
pub use ols::solve_least_squares;
