pub mod calculations;
pub mod db;
pub mod models;

pub use calculations::{compute_deadline, FilingDeadlineCalculator, FilingDeadlineError};
pub use db::repository::{RepositoryError, TaxCaseRepository};
pub use models::*;
