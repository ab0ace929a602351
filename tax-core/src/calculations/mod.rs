//! Filing deadline calculations.
//!
//! The deadline rules are pure functions of the tax type, the account's
//! fiscal year-end month and an injected "today".

pub mod deadline;

pub use deadline::{
    compute_deadline, compute_deadline_at, FilingDeadlineCalculator, FilingDeadlineError,
    MAX_YEAR_ADVANCES, MONTHS_AFTER_YEAR_END,
};
