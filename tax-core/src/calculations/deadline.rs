//! Filing deadline calculation.
//!
//! Maps a tax type and an account's fiscal year-end month to the next
//! statutory filing date.
//!
//! # Rules
//!
//! | Tax type                    | Deadline                                          | Advance rule            |
//! |-----------------------------|---------------------------------------------------|-------------------------|
//! | 法人税 / 消費税 / other     | last day of the 2nd month after fiscal year-end   | whole years, capped     |
//! | 所得税                      | March 15                                          | one year, single step   |
//! | 相続税                      | June 30                                           | one year, single step   |
//!
//! A deadline that falls on or before `today` is advanced, so the result is
//! always strictly later than `today`. All comparisons are date-only.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tax_core::calculations::compute_deadline;
//! use tax_core::TaxType;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
//! let deadline = compute_deadline(&TaxType::CorporateTax, "3月", today).unwrap();
//!
//! assert_eq!(deadline.to_string(), "2024-05-31");
//! ```

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::models::{FilingDeadline, FiscalMonth, TaxType};

/// Months between the fiscal year-end and the month the return is due.
pub const MONTHS_AFTER_YEAR_END: u32 = 2;

/// Upper bound on year advancement for month-relative deadlines.
pub const MAX_YEAR_ADVANCES: u32 = 10;

const INCOME_TAX_DUE: (u32, u32) = (3, 15);
const INHERITANCE_TAX_DUE: (u32, u32) = (6, 30);

/// Errors that can occur during deadline calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilingDeadlineError {
    /// The fiscal month label is not one of the twelve known labels.
    #[error("unrecognized fiscal month '{0}'")]
    InvalidMonth(String),

    /// Calendar arithmetic left the range chrono can represent.
    #[error("deadline year {year} is outside the supported calendar range")]
    OutOfRange { year: i32 },
}

/// Calculator for filing deadlines relative to a fixed `today`.
#[derive(Debug, Clone, Copy)]
pub struct FilingDeadlineCalculator {
    today: NaiveDate,
    max_year_advances: u32,
}

impl FilingDeadlineCalculator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            max_year_advances: MAX_YEAR_ADVANCES,
        }
    }

    /// Uses the calendar date of `now` in its own timezone; the time of day
    /// is discarded.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::new(now.date_naive())
    }

    pub fn with_max_year_advances(
        mut self,
        max_year_advances: u32,
    ) -> Self {
        self.max_year_advances = max_year_advances;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Calculates the deadline for an already-resolved fiscal month.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDeadlineError::OutOfRange`] only when `today` sits at
    /// the edge of chrono's supported years.
    pub fn calculate(
        &self,
        tax_type: &TaxType,
        fiscal_month: FiscalMonth,
    ) -> Result<FilingDeadline, FilingDeadlineError> {
        let deadline = match tax_type {
            TaxType::CorporateTax | TaxType::ConsumptionTax | TaxType::Other(_) => {
                self.months_after_year_end(fiscal_month)?
            }
            TaxType::IncomeTax => self.fixed_annual(INCOME_TAX_DUE)?,
            TaxType::InheritanceTax => self.fixed_annual(INHERITANCE_TAX_DUE)?,
        };

        debug!(
            tax_type = %tax_type,
            fiscal_month = %fiscal_month,
            today = %self.today,
            %deadline,
            "filing deadline calculated"
        );

        Ok(FilingDeadline::new(deadline))
    }

    /// Resolves `fiscal_month_label` and calculates the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDeadlineError::InvalidMonth`] if the label is not one
    /// of `"1月"` … `"12月"`.
    pub fn calculate_from_label(
        &self,
        tax_type: &TaxType,
        fiscal_month_label: &str,
    ) -> Result<FilingDeadline, FilingDeadlineError> {
        let fiscal_month = FiscalMonth::from_label(fiscal_month_label).ok_or_else(|| {
            debug!(label = fiscal_month_label, "fiscal month label not recognized");
            FilingDeadlineError::InvalidMonth(fiscal_month_label.to_string())
        })?;

        self.calculate(tax_type, fiscal_month)
    }

    /// Last day of the month two months after the fiscal year-end, advanced
    /// by whole years until it is after `today`.
    fn months_after_year_end(
        &self,
        fiscal_month: FiscalMonth,
    ) -> Result<NaiveDate, FilingDeadlineError> {
        let mut year = self.today.year();
        let mut month = fiscal_month.index() + MONTHS_AFTER_YEAR_END;
        if month > 11 {
            month -= 12;
            year += 1;
        }
        // one-based from here on
        let month = month + 1;

        let mut deadline = last_day_of_month(year, month)?;
        let mut advances = 0;
        while deadline <= self.today && advances < self.max_year_advances {
            year += 1;
            deadline = last_day_of_month(year, month)?;
            advances += 1;
            trace!(advances, %deadline, "advanced deadline by one year");
        }

        if deadline <= self.today {
            warn!(
                %deadline,
                today = %self.today,
                max_year_advances = self.max_year_advances,
                "deadline still not after today once the advance limit was reached"
            );
        }

        Ok(deadline)
    }

    /// A fixed month/day in the current year, or the next year when that
    /// date has already arrived.
    fn fixed_annual(
        &self,
        (month, day): (u32, u32),
    ) -> Result<NaiveDate, FilingDeadlineError> {
        let year = self.today.year();
        let deadline = ymd(year, month, day)?;
        if deadline <= self.today {
            ymd(year + 1, month, day)
        } else {
            Ok(deadline)
        }
    }
}

/// Calculates the deadline for `tax_type` given a fiscal month label.
///
/// # Errors
///
/// See [`FilingDeadlineCalculator::calculate_from_label`].
pub fn compute_deadline(
    tax_type: &TaxType,
    fiscal_month_label: &str,
    today: NaiveDate,
) -> Result<FilingDeadline, FilingDeadlineError> {
    FilingDeadlineCalculator::new(today).calculate_from_label(tax_type, fiscal_month_label)
}

/// Like [`compute_deadline`], taking "today" from a timestamp.
pub fn compute_deadline_at<Tz: TimeZone>(
    tax_type: &TaxType,
    fiscal_month_label: &str,
    now: &DateTime<Tz>,
) -> Result<FilingDeadline, FilingDeadlineError> {
    FilingDeadlineCalculator::at(now).calculate_from_label(tax_type, fiscal_month_label)
}

/// Day zero of the following month.
fn last_day_of_month(
    year: i32,
    month: u32,
) -> Result<NaiveDate, FilingDeadlineError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or(FilingDeadlineError::OutOfRange { year })
}

fn ymd(
    year: i32,
    month: u32,
    day: u32,
) -> Result<NaiveDate, FilingDeadlineError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(FilingDeadlineError::OutOfRange { year })
}
