use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilingDeadline, TaxType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCase {
    pub id: i64,
    pub account_id: String,
    pub tax_type: TaxType,
    pub filing_deadline: Option<FilingDeadline>,
    pub created_at: DateTime<Utc>,
}

/// For creating new tax cases (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxCase {
    pub account_id: String,
    pub tax_type: TaxType,
    /// Left empty when the account's fiscal month could not be resolved.
    pub filing_deadline: Option<FilingDeadline>,
}
