use serde::{Deserialize, Serialize};

use super::FiscalMonth;

/// The account fields the quick-create workflow reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Raw fiscal year-end label as stored on the record. May be absent or
    /// hold a value outside the known labels.
    pub fiscal_year_end: Option<String>,
    pub tax_accountant: Option<String>,
}

impl Account {
    /// The fiscal year-end label, treating an empty string as unset.
    pub fn fiscal_year_end_label(&self) -> Option<&str> {
        self.fiscal_year_end
            .as_deref()
            .filter(|label| !label.is_empty())
    }

    pub fn fiscal_month(&self) -> Option<FiscalMonth> {
        self.fiscal_year_end_label().and_then(FiscalMonth::from_label)
    }
}
