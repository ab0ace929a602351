mod account;
mod filing_deadline;
mod fiscal_month;
mod tax_case;
mod tax_type;

pub use account::Account;
pub use filing_deadline::FilingDeadline;
pub use fiscal_month::FiscalMonth;
pub use tax_case::{NewTaxCase, TaxCase};
pub use tax_type::{TaxType, TaxTypeOption};
