use std::io::Read;

use serde::Deserialize;
use tax_core::{Account, FiscalMonth, RepositoryError, TaxCaseRepository};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading account data.
#[derive(Debug, Error)]
pub enum AccountLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Row {row} has no account id")]
    MissingId { row: usize },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for AccountLoaderError {
    fn from(err: csv::Error) -> Self {
        AccountLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the accounts CSV file.
///
/// - `id`: account id, required
/// - `name`: display name
/// - `fiscal_year_end`: fiscal year-end label such as `3月` (empty when unset)
/// - `tax_accountant`: assigned accountant (empty when unset)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AccountRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub fiscal_year_end: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub tax_accountant: Option<String>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account {
            id: record.id,
            name: record.name,
            fiscal_year_end: record.fiscal_year_end,
            tax_accountant: record.tax_accountant,
        }
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Loader for account data from CSV files.
///
/// Works against any backend through the [`TaxCaseRepository`] trait.
pub struct AccountLoader;

impl AccountLoader {
    /// Parse account records from a CSV reader. Headers are matched by name
    /// and surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// * [`AccountLoaderError::CsvParse`] if the CSV is malformed.
    /// * [`AccountLoaderError::MissingId`] if a row has an empty `id`.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<AccountRecord>, AccountLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: AccountRecord = result?;
            let row = index + 1;
            if record.id.is_empty() {
                return Err(AccountLoaderError::MissingId { row });
            }
            if let Some(label) = &record.fiscal_year_end {
                if FiscalMonth::from_label(label).is_none() {
                    // Kept as-is: the account exists, its deadline just can't be computed.
                    warn!(row, account_id = %record.id, label = %label, "unrecognized fiscal year-end");
                }
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Store account records, replacing accounts with the same id.
    ///
    /// Loading the same records twice leaves the repository unchanged.
    /// Returns the number of records written.
    pub async fn load<R>(
        repo: &R,
        records: &[AccountRecord],
    ) -> Result<usize, AccountLoaderError>
    where
        R: TaxCaseRepository + ?Sized,
    {
        for record in records {
            repo.insert_account(record.clone().into()).await?;
        }
        debug!(count = records.len(), "accounts loaded");

        Ok(records.len())
    }
}
