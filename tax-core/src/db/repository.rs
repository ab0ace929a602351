use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, NewTaxCase, TaxCase};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    /// The backend refused the record. The message is meant for the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The data platform the quick-create workflow talks to.
#[async_trait]
pub trait TaxCaseRepository: Send + Sync {
    // Accounts
    async fn get_account(&self, id: &str) -> Result<Account, RepositoryError>;
    /// Inserts the account, replacing any existing account with the same id.
    async fn insert_account(&self, account: Account) -> Result<(), RepositoryError>;

    // Tax cases
    async fn create_tax_case(&self, case: NewTaxCase) -> Result<TaxCase, RepositoryError>;
    async fn list_tax_cases(
        &self,
        account_id: Option<&str>,
    ) -> Result<Vec<TaxCase>, RepositoryError>;
}
