use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tax_core::{Account, NewTaxCase, RepositoryError, TaxCase, TaxCaseRepository};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    tax_cases: Vec<TaxCase>,
    next_id: i64,
}

/// Repository that keeps accounts and tax cases in process memory.
///
/// Nothing survives the process. Tax case ids are assigned sequentially
/// starting at 1.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `accounts`.
    pub fn with_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = Account>,
    {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect();

        Self {
            state: RwLock::new(State {
                accounts,
                ..State::default()
            }),
        }
    }
}

#[async_trait]
impl TaxCaseRepository for MemoryRepository {
    async fn get_account(
        &self,
        id: &str,
    ) -> Result<Account, RepositoryError> {
        let state = self.state.read().await;
        state
            .accounts
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn insert_account(
        &self,
        account: Account,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        debug!(account_id = %account.id, "storing account");
        state.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn create_tax_case(
        &self,
        case: NewTaxCase,
    ) -> Result<TaxCase, RepositoryError> {
        if case.tax_type.label().is_empty() {
            return Err(RepositoryError::Rejected(
                "申告種別は必須項目です。".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&case.account_id) {
            return Err(RepositoryError::Rejected(format!(
                "アカウント '{}' が存在しません。",
                case.account_id
            )));
        }

        state.next_id += 1;
        let tax_case = TaxCase {
            id: state.next_id,
            account_id: case.account_id,
            tax_type: case.tax_type,
            filing_deadline: case.filing_deadline,
            created_at: Utc::now(),
        };
        info!(
            id = tax_case.id,
            account_id = %tax_case.account_id,
            tax_type = %tax_case.tax_type,
            "tax case created"
        );
        state.tax_cases.push(tax_case.clone());

        Ok(tax_case)
    }

    async fn list_tax_cases(
        &self,
        account_id: Option<&str>,
    ) -> Result<Vec<TaxCase>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .tax_cases
            .iter()
            .filter(|c| account_id.is_none_or(|id| c.account_id == id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tax_core::{FilingDeadline, TaxType};

    use super::*;

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {id}"),
            fiscal_year_end: Some("3月".to_string()),
            tax_accountant: None,
        }
    }

    fn new_case(account_id: &str) -> NewTaxCase {
        NewTaxCase {
            account_id: account_id.to_string(),
            tax_type: TaxType::CorporateTax,
            filing_deadline: NaiveDate::from_ymd_opt(2024, 5, 31).map(FilingDeadline::new),
        }
    }

    #[tokio::test]
    async fn get_account_returns_not_found_for_unknown_id() {
        let repo = MemoryRepository::new();

        assert!(matches!(
            repo.get_account("001").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn insert_account_replaces_existing() {
        let repo = MemoryRepository::with_accounts([account("001")]);
        let mut updated = account("001");
        updated.fiscal_year_end = Some("12月".to_string());

        repo.insert_account(updated.clone()).await.unwrap();

        assert_eq!(repo.get_account("001").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let repo = MemoryRepository::with_accounts([account("001")]);

        let first = repo.create_tax_case(new_case("001")).await.unwrap();
        let second = repo.create_tax_case(new_case("001")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(
            first.filing_deadline.map(|d| d.to_string()),
            Some("2024-05-31".to_string())
        );
    }

    #[tokio::test]
    async fn create_rejects_unknown_account() {
        let repo = MemoryRepository::new();

        let result = repo.create_tax_case(new_case("404")).await;

        assert!(matches!(result, Err(RepositoryError::Rejected(msg)) if msg.contains("404")));
        assert!(repo.list_tax_cases(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_tax_type() {
        let repo = MemoryRepository::with_accounts([account("001")]);
        let mut case = new_case("001");
        case.tax_type = TaxType::Other(String::new());

        assert!(matches!(
            repo.create_tax_case(case).await,
            Err(RepositoryError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_account() {
        let repo = MemoryRepository::with_accounts([account("001"), account("002")]);
        repo.create_tax_case(new_case("001")).await.unwrap();
        repo.create_tax_case(new_case("002")).await.unwrap();
        repo.create_tax_case(new_case("001")).await.unwrap();

        let for_first = repo.list_tax_cases(Some("001")).await.unwrap();
        let all = repo.list_tax_cases(None).await.unwrap();

        assert_eq!(for_first.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(all.len(), 3);
    }
}
