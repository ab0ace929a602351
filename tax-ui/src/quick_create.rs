//! Quick-create form for tax cases.
//!
//! Holds the state of the form shown on an account: the selected tax type,
//! the loading flag, and the cached account. Submitting computes the filing
//! deadline from the account's fiscal year-end and creates a tax case.
//! Every outcome is reported through the [`Notifier`]; nothing is returned
//! as an error.

use std::sync::Arc;

use chrono::NaiveDate;
use tax_core::{
    compute_deadline, Account, NewTaxCase, RepositoryError, TaxCase, TaxCaseRepository, TaxType,
    TaxTypeOption,
};
use tracing::{debug, info, instrument, warn};

use crate::notify::{Notifier, Toast};

pub const CREATE_BUTTON_LABEL: &str = "申告案件を作成";
pub const CREATING_BUTTON_LABEL: &str = "作成中...";

pub const MISSING_TAX_TYPE_MESSAGE: &str =
    "申告種別を選択してください。申告種別により期限が自動計算されます。";
pub const MISSING_FISCAL_MONTH_MESSAGE: &str =
    "アカウントの決算月が設定されていません。アカウント情報を確認してください。";

pub struct TaxCaseQuickCreate<R: ?Sized, N> {
    repo: Arc<R>,
    notifier: N,
    account_id: String,
    account: Option<Account>,
    selected_tax_type: Option<TaxType>,
    is_loading: bool,
}

impl<R, N> TaxCaseQuickCreate<R, N>
where
    R: TaxCaseRepository + ?Sized,
    N: Notifier,
{
    pub fn new(
        repo: Arc<R>,
        notifier: N,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            notifier,
            account_id: account_id.into(),
            account: None,
            selected_tax_type: None,
            is_loading: false,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The account as of the last successful fetch.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn tax_type_options(&self) -> Vec<TaxTypeOption> {
        TaxType::options()
    }

    pub fn selected_tax_type(&self) -> Option<&TaxType> {
        self.selected_tax_type.as_ref()
    }

    /// Selects a tax type by its menu value. An empty value clears the
    /// selection.
    pub fn select_tax_type(
        &mut self,
        value: &str,
    ) {
        self.selected_tax_type = if value.is_empty() {
            None
        } else {
            Some(TaxType::from_label(value))
        };
        debug!(selected = ?self.selected_tax_type, "tax type changed");
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_create_disabled(&self) -> bool {
        self.selected_tax_type.is_none() || self.is_loading
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_loading {
            CREATING_BUTTON_LABEL
        } else {
            CREATE_BUTTON_LABEL
        }
    }

    /// Re-fetches the account and caches it.
    pub async fn refresh(&mut self) -> Result<&Account, RepositoryError> {
        let account = self.repo.get_account(&self.account_id).await?;
        Ok(self.account.insert(account))
    }

    /// Creates a tax case for the selected tax type, with the filing
    /// deadline computed relative to `today`.
    ///
    /// Returns the created case, or `None` after notifying the user of
    /// whatever went wrong.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn create_tax_case(
        &mut self,
        today: NaiveDate,
    ) -> Option<TaxCase> {
        let Some(tax_type) = self.selected_tax_type.clone() else {
            self.notifier.notify(Toast::error(MISSING_TAX_TYPE_MESSAGE));
            return None;
        };

        self.is_loading = true;
        let created = self.submit(tax_type, today).await;
        self.is_loading = false;

        created
    }

    async fn submit(
        &mut self,
        tax_type: TaxType,
        today: NaiveDate,
    ) -> Option<TaxCase> {
        let account = match self.current_account().await {
            Ok(account) => account,
            Err(error) => {
                warn!(%error, "account could not be loaded");
                self.notifier.notify(Toast::error(error.to_string()));
                return None;
            }
        };

        let Some(fiscal_month) = account.fiscal_year_end_label() else {
            self.notifier
                .notify(Toast::error(MISSING_FISCAL_MONTH_MESSAGE));
            return None;
        };

        // An unresolvable month still creates the case, without a deadline.
        let filing_deadline = match compute_deadline(&tax_type, fiscal_month, today) {
            Ok(deadline) => Some(deadline),
            Err(error) => {
                warn!(%error, "filing deadline left empty");
                None
            }
        };

        let new_case = NewTaxCase {
            account_id: self.account_id.clone(),
            tax_type: tax_type.clone(),
            filing_deadline,
        };

        match self.repo.create_tax_case(new_case).await {
            Ok(case) => {
                info!(id = case.id, deadline = ?case.filing_deadline, "tax case created");
                self.notifier.notify(Toast::success(format!(
                    "{}申告案件を作成しました",
                    tax_type.label()
                )));
                self.selected_tax_type = None;
                if let Err(error) = self.refresh().await {
                    warn!(%error, "account refresh failed");
                }
                Some(case)
            }
            Err(error) => {
                warn!(%error, "tax case was not created");
                self.notifier.notify(Toast::error(error.to_string()));
                None
            }
        }
    }

    async fn current_account(&mut self) -> Result<Account, RepositoryError> {
        if let Some(account) = &self.account {
            return Ok(account.clone());
        }
        self.refresh().await.cloned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tax_db_memory::MemoryRepository;

    use super::*;
    use crate::notify::{RecordingNotifier, ToastVariant};

    fn date(
        year: i32,
        month: u32,
        day: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn account(fiscal_year_end: Option<&str>) -> Account {
        Account {
            id: "001".to_string(),
            name: "株式会社みなと商事".to_string(),
            fiscal_year_end: fiscal_year_end.map(str::to_string),
            tax_accountant: None,
        }
    }

    fn setup(
        fiscal_year_end: Option<&str>
    ) -> (
        TaxCaseQuickCreate<MemoryRepository, Arc<RecordingNotifier>>,
        Arc<MemoryRepository>,
        Arc<RecordingNotifier>,
    ) {
        let repo = Arc::new(MemoryRepository::with_accounts([account(fiscal_year_end)]));
        let notifier = Arc::new(RecordingNotifier::new());
        let form = TaxCaseQuickCreate::new(repo.clone(), notifier.clone(), "001");
        (form, repo, notifier)
    }

    #[test]
    fn button_disabled_until_a_tax_type_is_selected() {
        let (mut form, _, _) = setup(Some("3月"));

        assert!(form.is_create_disabled());
        assert_eq!(form.button_label(), CREATE_BUTTON_LABEL);

        form.select_tax_type("法人税");
        assert!(!form.is_create_disabled());
        assert_eq!(form.selected_tax_type(), Some(&TaxType::CorporateTax));

        form.select_tax_type("");
        assert!(form.is_create_disabled());
    }

    #[test]
    fn options_are_the_four_menu_entries() {
        let (form, _, _) = setup(Some("3月"));

        assert_eq!(form.tax_type_options().len(), 4);
    }

    #[tokio::test]
    async fn submitting_without_selection_only_notifies() {
        let (mut form, repo, notifier) = setup(Some("3月"));

        let created = form.create_tax_case(date(2024, 4, 15)).await;

        assert_eq!(created, None);
        assert_eq!(
            notifier.toasts(),
            vec![Toast::error(MISSING_TAX_TYPE_MESSAGE)]
        );
        assert!(repo.list_tax_cases(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn creates_case_with_computed_deadline() {
        let (mut form, repo, notifier) = setup(Some("3月"));
        form.select_tax_type("法人税");

        let created = form.create_tax_case(date(2024, 4, 15)).await.unwrap();

        assert_eq!(created.account_id, "001");
        assert_eq!(created.tax_type, TaxType::CorporateTax);
        assert_eq!(
            created.filing_deadline.map(|d| d.to_string()),
            Some("2024-05-31".to_string())
        );
        assert_eq!(
            notifier.last(),
            Some(Toast::success("法人税申告案件を作成しました"))
        );
        assert_eq!(repo.list_tax_cases(Some("001")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn success_resets_selection_and_loading() {
        let (mut form, _, _) = setup(Some("3月"));
        form.select_tax_type("所得税");

        form.create_tax_case(date(2024, 4, 1)).await.unwrap();

        assert_eq!(form.selected_tax_type(), None);
        assert!(!form.is_loading());
        assert_eq!(form.button_label(), CREATE_BUTTON_LABEL);
        assert!(form.account().is_some());
    }

    #[tokio::test]
    async fn missing_fiscal_month_blocks_creation() {
        for fiscal_year_end in [None, Some("")] {
            let (mut form, repo, notifier) = setup(fiscal_year_end);
            form.select_tax_type("消費税");

            let created = form.create_tax_case(date(2024, 4, 15)).await;

            assert_eq!(created, None);
            assert_eq!(
                notifier.last(),
                Some(Toast::error(MISSING_FISCAL_MONTH_MESSAGE))
            );
            assert!(!form.is_loading());
            assert_eq!(form.selected_tax_type(), Some(&TaxType::ConsumptionTax));
            assert!(repo.list_tax_cases(None).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn unrecognized_fiscal_month_creates_case_without_deadline() {
        let (mut form, _, notifier) = setup(Some("13月"));
        form.select_tax_type("相続税");

        let created = form.create_tax_case(date(2024, 7, 1)).await.unwrap();

        assert_eq!(created.filing_deadline, None);
        assert_eq!(notifier.last().map(|t| t.variant), Some(ToastVariant::Success));
    }

    #[tokio::test]
    async fn unknown_account_reports_error() {
        let repo = Arc::new(MemoryRepository::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut form = TaxCaseQuickCreate::new(repo, notifier.clone(), "404");
        form.select_tax_type("法人税");

        let created = form.create_tax_case(date(2024, 4, 15)).await;

        assert_eq!(created, None);
        assert_eq!(
            notifier.last().map(|t| t.variant),
            Some(ToastVariant::Error)
        );
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn account_is_fetched_once_and_refreshed_after_success() {
        let (mut form, repo, _) = setup(Some("3月"));
        form.refresh().await.unwrap();
        repo.insert_account(account(Some("12月"))).await.unwrap();
        form.select_tax_type("法人税");

        let created = form.create_tax_case(date(2024, 4, 15)).await.unwrap();

        // The cached 3月 account drove the calculation; the refresh picked up 12月.
        assert_eq!(
            created.filing_deadline.map(|d| d.to_string()),
            Some("2024-05-31".to_string())
        );
        assert_eq!(
            form.account().and_then(|a| a.fiscal_year_end.as_deref()),
            Some("12月")
        );
    }
}
