//! Wiring shared by the binary and the integration tests.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tax_core::db::{DbConfig, RepositoryRegistry};
use tax_core::{FilingDeadline, FiscalMonth, TaxCaseRepository, TaxType, compute_deadline};
use tax_data::AccountLoader;
use tax_db_memory::MemoryRepositoryFactory;
use tracing::info;

/// Registry with every backend this build knows about.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry
}

pub async fn open_repository(config: &DbConfig) -> Result<Arc<dyn TaxCaseRepository>> {
    build_registry()
        .create(config)
        .await
        .with_context(|| format!("Failed to open '{}' backend", config.backend))
}

/// Loads accounts from a CSV file into `repo`. Returns the number loaded.
pub async fn seed_accounts(
    repo: &dyn TaxCaseRepository,
    path: &Path,
) -> Result<usize> {
    let file =
        File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let records = AccountLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
    let loaded = AccountLoader::load(repo, &records)
        .await
        .context("Failed to load accounts")?;

    info!(loaded, path = %path.display(), "accounts seeded");
    Ok(loaded)
}

/// One row of [`deadline_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineRow {
    pub fiscal_month: FiscalMonth,
    pub deadlines: Vec<(TaxType, FilingDeadline)>,
}

/// Deadlines for every fiscal month and every menu tax type as of `today`.
pub fn deadline_table(today: NaiveDate) -> Result<Vec<DeadlineRow>> {
    FiscalMonth::labels()
        .iter()
        .map(|label| {
            let fiscal_month = FiscalMonth::from_label(label)
                .with_context(|| format!("unknown month label {label}"))?;
            let deadlines = TaxType::all()
                .into_iter()
                .map(|tax_type| {
                    let deadline = compute_deadline(&tax_type, label, today)?;
                    Ok((tax_type, deadline))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(DeadlineRow {
                fiscal_month,
                deadlines,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_offers_memory_backend() {
        assert_eq!(build_registry().available_backends(), vec!["memory"]);
    }

    #[tokio::test]
    async fn open_repository_rejects_unknown_backend() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: String::new(),
        };

        let err = open_repository(&config).await.err().unwrap();

        assert!(err.to_string().contains("sqlite"));
    }

    #[test]
    fn deadline_table_covers_every_month_and_tax_type() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();

        let table = deadline_table(today).unwrap();

        assert_eq!(table.len(), 12);
        assert!(table.iter().all(|row| row.deadlines.len() == 4));
        assert_eq!(table[2].fiscal_month.label(), "3月");
        assert_eq!(table[2].deadlines[0].1.to_string(), "2024-05-31");
    }
}
