use std::sync::Arc;

use async_trait::async_trait;

use tax_core::db::repository::{RepositoryError, TaxCaseRepository};
use tax_core::db::{DbConfig, RepositoryFactory};
use tracing::debug;

use crate::repository::MemoryRepository;

/// [`RepositoryFactory`] for the in-process backend.
///
/// Register this with a [`tax_core::db::RepositoryRegistry`] to make the
/// `"memory"` backend available:
///
/// ```rust
/// use tax_core::db::RepositoryRegistry;
/// use tax_db_memory::MemoryRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(MemoryRepositoryFactory));
/// assert_eq!(registry.available_backends(), vec!["memory"]);
/// ```
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    /// Every call returns a fresh, empty repository. The connection string
    /// is ignored.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Arc<dyn TaxCaseRepository>, RepositoryError> {
        if !config.connection_string.is_empty() {
            debug!(
                connection_string = %config.connection_string,
                "memory backend ignores the connection string"
            );
        }
        Ok(Arc::new(MemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use tax_core::db::{DbConfig, RepositoryFactory};
    use tax_core::TaxCaseRepository;

    use super::MemoryRepositoryFactory;

    #[test]
    fn backend_name_is_memory() {
        assert_eq!(MemoryRepositoryFactory.backend_name(), "memory");
    }

    #[tokio::test]
    async fn each_repository_starts_empty() {
        let config = DbConfig::default();

        let repo = MemoryRepositoryFactory.create(&config).await.unwrap();
        let cases = repo.list_tax_cases(None).await.unwrap();

        assert!(cases.is_empty());
    }
}
