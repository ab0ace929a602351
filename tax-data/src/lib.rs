//! Loading reference data into a [`tax_core::TaxCaseRepository`].

mod loader;

pub use loader::{AccountLoader, AccountLoaderError, AccountRecord};
