pub mod app;
pub mod config;
pub mod logging;
pub mod notify;
pub mod quick_create;

pub use notify::{Notifier, RecordingNotifier, Toast, ToastVariant, TracingNotifier};
pub use quick_create::TaxCaseQuickCreate;
