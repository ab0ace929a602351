//! User-facing notifications.
//!
//! The quick-create form reports every outcome as a [`Toast`] handed to a
//! [`Notifier`]. How a toast is shown is up to the host.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastVariant {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Success => "成功",
            Self::Error => "エラー",
            Self::Warning => "警告",
            Self::Info => "情報",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(
        variant: ToastVariant,
        message: impl Into<String>,
    ) -> Self {
        Self {
            title: variant.title().to_string(),
            message: message.into(),
            variant,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastVariant::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastVariant::Error, message)
    }
}

impl std::fmt::Display for Toast {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "[{}] {}", self.title, self.message)
    }
}

/// Sink for toasts.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        toast: Toast,
    );
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(
        &self,
        toast: Toast,
    ) {
        (**self).notify(toast);
    }
}

/// Sends every toast to both notifiers.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(
        &self,
        toast: Toast,
    ) {
        self.0.notify(toast.clone());
        self.1.notify(toast);
    }
}

/// Writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(
        &self,
        toast: Toast,
    ) {
        match toast.variant {
            ToastVariant::Error | ToastVariant::Warning => {
                warn!(title = %toast.title, "{}", toast.message)
            }
            ToastVariant::Success | ToastVariant::Info => {
                info!(title = %toast.title, "{}", toast.message)
            }
        }
    }
}

/// Keeps every toast it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        toast: Toast,
    ) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toast_title_follows_variant() {
        assert_eq!(Toast::success("ok").title, "成功");
        assert_eq!(Toast::error("ng").title, "エラー");
        assert_eq!(Toast::new(ToastVariant::Warning, "w").title, "警告");
    }

    #[test]
    fn recording_notifier_keeps_order_and_drains() {
        let notifier = Arc::new(RecordingNotifier::new());
        notifier.notify(Toast::success("first"));
        notifier.notify(Toast::error("second"));

        assert_eq!(notifier.last().map(|t| t.message), Some("second".to_string()));
        let drained = notifier.take();

        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn pair_notifier_forwards_to_both() {
        let first = Arc::new(RecordingNotifier::new());
        let second = Arc::new(RecordingNotifier::new());
        let pair = (first.clone(), (TracingNotifier, second.clone()));

        pair.notify(Toast::success("両方"));

        assert_eq!(first.toasts(), second.toasts());
        assert_eq!(first.toasts().len(), 1);
    }

    #[test]
    fn toast_display_includes_title() {
        assert_eq!(Toast::error("失敗しました").to_string(), "[エラー] 失敗しました");
    }
}
