//! Transient notifications
//!
//! The console surfaces non-inline errors as short-lived notices. Rendering
//! is owned by the host; this module only defines the port.

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use parking_lot::Mutex;
use tracing::{error, info, warn};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    /// Suggested recovery, shown under the message
    pub action: Option<String>,
    pub kind: Option<ErrorKind>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
            action: None,
            kind: None,
        }
    }

    /// Build an error notice, keeping the server message when present
    pub fn from_error(err: &AppError) -> Self {
        let severity = match err.kind() {
            ErrorKind::Validation | ErrorKind::RateLimited => Severity::Warning,
            _ => Severity::Error,
        };
        Self {
            severity,
            message: err.message().to_string(),
            action: Some(err.recovery().to_string()),
            kind: Some(err.kind()),
        }
    }
}

/// Notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only records notices through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success | Severity::Info => info!(message = %notice.message, "Notice"),
            Severity::Warning => warn!(message = %notice.message, "Notice"),
            Severity::Error => error!(
                message = %notice.message,
                kind = ?notice.kind,
                "Notice"
            ),
        }
    }
}

/// Notifier that keeps every notice in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded notices
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
