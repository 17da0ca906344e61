//! In-memory provider for tests

use crate::email::{EmailProvider, OutgoingEmail, SendFuture};
use crate::error::NotificationError;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Records every email it is given
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to the service under test.
#[derive(Debug, Clone)]
pub struct MockEmailProvider {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    should_fail: Arc<AtomicBool>,
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmailProvider {
    /// Create a mock that accepts every email
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a mock that rejects every email
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_failing(true);
        mock
    }

    /// Switch failure mode on or off
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Emails sent so far
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Number of emails sent so far
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }
}

impl EmailProvider for MockEmailProvider {
    fn send(&self, email: OutgoingEmail) -> SendFuture<'_> {
        Box::pin(async move {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(NotificationError::Rejected("mock provider set to fail".to_string()));
            }

            let id = match self.sent.lock() {
                Ok(mut sent) => {
                    sent.push(email);
                    sent.len()
                },
                Err(_) => 0,
            };

            Ok(json!({ "id": format!("mock-{id}") }))
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
