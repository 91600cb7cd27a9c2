use anyhow::Result;
use std::sync::Arc;

use super::{EmailAlert, Mailer};

/// Fire-and-forget email delivery, one detached thread per alert.
///
/// Nothing is queued, retried or joined. The outcome of each send is printed
/// to stdout and nowhere else.
#[derive(Clone, Default)]
pub struct AlertDispatcher {
    mailer: Option<Arc<dyn Mailer>>,
}

impl AlertDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer: Some(mailer),
        }
    }

    /// Dispatcher that drops every alert (no credentials, or email turned off).
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub fn dispatch(&self, alert: EmailAlert) {
        let Some(mailer) = self.mailer.as_ref() else {
            log::debug!("email disabled; not sending '{}'", alert.subject);
            return;
        };
        let mailer = Arc::clone(mailer);
        let spawned = std::thread::Builder::new()
            .name("email-alert".to_string())
            .spawn(move || {
                let result = mailer.send(&alert);
                log::debug!("email '{}' delivered: {}", alert.subject, result.is_ok());
                println!("{}", outcome_line(&result));
            });
        if let Err(e) = spawned {
            println!("Failed to send email: cannot start sender thread: {}", e);
        }
    }
}

/// Operator-facing result of one send.
fn outcome_line(result: &Result<()>) -> String {
    match result {
        Ok(()) => "Email sent successfully.".to_string(),
        Err(e) => format!("Failed to send email: {:#}", e),
    }
}
