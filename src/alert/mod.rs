//! Alert formatting and email delivery.
//!
//! Every `TrackEvent` becomes one line in the scrolling log. Zone entry and exit
//! additionally produce an email, handed to `AlertDispatcher`, which delivers it
//! on a detached thread. Delivery is best effort: failures are logged and
//! otherwise ignored.

mod dispatch;
mod mailtrap;
mod message;

pub use dispatch::AlertDispatcher;
pub use mailtrap::{MailSettings, MailtrapMailer, DEFAULT_MAILTRAP_API_URL};
pub use message::{email_for, log_line, EmailAlert};

use anyhow::Result;

/// Mail transport seam.
pub trait Mailer: Send + Sync {
    /// Deliver one message. Called from a background thread.
    fn send(&self, alert: &EmailAlert) -> Result<()>;
}
