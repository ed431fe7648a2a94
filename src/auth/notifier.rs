// Outbound notification abstraction for password-reset delivery

use tracing::info;

use crate::auth::error::AuthError;

/// Delivery abstraction so the credential-lifecycle logic is testable
/// without a real mail transport
pub trait Notifier: Send + Sync {
    /// Deliver a password-reset link to the given address
    fn send_password_reset(&self, to_email: &str, reset_url: &str) -> Result<(), AuthError>;
}

/// Local dev notifier that logs the reset link instead of sending mail
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_password_reset(&self, to_email: &str, reset_url: &str) -> Result<(), AuthError> {
        info!(to_email = %to_email, reset_url = %reset_url, "password reset notification");
        Ok(())
    }
}

/// Build the reset link embedded in outbound notifications
pub fn build_reset_url(app_url: &str, email: &str, token: &str) -> String {
    let base = app_url.trim_end_matches('/');
    format!("{base}/reset-password?email={email}&token={token}")
}
