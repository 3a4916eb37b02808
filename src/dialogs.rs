// User-facing messages
// Command failures end up here instead of unwinding through the event loop

use rfd::{MessageButtons, MessageDialog, MessageLevel};

pub trait Notifier {
    fn info(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
}

/// Native message boxes
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn info(&self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn error(&self, title: &str, message: &str) {
        tracing::error!("[dialog] {}: {}", title, message);
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Headless fallback: messages go to the log only
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, title: &str, message: &str) {
        tracing::info!("[{}] {}", title, message);
    }

    fn error(&self, title: &str, message: &str) {
        tracing::error!("[{}] {}", title, message);
    }
}

/// Surface an error result through `notifier`, passing successes through
pub fn report<T>(notifier: &dyn Notifier, title: &str, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            notifier.error(title, &message);
            None
        }
    }
}
