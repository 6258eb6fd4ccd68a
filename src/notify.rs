use std::sync::Mutex;

/// Severity of a user-facing notification, mirroring the toast levels the
/// admin screens render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
        }
    }
}

/// The notification capability: `notify(message, level)`.
///
/// The rendering surface is out of scope, so implementations decide what a
/// "toast" is - the CLI logs through tracing, a UI would enqueue for display.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: ToastLevel);
}

/// Default notifier: routes toasts through the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: ToastLevel) {
        match level {
            ToastLevel::Success | ToastLevel::Info => tracing::info!(toast = level.as_str(), "{}", message),
            ToastLevel::Warning => tracing::warn!(toast = level.as_str(), "{}", message),
            ToastLevel::Error => tracing::error!(toast = level.as_str(), "{}", message),
        }
    }
}

/// Queueing notifier: collects toasts so a caller can drain and render them.
/// Also what the test suites install to assert on surfaced messages.
#[derive(Debug, Default)]
pub struct QueueNotifier {
    queue: Mutex<Vec<(String, ToastLevel)>>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<(String, ToastLevel)> {
        std::mem::take(&mut *self.queue.lock().unwrap())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl Notifier for QueueNotifier {
    fn notify(&self, message: &str, level: ToastLevel) {
        self.queue.lock().unwrap().push((message.to_string(), level));
    }
}
