//! Progress notifications emitted by the orchestrator before each phase

/// Receives one human readable line per phase. Called synchronously on the
/// orchestrator's thread of control, so implementations must return quickly.
pub trait ProgressObserver: Send + Sync {
    fn notify(&self, message: &str);
}

impl<F> ProgressObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Prints progress lines to stdout
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Discards progress lines
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn notify(&self, _message: &str) {}
}
