use thiserror::Error;

pub type Result<T, E = HotkeyError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum HotkeyError {
    /// No native backend is wired up for this OS. Not retryable.
    #[error("Global hotkeys are not supported on {0}")]
    UnsupportedPlatform(&'static str),

    #[error("Failed to register {hotkey}, {reason}")]
    RegistrationFailed { hotkey: String, reason: String },

    #[error("No hotkey with id {0} is running")]
    NotRunning(i32),

    #[error("Hotkey watcher is unavailable, {0}")]
    WatcherUnavailable(String),
}
