//! Error metadata
//!
//! Every error that can reach a user (validation, attachment limits, uploads,
//! dispatch) implements [`ErrorMetadata`] so front-ends can show a message and
//! pick a log level without matching on concrete variants.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a failed upload
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "MISSING_FIELD")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same action may succeed without user changes
    fn is_recoverable(&self) -> bool;

    /// Message shown to the user
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
