//! Defaults shared across crates.

/// Maximum number of attachments accepted for a single submission.
pub const DEFAULT_MAX_ATTACHMENTS: usize = 5;

/// Key prefix under which attachments are written in the bucket.
pub const DEFAULT_ATTACHMENT_KEY_PREFIX: &str = "attachments";

/// Cache-Control value stored with every uploaded attachment (seconds).
pub const DEFAULT_ATTACHMENT_CACHE_CONTROL: &str = "3600";

/// Content type used when the attachment bytes match no known signature.
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// Shown when the notification endpoint cannot be reached or answers garbage.
pub const GENERIC_DISPATCH_FAILURE: &str =
    "The report could not be sent. Please check your connection and try again.";

/// Shown after a report was accepted by the notification endpoint.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your report has been sent.";
