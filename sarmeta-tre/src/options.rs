//! Fixed-width codec configuration.

/// Handling of strings longer than their field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Keep the leading bytes and report a [`Truncation`](crate::Truncation).
    #[default]
    Warn,
    /// Fail with [`TreError::StringTooLong`](crate::TreError::StringTooLong).
    Reject,
}

/// Settings for encoding fixed-width records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreOptions {
    /// Handling of over-long strings.
    pub truncation: TruncationPolicy,
}

impl TreOptions {
    /// Creates default options: truncation is reported, not rejected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            truncation: TruncationPolicy::Warn,
        }
    }

    /// Sets the truncation policy.
    #[must_use]
    pub const fn truncation(mut self, policy: TruncationPolicy) -> Self {
        self.truncation = policy;
        self
    }
}
