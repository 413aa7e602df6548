use std::fmt;

/// Error produced when a semantic version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemverError {
    input: String,
    message: String,
}

impl SemverError {
    pub(crate) fn new(input: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_owned(),
            message: message.into(),
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for SemverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for SemverError {}
