mod error;
mod grammar;

pub use error::SemverError;

use crate::types::Version;

/// Parse a semantic version string into a [`Version`].
///
/// Accepts an optional `v` prefix and one to three numeric components
/// (`"2"` and `"2.1"` read as `2.0.0` and `2.1.0`), followed by optional
/// `-prerelease` and `+build` parts. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`SemverError`] if the input is not a valid version.
pub fn parse_version(input: &str) -> Result<Version, SemverError> {
    use winnow::Parser;
    grammar::version
        .parse(input.trim())
        .map_err(|e| SemverError::new(input, e.to_string()))
}
