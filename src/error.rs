use thiserror::Error;

use crate::parse::SemverError;
use crate::{CatalogError, ParseFieldTypeError, ParseOperatorError};

/// Unified error type for the fallible operations of the crate: building a
/// snapshot and parsing operators, field types and versions.
#[derive(Debug, Error)]
pub enum FlagpoleError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Semver(#[from] SemverError),

    #[error(transparent)]
    UnknownOperator(#[from] ParseOperatorError),

    #[error(transparent)]
    UnknownFieldType(#[from] ParseFieldTypeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldType, Operator, Version};

    fn parse_all(
        op: &str,
        ty: &str,
        version: &str,
    ) -> Result<(Operator, FieldType, Version), FlagpoleError> {
        Ok((op.parse()?, ty.parse()?, version.parse()?))
    }

    #[test]
    fn question_mark_converts_each_source() {
        assert!(parse_all("str_eq", "country", "1.0.0").is_ok());
        assert!(matches!(
            parse_all("str_like", "country", "1.0.0"),
            Err(FlagpoleError::UnknownOperator(_))
        ));
        assert!(matches!(
            parse_all("str_eq", "currency", "1.0.0"),
            Err(FlagpoleError::UnknownFieldType(_))
        ));
        assert!(matches!(
            parse_all("str_eq", "country", "1.x"),
            Err(FlagpoleError::Semver(_))
        ));
    }

    #[test]
    fn transparent_messages() {
        let err = FlagpoleError::from(CatalogError::DuplicateSegment { id: "vip".into() });
        assert_eq!(err.to_string(), "duplicate segment id 'vip'");
    }
}
