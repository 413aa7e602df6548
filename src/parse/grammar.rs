use winnow::combinator::{cut_err, opt, preceded, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::types::{Identifier, Version};

// -- Components -------------------------------------------------------------

fn numeric(input: &mut &str) -> ModalResult<u64> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .verify(|digits: &str| digits == "0" || !digits.starts_with('0'))
        .try_map(|digits: &str| digits.parse::<u64>())
        .context(StrContext::Expected(StrContextValue::Description(
            "numeric version component",
        )))
        .parse_next(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn pre_identifier(input: &mut &str) -> ModalResult<Identifier> {
    take_while(1.., is_identifier_char)
        .verify_map(|s: &str| {
            if s.bytes().all(|b| b.is_ascii_digit()) {
                // Numeric prerelease identifiers must not carry leading zeros.
                if s.len() > 1 && s.starts_with('0') {
                    None
                } else {
                    s.parse().ok().map(Identifier::Numeric)
                }
            } else {
                Some(Identifier::AlphaNumeric(s.to_owned()))
            }
        })
        .context(StrContext::Expected(StrContextValue::Description(
            "prerelease identifier",
        )))
        .parse_next(input)
}

fn build_identifier(input: &mut &str) -> ModalResult<String> {
    take_while(1.., is_identifier_char)
        .map(|s: &str| s.to_owned())
        .context(StrContext::Expected(StrContextValue::Description(
            "build identifier",
        )))
        .parse_next(input)
}

// -- Top-level parser -------------------------------------------------------

pub(super) fn version(input: &mut &str) -> ModalResult<Version> {
    let _ = opt(one_of(['v', 'V'])).parse_next(input)?;

    let major = numeric.parse_next(input)?;
    let minor = opt(preceded('.', cut_err(numeric))).parse_next(input)?;
    let patch = match minor {
        Some(_) => opt(preceded('.', cut_err(numeric))).parse_next(input)?,
        None => None,
    };

    let pre: Option<Vec<Identifier>> =
        opt(preceded('-', cut_err(separated(1.., pre_identifier, '.')))).parse_next(input)?;
    let build: Option<Vec<String>> =
        opt(preceded('+', cut_err(separated(1.., build_identifier, '.')))).parse_next(input)?;

    Ok(Version {
        major,
        minor: minor.unwrap_or(0),
        patch: patch.unwrap_or(0),
        pre: pre.unwrap_or_default(),
        build: build.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use crate::parse::parse_version;
    use crate::types::{Identifier, Version};

    #[test]
    fn parse_full_version() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert!(v.pre.is_empty());
        assert!(v.build.is_empty());
    }

    #[test]
    fn parse_partial_versions() {
        assert_eq!(parse_version("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(parse_version("2.1").unwrap(), Version::new(2, 1, 0));
    }

    #[test]
    fn parse_v_prefix() {
        assert_eq!(parse_version("v1.4.0").unwrap(), Version::new(1, 4, 0));
        assert_eq!(parse_version("V1.4.0").unwrap(), Version::new(1, 4, 0));
    }

    #[test]
    fn parse_prerelease() {
        let v = parse_version("1.0.0-alpha.1").unwrap();
        assert_eq!(
            v.pre,
            vec![Identifier::AlphaNumeric("alpha".into()), Identifier::Numeric(1)]
        );
    }

    #[test]
    fn parse_prerelease_with_hyphen() {
        let v = parse_version("1.0.0-x-y.7").unwrap();
        assert_eq!(
            v.pre,
            vec![Identifier::AlphaNumeric("x-y".into()), Identifier::Numeric(7)]
        );
    }

    #[test]
    fn parse_build_metadata() {
        let v = parse_version("1.0.0+20240101.sha-5114f85").unwrap();
        assert_eq!(v.build, vec!["20240101".to_owned(), "sha-5114f85".to_owned()]);
        let v = parse_version("1.0.0-rc.1+001").unwrap();
        assert_eq!(v.pre.len(), 2);
        assert_eq!(v.build, vec!["001".to_owned()]);
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(parse_version("  1.2.3\n").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn rejects_malformed_versions() {
        for input in [
            "", "x", "1.", "1.2.", "1.x", "1.2.3.4", "01.2.3", "1.02.3", "1.2.3-",
            "1.2.3-01", "1.2.3+", "1.2.3-alpha..1", "-1.2.3", "1.2.3 beta",
        ] {
            assert!(parse_version(input).is_err(), "expected error for {input:?}");
        }
    }

    #[test]
    fn zero_components_allowed() {
        assert_eq!(parse_version("0.0.0").unwrap(), Version::new(0, 0, 0));
        let v = parse_version("1.0.0-0.3.7").unwrap();
        assert_eq!(v.pre[0], Identifier::Numeric(0));
    }

    #[test]
    fn error_keeps_original_input() {
        let err = parse_version("1.x").unwrap_err();
        assert_eq!(err.input(), "1.x");
        assert!(err.to_string().starts_with("invalid version '1.x'"));
    }
}
