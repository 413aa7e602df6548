use flagpole::parse::parse_version;
use flagpole::{
    Context, ContextFieldDefinition, FieldType, FlagpoleError, Identifier, Operator, SemverError,
    Snapshot, Version, field,
};

fn v(s: &str) -> Version {
    parse_version(s).unwrap()
}

#[test]
fn precedence_chain() {
    let chain = [
        "1.0.0-alpha",
        "1.0.0-alpha.1",
        "1.0.0-alpha.beta",
        "1.0.0-beta",
        "1.0.0-beta.2",
        "1.0.0-beta.11",
        "1.0.0-rc.1",
        "1.0.0",
        "1.0.1",
        "1.1.0",
        "2.0.0",
    ];
    for pair in chain.windows(2) {
        assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
    }
}

#[test]
fn build_metadata_ignored_for_precedence() {
    assert_eq!(v("1.0.0+20240101"), v("1.0.0+sha.abc"));
    assert_eq!(v("1.0.0-rc.1+7"), v("1.0.0-rc.1"));
    assert_eq!(v("1.0.0+build").to_string(), "1.0.0+build");
}

#[test]
fn short_forms_pad_with_zero() {
    assert_eq!(v("3"), Version::new(3, 0, 0));
    assert_eq!(v("v3.1"), Version::new(3, 1, 0));
    assert_eq!(v("3.1-beta").pre, vec![Identifier::AlphaNumeric("beta".into())]);
}

#[test]
fn display_is_canonical() {
    assert_eq!(v("v1.2").to_string(), "1.2.0");
    assert_eq!(v("1.2.3-rc.1").to_string(), "1.2.3-rc.1");
}

#[test]
fn malformed_versions_rejected() {
    for input in ["", "latest", "1..2", "1.2.3.4", "01.0.0", "1.0.0-", "1.0.0-00", "v", "1.0.0+"] {
        let err = parse_version(input).unwrap_err();
        assert_eq!(err.input(), input);
    }
}

#[test]
fn error_converts_into_unified_error() {
    fn parse(s: &str) -> Result<Version, FlagpoleError> {
        Ok(s.parse::<Version>()?)
    }
    let err = parse("1.x").unwrap_err();
    assert!(matches!(err, FlagpoleError::Semver(ref e) if e.input() == "1.x"));
    assert!(err.to_string().starts_with("invalid version '1.x'"));

    let direct: SemverError = "1.x".parse::<Version>().unwrap_err();
    assert_eq!(direct.to_string(), err.to_string());
}

#[test]
fn semver_operators_use_precedence() {
    let snapshot = Snapshot::builder()
        .field(ContextFieldDefinition::new("appVersion", FieldType::Semver))
        .build()
        .unwrap();
    let ctx = Context::new().set("appVersion", "1.2.0-rc.1");

    let check = |op: Operator, value: &str| {
        snapshot.evaluate_conditions(&[field("appVersion").is(op, value).into()], &ctx)
    };
    assert!(check(Operator::SemverLt, "1.2.0"));
    assert!(check(Operator::SemverGt, "1.2.0-beta.11"));
    assert!(check(Operator::SemverEq, "v1.2.0-rc.1+ci.9"));
    assert!(!check(Operator::SemverGte, "1.2.0"));
    assert!(check(Operator::SemverLte, "1.2"));
}

#[test]
fn unparseable_context_version_fails_closed() {
    let snapshot = Snapshot::builder()
        .field(ContextFieldDefinition::new("appVersion", FieldType::Semver))
        .build()
        .unwrap();
    let ctx = Context::new().set("appVersion", "nightly");
    for op in [Operator::SemverLt, Operator::SemverGte] {
        let c = field("appVersion").is(op, "1.0.0");
        assert!(!snapshot.evaluate_conditions(&[c.clone().into()], &ctx));
        assert!(!snapshot.evaluate_conditions(&[c.invert().into()], &ctx));
    }
}
