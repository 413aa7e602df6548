use regex::RegexBuilder;

use crate::coerce::{Coerced, Coercer, Element, TypedValue};
use crate::{
    Arity, Condition, Constraint, Context, ContextFieldDefinition, FieldType, Operator, Snapshot,
    UnresolvedSegment, ValidationError,
};

pub(crate) fn validate_conditions(
    conditions: &[Condition],
    snapshot: &Snapshot,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, condition) in conditions.iter().enumerate() {
        match condition {
            Condition::Constraint(c) => check_constraint(index, c, snapshot, &mut errors),
            Condition::Segment(_) => {
                // Expanding just this reference surfaces nested problems too.
                let group = snapshot.segments().expand(std::slice::from_ref(condition));
                match group.unresolved() {
                    Some(UnresolvedSegment::Missing(id)) => {
                        errors.push(ValidationError::UnknownSegment {
                            index,
                            segment: id.clone(),
                        });
                    }
                    Some(UnresolvedSegment::Cycle(path)) => {
                        errors.push(ValidationError::CyclicSegment { path: path.clone() });
                    }
                    None => {}
                }
            }
        }
    }
    errors
}

pub(crate) fn validate_segments(snapshot: &Snapshot) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for segment in snapshot.segments().iter() {
        for (index, condition) in segment.conditions.iter().enumerate() {
            let mut local = Vec::new();
            match condition {
                Condition::Constraint(c) => check_constraint(index, c, snapshot, &mut local),
                Condition::Segment(id) => {
                    if snapshot.segments().get(id).is_none() {
                        local.push(ValidationError::UnknownSegment {
                            index,
                            segment: id.clone(),
                        });
                    }
                }
            }
            errors.extend(local.into_iter().map(|source| ValidationError::InSegment {
                segment: segment.id.clone(),
                source: Box::new(source),
            }));
        }
    }
    if let Some(path) = snapshot.segments().find_cycle() {
        errors.push(ValidationError::CyclicSegment { path });
    }
    errors
}

fn check_constraint(
    index: usize,
    c: &Constraint,
    snapshot: &Snapshot,
    errors: &mut Vec<ValidationError>,
) {
    let field = c.context_name.as_str();
    let op = c.operator;
    let definition = snapshot.registry().get(field);
    let field_type = match definition {
        Some(def) => def.field_type,
        None => {
            errors.push(ValidationError::UnknownField {
                index,
                field: field.to_owned(),
            });
            snapshot.config().unknown_field_policy().resolve(op)
        }
    };

    if !op.supports(field_type) {
        errors.push(ValidationError::UnsupportedOperator {
            index,
            field: field.to_owned(),
            operator: op,
            field_type,
        });
        return;
    }

    if c.value.is_some() && c.values.is_some() {
        errors.push(ValidationError::AmbiguousValue {
            index,
            field: field.to_owned(),
        });
    }

    let coercer = definition
        .map_or_else(|| Coercer::new(field_type), Coercer::for_field)
        .epoch_unit(snapshot.config().epoch_unit());

    match op.arity() {
        Arity::None => {
            if c.value.is_some() || c.values.is_some() {
                errors.push(ValidationError::UnexpectedValue {
                    index,
                    field: field.to_owned(),
                    operator: op,
                });
            }
        }
        Arity::Single => match &c.value {
            None => errors.push(ValidationError::MissingValue {
                index,
                field: field.to_owned(),
                operator: op,
            }),
            Some(value) if op == Operator::StrRegex => {
                if let Err(e) = RegexBuilder::new(value)
                    .case_insensitive(c.case_insensitive)
                    .size_limit(snapshot.config().regex_size_limit())
                    .build()
                {
                    errors.push(ValidationError::InvalidRegex {
                        index,
                        field: field.to_owned(),
                        reason: e.to_string(),
                    });
                }
            }
            Some(value) => {
                if coercer.literal(Some(value)).is_invalid() {
                    errors.push(invalid_value(index, field, value, field_type));
                }
            }
        },
        Arity::Multi => match &c.values {
            None => errors.push(ValidationError::MissingValues {
                index,
                field: field.to_owned(),
                operator: op,
            }),
            Some(values) if values.is_empty() => errors.push(ValidationError::EmptyValues {
                index,
                field: field.to_owned(),
                operator: op,
            }),
            Some(values) => {
                for value in values {
                    if coercer.literal_set(Some(std::slice::from_ref(value))).is_invalid() {
                        errors.push(invalid_value(index, field, value, field_type));
                    }
                }
            }
        },
    }

    if let Some(def) = definition {
        check_legal_values(index, c, def, errors);
    }
}

fn invalid_value(index: usize, field: &str, value: &str, expected: FieldType) -> ValidationError {
    ValidationError::InvalidValue {
        index,
        field: field.to_owned(),
        value: value.to_owned(),
        expected,
    }
}

/// Equality-style operators must compare against declared legal values.
fn check_legal_values(
    index: usize,
    c: &Constraint,
    def: &ContextFieldDefinition,
    errors: &mut Vec<ValidationError>,
) {
    let legal = &def.validation_rules.legal_values;
    if legal.is_empty() {
        return;
    }
    let candidates: &[String] = match c.operator {
        Operator::StrEq => c.value.as_slice(),
        Operator::StrIn | Operator::ArrAny | Operator::ArrAll => {
            c.values.as_deref().unwrap_or_default()
        }
        _ => return,
    };
    let trim = def.validation_rules.trim_whitespace;
    for value in candidates {
        let value_cmp = if trim { value.trim() } else { value.as_str() };
        let known = legal.iter().any(|l| {
            if c.case_insensitive {
                l.to_lowercase() == value_cmp.to_lowercase()
            } else {
                l == value_cmp
            }
        });
        if !known {
            errors.push(ValidationError::IllegalValue {
                index,
                field: c.context_name.clone(),
                value: value.clone(),
            });
        }
    }
}

pub(crate) fn validate_context(ctx: &Context, snapshot: &Snapshot) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for def in snapshot.registry().iter() {
        let key = def.key.as_str();
        let Some(raw) = ctx.get(key) else {
            if def.validation_rules.required {
                errors.push(ValidationError::MissingRequired { field: key.to_owned() });
            }
            continue;
        };
        let coercer = Coercer::for_field(def).epoch_unit(snapshot.config().epoch_unit());
        let Coerced::Value(typed) = coercer.context(Some(raw)) else {
            errors.push(ValidationError::ContextTypeMismatch {
                field: key.to_owned(),
                expected: def.field_type,
                found: raw.kind(),
            });
            continue;
        };
        check_rules(def, &typed, snapshot, &mut errors);
    }
    errors
}

fn check_rules(
    def: &ContextFieldDefinition,
    typed: &TypedValue,
    snapshot: &Snapshot,
    errors: &mut Vec<ValidationError>,
) {
    let rules = &def.validation_rules;
    let field = def.key.as_str();
    match typed {
        TypedValue::Str(s) => {
            check_legal(field, s, &rules.legal_values, errors);
            check_length(field, s.chars().count(), rules.min_length, rules.max_length, errors);
            if let Some(pattern) = &rules.pattern {
                match RegexBuilder::new(pattern)
                    .size_limit(snapshot.config().regex_size_limit())
                    .build()
                {
                    Ok(re) => {
                        if !re.is_match(s) {
                            errors.push(ValidationError::PatternMismatch {
                                field: field.to_owned(),
                                value: s.clone(),
                            });
                        }
                    }
                    Err(e) => errors.push(ValidationError::InvalidFieldPattern {
                        field: field.to_owned(),
                        reason: e.to_string(),
                    }),
                }
            }
        }
        TypedValue::Number(n) => {
            let below = rules.min.is_some_and(|min| *n < min);
            let above = rules.max.is_some_and(|max| *n > max);
            if below || above {
                errors.push(ValidationError::OutOfRange {
                    field: field.to_owned(),
                    value: *n,
                });
            }
            if rules.integer_only && n.fract() != 0.0 {
                errors.push(ValidationError::NotInteger {
                    field: field.to_owned(),
                    value: *n,
                });
            }
        }
        TypedValue::Set(items) => {
            check_length(field, items.len(), rules.min_length, rules.max_length, errors);
            for item in items {
                if let Element::Str(s) = item {
                    check_legal(field, s, &rules.legal_values, errors);
                }
            }
        }
        TypedValue::Bool(_) | TypedValue::Date(_) | TypedValue::Semver(_) => {}
    }
}

fn check_legal(field: &str, value: &str, legal: &[String], errors: &mut Vec<ValidationError>) {
    if !legal.is_empty() && !legal.iter().any(|l| l == value) {
        errors.push(ValidationError::NotLegalValue {
            field: field.to_owned(),
            value: value.to_owned(),
        });
    }
}

fn check_length(
    field: &str,
    len: usize,
    min: Option<usize>,
    max: Option<usize>,
    errors: &mut Vec<ValidationError>,
) {
    if min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max) {
        errors.push(ValidationError::LengthOutOfRange {
            field: field.to_owned(),
            len,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ArrayItems, Condition, Context, ContextFieldDefinition, FieldType, Operator, Segment,
        Snapshot, ValidationError, ValidationRules, field, segment,
    };

    fn snapshot() -> Snapshot {
        Snapshot::builder()
            .field(
                ContextFieldDefinition::new("country", FieldType::Country)
                    .legal_values(["KR", "US", "JP"]),
            )
            .field(ContextFieldDefinition::new("userLevel", FieldType::Number))
            .field(ContextFieldDefinition::new("appVersion", FieldType::Semver))
            .field(ContextFieldDefinition::new("tags", FieldType::Array))
            .segment(Segment::new("veterans", [field("userLevel").is(Operator::NumGte, 50)]))
            .build()
            .unwrap()
    }

    fn check(conditions: Vec<Condition>) -> Vec<ValidationError> {
        snapshot().validate_conditions(&conditions)
    }

    #[test]
    fn clean_conditions_have_no_errors() {
        let errors = check(vec![
            field("country").is_any(Operator::StrIn, ["KR", "US"]).into(),
            field("appVersion").is(Operator::SemverGte, "1.2.0").into(),
            field("tags").is_any(Operator::ArrAny, ["vip"]).into(),
            segment("veterans"),
        ]);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn unknown_field() {
        let errors = check(vec![field("score").is(Operator::StrEq, "1").into()]);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownField {
                index: 0,
                field: "score".into()
            }]
        );
        // Unknown fields are strings, so a numeric operator is also unsupported.
        let errors = check(vec![field("score").is(Operator::NumGt, 1).into()]);
        assert!(matches!(
            errors.as_slice(),
            [
                ValidationError::UnknownField { index: 0, .. },
                ValidationError::UnsupportedOperator {
                    index: 0,
                    field_type: FieldType::String,
                    ..
                },
            ]
        ));
    }

    #[test]
    fn unsupported_operator() {
        let errors = check(vec![field("country").is(Operator::NumGt, 1).into()]);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::UnsupportedOperator { index: 0, operator: Operator::NumGt, .. }]
        ));
    }

    #[test]
    fn shape_errors() {
        let errors = check(vec![
            field("userLevel").check(Operator::NumGt).into(),
            field("country").check(Operator::StrIn).into(),
            field("tags").is(Operator::ArrEmpty, "x").into(),
            field("country").is_any(Operator::StrIn, Vec::<&str>::new()).into(),
            field("tags").is_any(Operator::ArrAll, Vec::<&str>::new()).into(),
        ]);
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(matches!(errors[0], ValidationError::MissingValue { index: 0, .. }));
        assert!(matches!(errors[1], ValidationError::MissingValues { index: 1, .. }));
        assert!(matches!(errors[2], ValidationError::UnexpectedValue { index: 2, .. }));
        assert!(matches!(
            errors[3],
            ValidationError::EmptyValues { index: 3, operator: Operator::StrIn, .. }
        ));
        assert!(matches!(
            errors[4],
            ValidationError::EmptyValues { index: 4, operator: Operator::ArrAll, .. }
        ));
    }

    #[test]
    fn ambiguous_value() {
        let mut c = field("country").is(Operator::StrEq, "KR");
        c.values = Some(vec!["US".into()]);
        let errors = check(vec![c.into()]);
        assert!(errors.contains(&ValidationError::AmbiguousValue {
            index: 0,
            field: "country".into()
        }));
    }

    #[test]
    fn invalid_values() {
        let errors = check(vec![
            field("appVersion").is(Operator::SemverGt, "1.x").into(),
            field("userLevel").is_any(Operator::NumIn, ["1", "two"]).into(),
        ]);
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidValue {
                    index: 0,
                    field: "appVersion".into(),
                    value: "1.x".into(),
                    expected: FieldType::Semver,
                },
                ValidationError::InvalidValue {
                    index: 1,
                    field: "userLevel".into(),
                    value: "two".into(),
                    expected: FieldType::Number,
                },
            ]
        );
    }

    #[test]
    fn invalid_regex() {
        let errors = check(vec![field("country").is(Operator::StrRegex, "(").into()]);
        assert!(matches!(errors.as_slice(), [ValidationError::InvalidRegex { index: 0, .. }]));
    }

    #[test]
    fn illegal_values() {
        let errors = check(vec![field("country").is_any(Operator::StrIn, ["KR", "FR"]).into()]);
        assert_eq!(
            errors,
            vec![ValidationError::IllegalValue {
                index: 0,
                field: "country".into(),
                value: "FR".into()
            }]
        );
        let errors = check(vec![field("country").is(Operator::StrEq, "kr").ignore_case().into()]);
        assert!(errors.is_empty());
        // Substring operators are not checked against legal values.
        let errors = check(vec![field("country").is(Operator::StrContains, "K").into()]);
        assert!(errors.is_empty());
    }

    #[test]
    fn unknown_segment() {
        let errors = check(vec![segment("ghost")]);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownSegment {
                index: 0,
                segment: "ghost".into()
            }]
        );
    }

    #[test]
    fn segment_validation() {
        let snapshot = Snapshot::builder()
            .field(ContextFieldDefinition::new("userLevel", FieldType::Number))
            .segment(Segment::new("a", [segment("b")]))
            .segment(Segment::new("b", [segment("a")]))
            .segment(Segment::new("bad", [field("userLevel").is(Operator::NumGt, "x")]))
            .build()
            .unwrap();
        let errors = snapshot.validate_segments();
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(matches!(
            &errors[0],
            ValidationError::InSegment { segment, .. } if segment == "bad"
        ));
        assert_eq!(
            errors[1],
            ValidationError::CyclicSegment {
                path: vec!["a".into(), "b".into(), "a".into()]
            }
        );
        let errors = snapshot.validate_conditions(&[segment("a")]);
        assert!(matches!(errors.as_slice(), [ValidationError::CyclicSegment { .. }]));
    }

    #[test]
    fn context_validation() {
        let snapshot = Snapshot::builder()
            .field(
                ContextFieldDefinition::new("country", FieldType::Country)
                    .required()
                    .legal_values(["KR", "US"]),
            )
            .field(
                ContextFieldDefinition::new("userLevel", FieldType::Number).rules(ValidationRules {
                    min: Some(1.0),
                    max: Some(100.0),
                    integer_only: true,
                    ..ValidationRules::default()
                }),
            )
            .field(
                ContextFieldDefinition::new("nickname", FieldType::String).rules(ValidationRules {
                    pattern: Some("^[a-z]+$".into()),
                    max_length: Some(5),
                    ..ValidationRules::default()
                }),
            )
            .field(
                ContextFieldDefinition::new("owned", FieldType::Array)
                    .array_items(ArrayItems::Numbers)
                    .rules(ValidationRules {
                        min_length: Some(1),
                        ..ValidationRules::default()
                    }),
            )
            .build()
            .unwrap();

        assert!(snapshot
            .validate_context(
                &Context::new()
                    .set("country", "KR")
                    .set("userLevel", 12_i64)
                    .set("nickname", "kim")
                    .set("owned", vec![1_i64])
            )
            .is_empty());

        let errors = snapshot.validate_context(
            &Context::new()
                .set("userLevel", 12.5)
                .set("nickname", "Kimberly")
                .set("owned", Vec::<i64>::new()),
        );
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingRequired {
                    field: "country".into()
                },
                ValidationError::NotInteger {
                    field: "userLevel".into(),
                    value: 12.5
                },
                ValidationError::LengthOutOfRange {
                    field: "nickname".into(),
                    len: 8
                },
                ValidationError::PatternMismatch {
                    field: "nickname".into(),
                    value: "Kimberly".into()
                },
                ValidationError::LengthOutOfRange {
                    field: "owned".into(),
                    len: 0
                },
            ]
        );

        let errors = snapshot.validate_context(
            &Context::new().set("country", "FR").set("userLevel", "lots"),
        );
        assert_eq!(
            errors,
            vec![
                ValidationError::NotLegalValue {
                    field: "country".into(),
                    value: "FR".into()
                },
                ValidationError::ContextTypeMismatch {
                    field: "userLevel".into(),
                    expected: FieldType::Number,
                    found: "string"
                },
            ]
        );
    }

    #[test]
    fn out_of_range_number() {
        let snapshot = Snapshot::builder()
            .field(
                ContextFieldDefinition::new("userLevel", FieldType::Number).rules(ValidationRules {
                    max: Some(100.0),
                    ..ValidationRules::default()
                }),
            )
            .build()
            .unwrap();
        let errors = snapshot.validate_context(&Context::new().set("userLevel", 101_i64));
        assert_eq!(
            errors,
            vec![ValidationError::OutOfRange {
                field: "userLevel".into(),
                value: 101.0
            }]
        );
    }
}
