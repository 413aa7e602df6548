//! Value coercion: turns raw context values and raw constraint strings into
//! typed operands for a field type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{ArrayItems, ContextFieldDefinition, EpochUnit, FieldType, Value, Version};

/// A coerced, comparable value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Semver(Version),
    /// Array contents, or the operand list of a multi-value operator.
    Set(Vec<Element>),
}

/// A member of a [`TypedValue::Set`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Str(String),
    Number(f64),
    Semver(Version),
}

impl TypedValue {
    /// The value as a set member, for `*_in` membership tests.
    #[must_use]
    pub fn as_element(&self) -> Option<Element> {
        match self {
            TypedValue::Str(s) => Some(Element::Str(s.clone())),
            TypedValue::Number(n) => Some(Element::Number(*n)),
            TypedValue::Semver(v) => Some(Element::Semver(v.clone())),
            TypedValue::Bool(_) | TypedValue::Date(_) | TypedValue::Set(_) => None,
        }
    }
}

/// Result of coercing one raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Value(TypedValue),
    /// No value was supplied.
    Absent,
    /// A value was supplied but does not fit the field type.
    Invalid,
}

impl Coerced {
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Coerced::Invalid)
    }
}

impl From<Option<TypedValue>> for Coerced {
    fn from(v: Option<TypedValue>) -> Self {
        v.map_or(Coerced::Invalid, Coerced::Value)
    }
}

/// Coerce a raw context value for a field type with default options.
///
/// # Example
///
/// ```
/// use flagpole::coerce::{coerce, Coerced, TypedValue};
/// use flagpole::{FieldType, Value};
///
/// assert_eq!(
///     coerce(FieldType::Number, Some(&Value::from("12.5"))),
///     Coerced::Value(TypedValue::Number(12.5))
/// );
/// assert_eq!(coerce(FieldType::Number, None), Coerced::Absent);
/// assert_eq!(coerce(FieldType::Boolean, Some(&Value::from("yes"))), Coerced::Invalid);
/// ```
#[must_use]
pub fn coerce(field_type: FieldType, raw: Option<&Value>) -> Coerced {
    Coercer::new(field_type).context(raw)
}

/// Coercion settings for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coercer {
    field_type: FieldType,
    array_items: ArrayItems,
    fold_case: bool,
    trim: bool,
    epoch_unit: EpochUnit,
}

impl Coercer {
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            array_items: ArrayItems::default(),
            fold_case: false,
            trim: false,
            epoch_unit: EpochUnit::default(),
        }
    }

    /// Settings taken from a registered definition (type, array element
    /// kind, whitespace trimming).
    #[must_use]
    pub fn for_field(definition: &ContextFieldDefinition) -> Self {
        Self {
            field_type: definition.field_type,
            array_items: definition.array_items,
            fold_case: false,
            trim: definition.validation_rules.trim_whitespace,
            epoch_unit: EpochUnit::default(),
        }
    }

    /// Lowercase string values. Only string-like field types are affected.
    #[must_use]
    pub fn fold_case(mut self, fold: bool) -> Self {
        self.fold_case = fold && self.field_type.is_string_like();
        self
    }

    #[must_use]
    pub fn epoch_unit(mut self, unit: EpochUnit) -> Self {
        self.epoch_unit = unit;
        self
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Coerce a raw context value.
    #[must_use]
    pub fn context(&self, raw: Option<&Value>) -> Coerced {
        let Some(raw) = raw else {
            return Coerced::Absent;
        };
        let typed = match self.field_type {
            FieldType::String
            | FieldType::Country
            | FieldType::CountryCode3
            | FieldType::LanguageCode
            | FieldType::LocaleCode
            | FieldType::Timezone => render(raw).map(|s| TypedValue::Str(self.text(&s))),
            FieldType::Number => number_value(raw).map(TypedValue::Number),
            FieldType::Boolean => match raw {
                Value::Bool(b) => Some(TypedValue::Bool(*b)),
                Value::String(s) => parse_bool(s).map(TypedValue::Bool),
                Value::Int(_) | Value::Float(_) | Value::Array(_) => None,
            },
            FieldType::Date => self.date_value(raw).map(TypedValue::Date),
            FieldType::Semver => match raw {
                Value::String(s) => Version::parse(s).ok().map(TypedValue::Semver),
                Value::Int(i) if *i >= 0 => {
                    Version::parse(&i.to_string()).ok().map(TypedValue::Semver)
                }
                Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Array(_) => None,
            },
            FieldType::Array => match raw {
                Value::Array(items) => items
                    .iter()
                    .map(|item| self.array_element(item))
                    .collect::<Option<Vec<_>>>()
                    .map(TypedValue::Set),
                Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::String(_) => None,
            },
        };
        typed.into()
    }

    /// Coerce a single constraint value.
    #[must_use]
    pub fn literal(&self, raw: Option<&str>) -> Coerced {
        let Some(raw) = raw else {
            return Coerced::Absent;
        };
        let typed = match self.field_type {
            FieldType::String
            | FieldType::Country
            | FieldType::CountryCode3
            | FieldType::LanguageCode
            | FieldType::LocaleCode
            | FieldType::Timezone => Some(TypedValue::Str(self.text(raw))),
            FieldType::Number => parse_number(raw).map(TypedValue::Number),
            FieldType::Boolean => parse_bool(raw).map(TypedValue::Bool),
            FieldType::Date => self.parse_date(raw).map(TypedValue::Date),
            FieldType::Semver => Version::parse(raw).ok().map(TypedValue::Semver),
            // A lone value against an array field is one element.
            FieldType::Array => self
                .literal_element(raw)
                .map(|e| TypedValue::Set(vec![e])),
        };
        typed.into()
    }

    /// Coerce the `values` list of a multi-value constraint. Any element that
    /// fails to coerce makes the whole list invalid.
    #[must_use]
    pub fn literal_set(&self, raw: Option<&[String]>) -> Coerced {
        let Some(raw) = raw else {
            return Coerced::Absent;
        };
        raw.iter()
            .map(|item| self.literal_element(item))
            .collect::<Option<Vec<_>>>()
            .map(TypedValue::Set)
            .into()
    }

    fn literal_element(&self, raw: &str) -> Option<Element> {
        match self.field_type {
            FieldType::Number => parse_number(raw).map(Element::Number),
            FieldType::Semver => Version::parse(raw).ok().map(Element::Semver),
            FieldType::Array => match self.array_items {
                ArrayItems::Strings => Some(Element::Str(self.text(raw))),
                ArrayItems::Numbers => parse_number(raw).map(Element::Number),
            },
            FieldType::Boolean | FieldType::Date => None,
            FieldType::String
            | FieldType::Country
            | FieldType::CountryCode3
            | FieldType::LanguageCode
            | FieldType::LocaleCode
            | FieldType::Timezone => Some(Element::Str(self.text(raw))),
        }
    }

    fn array_element(&self, item: &Value) -> Option<Element> {
        match self.array_items {
            ArrayItems::Strings => render(item).map(|s| Element::Str(self.text(&s))),
            ArrayItems::Numbers => number_value(item).map(Element::Number),
        }
    }

    fn text(&self, s: &str) -> String {
        let s = if self.trim { s.trim() } else { s };
        if self.fold_case {
            s.to_lowercase()
        } else {
            s.to_owned()
        }
    }

    fn date_value(&self, raw: &Value) -> Option<DateTime<Utc>> {
        match raw {
            Value::String(s) => self.parse_date(s),
            Value::Int(i) => self.epoch(*i),
            Value::Float(f) => self.epoch_float(*f),
            Value::Bool(_) | Value::Array(_) => None,
        }
    }

    /// RFC 3339, then naive date-time (UTC), then bare date, then epoch.
    fn parse_date(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
        if let Ok(i) = s.parse::<i64>() {
            return self.epoch(i);
        }
        parse_number(s).and_then(|f| self.epoch_float(f))
    }

    fn epoch(&self, value: i64) -> Option<DateTime<Utc>> {
        let millis = match self.epoch_unit {
            EpochUnit::Millis => value,
            EpochUnit::Seconds => value.checked_mul(1000)?,
        };
        DateTime::from_timestamp_millis(millis)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn epoch_float(&self, value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let millis = match self.epoch_unit {
            EpochUnit::Millis => value,
            EpochUnit::Seconds => value * 1000.0,
        };
        // Saturating cast; out-of-range timestamps are rejected below.
        DateTime::from_timestamp_millis(millis.trunc() as i64)
    }
}

/// Canonical string form of a primitive.
fn render(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) if f.is_finite() => Some(f.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Float(_) | Value::Array(_) => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn number_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) if f.is_finite() => Some(*f),
        Value::String(s) => parse_number(s),
        Value::Float(_) | Value::Bool(_) | Value::Array(_) => None,
    }
}

/// Parse a finite `f64`. `NaN` and infinities are rejected.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
