use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ParseFieldTypeError;

/// The declared type of a context field. Determines how values are coerced
/// and which operators may target the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Semver,
    Array,
    Country,
    CountryCode3,
    LanguageCode,
    LocaleCode,
    Timezone,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Semver,
        FieldType::Array,
        FieldType::Country,
        FieldType::CountryCode3,
        FieldType::LanguageCode,
        FieldType::LocaleCode,
        FieldType::Timezone,
    ];

    /// Whether values of this type are plain strings (and therefore targeted
    /// by the string operator family).
    #[must_use]
    pub fn is_string_like(self) -> bool {
        match self {
            FieldType::String
            | FieldType::Country
            | FieldType::CountryCode3
            | FieldType::LanguageCode
            | FieldType::LocaleCode
            | FieldType::Timezone => true,
            FieldType::Number
            | FieldType::Boolean
            | FieldType::Date
            | FieldType::Semver
            | FieldType::Array => false,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Semver => "semver",
            FieldType::Array => "array",
            FieldType::Country => "country",
            FieldType::CountryCode3 => "countryCode3",
            FieldType::LanguageCode => "languageCode",
            FieldType::LocaleCode => "localeCode",
            FieldType::Timezone => "timezone",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseFieldTypeError {
                name: s.to_owned(),
            })
    }
}

/// How the elements of an array field compare against constraint values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArrayItems {
    #[default]
    Strings,
    Numbers,
}

/// Admin-declared constraints on the values a field may take.
///
/// These rules drive [`Snapshot::validate_context()`](crate::Snapshot::validate_context)
/// and legal-value checks in
/// [`Snapshot::validate_conditions()`](crate::Snapshot::validate_conditions).
/// Only `trim_whitespace` affects evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationRules {
    pub required: bool,
    pub legal_values: Vec<String>,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub integer_only: bool,
    pub trim_whitespace: bool,
}

/// Definition of a context field, owned by the admin collaborator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContextFieldDefinition {
    pub key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub field_type: FieldType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub validation_rules: ValidationRules,
    #[cfg_attr(feature = "serde", serde(default))]
    pub array_items: ArrayItems,
}

impl ContextFieldDefinition {
    #[must_use]
    pub fn new(key: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_owned(),
            display_name: key.to_owned(),
            description: String::new(),
            field_type,
            validation_rules: ValidationRules::default(),
            array_items: ArrayItems::default(),
        }
    }

    #[must_use]
    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = name.to_owned();
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: ValidationRules) -> Self {
        self.validation_rules = rules;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.validation_rules.required = true;
        self
    }

    #[must_use]
    pub fn legal_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validation_rules.legal_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn trim_whitespace(mut self) -> Self {
        self.validation_rules.trim_whitespace = true;
        self
    }

    #[must_use]
    pub fn array_items(mut self, items: ArrayItems) -> Self {
        self.array_items = items;
        self
    }
}
