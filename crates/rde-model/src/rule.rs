//! Cell rules: a closed set of checks, compiled once from their textual keys.
//!
//! A rule key such as `_istr` names a [`RuleKind`] (`istr`) and, through the
//! leading underscore, marks the call optional: optional calls pass without
//! checking when the cell is missing (the empty string between two
//! consecutive delimiters).

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::Serialize;

use crate::error::SchemaError;

/// Prefix marking a rule key as optional.
pub const OPTIONAL_PREFIX: char = '_';

/// The registry of rule kinds, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Str,
    IStr,
    Regex,
    Int,
    Float,
    Req,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Str,
        RuleKind::IStr,
        RuleKind::Regex,
        RuleKind::Int,
        RuleKind::Float,
        RuleKind::Req,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::IStr => "istr",
            Self::Regex => "regex",
            Self::Int => "int",
            Self::Float => "float",
            Self::Req => "req",
        }
    }

    /// One-line description used when listing rules.
    pub fn description(self) -> &'static str {
        match self {
            Self::Str => "equal the given text",
            Self::IStr => "equal(caseless) the given text",
            Self::Regex => "match the given regex",
            Self::Int => "parse as an integer",
            Self::Float => "parse as a float",
            Self::Req => "not be empty",
        }
    }

    pub fn takes_argument(self) -> bool {
        matches!(self, Self::Str | Self::IStr | Self::Regex)
    }

    /// Every registry key: each kind followed by its optional variant.
    pub fn registry_keys() -> impl Iterator<Item = String> {
        Self::ALL
            .into_iter()
            .flat_map(|kind| [kind.key().to_string(), format!("{OPTIONAL_PREFIX}{}", kind.key())])
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RuleKind {
    type Err = SchemaError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| SchemaError::UnknownRule {
                key: key.to_string(),
                expected: Self::registry_keys().collect::<Vec<_>>().join(", "),
            })
    }
}

/// A compiled check, carrying the argument its kind needs.
#[derive(Debug, Clone)]
pub enum Check {
    Equals(String),
    EqualsCaseless(String),
    Matches { pattern: String, regex: Regex },
    Integer,
    Float,
    Required,
}

impl Check {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Equals(_) => RuleKind::Str,
            Self::EqualsCaseless(_) => RuleKind::IStr,
            Self::Matches { .. } => RuleKind::Regex,
            Self::Integer => RuleKind::Int,
            Self::Float => RuleKind::Float,
            Self::Required => RuleKind::Req,
        }
    }

    pub fn arg(&self) -> Option<&str> {
        match self {
            Self::Equals(text) | Self::EqualsCaseless(text) => Some(text),
            Self::Matches { pattern, .. } => Some(pattern),
            Self::Integer | Self::Float | Self::Required => None,
        }
    }
}

/// One `{rule-key: argument}` entry of a cell rule.
#[derive(Debug, Clone)]
pub struct RuleCall {
    check: Check,
    optional: bool,
}

impl RuleCall {
    /// Compile a rule key and its optional argument.
    ///
    /// Fails with a [`SchemaError`] for unknown keys, arity mismatches and
    /// invalid regex patterns.
    pub fn compile(key: &str, arg: Option<String>) -> Result<Self, SchemaError> {
        let (optional, bare) = match key.strip_prefix(OPTIONAL_PREFIX) {
            Some(bare) => (true, bare),
            None => (false, key),
        };
        let kind = bare.parse::<RuleKind>().map_err(|_| SchemaError::UnknownRule {
            key: key.to_string(),
            expected: RuleKind::registry_keys().collect::<Vec<_>>().join(", "),
        })?;
        let check = match (kind, arg) {
            (RuleKind::Str, Some(text)) => Check::Equals(text),
            (RuleKind::IStr, Some(text)) => Check::EqualsCaseless(text),
            (RuleKind::Regex, Some(pattern)) => {
                // Anchored at the start only, like a prefix match.
                let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                    SchemaError::InvalidRegex {
                        key: key.to_string(),
                        pattern: pattern.clone(),
                        source,
                    }
                })?;
                Check::Matches { pattern, regex }
            }
            (RuleKind::Int, None) => Check::Integer,
            (RuleKind::Float, None) => Check::Float,
            (RuleKind::Req, None) => Check::Required,
            (RuleKind::Str | RuleKind::IStr | RuleKind::Regex, None) => {
                return Err(SchemaError::MissingArgument {
                    key: key.to_string(),
                });
            }
            (RuleKind::Int | RuleKind::Float | RuleKind::Req, Some(arg)) => {
                return Err(SchemaError::UnexpectedArgument {
                    key: key.to_string(),
                    arg,
                });
            }
        };
        Ok(Self { check, optional })
    }

    /// Plain-string sugar: `"text"` is `{str: "text"}`.
    pub fn equals(text: impl Into<String>) -> Self {
        Self {
            check: Check::Equals(text.into()),
            optional: false,
        }
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn kind(&self) -> RuleKind {
        self.check.kind()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn arg(&self) -> Option<&str> {
        self.check.arg()
    }

    /// The registry key this call was compiled from, e.g. `_int`.
    pub fn key(&self) -> String {
        if self.optional {
            format!("{OPTIONAL_PREFIX}{}", self.kind().key())
        } else {
            self.kind().key().to_string()
        }
    }
}

impl fmt::Display for RuleCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.key(), self.arg().unwrap_or_default())
    }
}

/// All calls declared for one cell, applied in declaration order.
#[derive(Debug, Clone)]
pub struct CellRule {
    calls: Vec<RuleCall>,
}

impl CellRule {
    /// A rule must declare at least one call.
    pub fn new(calls: Vec<RuleCall>) -> Result<Self, SchemaError> {
        if calls.is_empty() {
            return Err(SchemaError::InvalidRuleShape {
                found: "empty mapping".to_string(),
            });
        }
        Ok(Self { calls })
    }

    pub fn equals(text: impl Into<String>) -> Self {
        Self {
            calls: vec![RuleCall::equals(text)],
        }
    }

    pub fn calls(&self) -> &[RuleCall] {
        &self.calls
    }
}

impl From<RuleCall> for CellRule {
    fn from(call: RuleCall) -> Self {
        Self { calls: vec![call] }
    }
}

/// The value a passing rule hands back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// An optional rule skipped a missing cell.
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
}
