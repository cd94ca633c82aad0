//! Cell-rule evaluation.
//!
//! Every call of a [`CellRule`] reads the original cell text; calls do not see
//! each other's transformed values. The first failing call short-circuits,
//! otherwise the value of the last call is returned.

use std::num::IntErrorKind;

use serde::Serialize;

use rde_model::{CellRule, CellValue, Check, FailureReason, RuleCall, RuleFailure, RuleKind};

/// A missing cell is the empty string between two consecutive delimiters.
/// Placeholders such as `NA` or `-` are not missing.
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty()
}

/// Evaluate a single call against one cell.
pub fn evaluate_call(call: &RuleCall, cell: &str) -> Result<CellValue, RuleFailure> {
    if call.is_optional() && is_missing(cell) {
        return Ok(CellValue::Missing);
    }
    check_cell(call.check(), cell).map_err(|reason| RuleFailure {
        key: call.key(),
        arg: call.arg().map(str::to_string),
        cell: cell.to_string(),
        reason,
    })
}

/// Evaluate every call of a rule in declaration order.
pub fn evaluate_rule(rule: &CellRule, cell: &str) -> Result<CellValue, RuleFailure> {
    let mut value = CellValue::Text(cell.to_string());
    for call in rule.calls() {
        value = evaluate_call(call, cell)?;
    }
    Ok(value)
}

fn check_cell(check: &Check, cell: &str) -> Result<CellValue, FailureReason> {
    match check {
        Check::Equals(expected) => {
            if cell == expected {
                Ok(CellValue::Text(cell.to_string()))
            } else {
                Err(FailureReason::NotEqual {
                    expected: expected.clone(),
                })
            }
        }
        Check::EqualsCaseless(expected) => {
            if cell.to_lowercase() == expected.to_lowercase() {
                Ok(CellValue::Text(cell.to_string()))
            } else {
                Err(FailureReason::NotEqualCaseless {
                    expected: expected.clone(),
                })
            }
        }
        Check::Matches { pattern, regex } => {
            if regex.is_match(cell) {
                Ok(CellValue::Text(cell.to_string()))
            } else {
                Err(FailureReason::NoMatch {
                    pattern: pattern.clone(),
                })
            }
        }
        Check::Integer => match cell.trim().parse::<i64>() {
            Ok(value) => Ok(CellValue::Int(value)),
            // Well-formed but wider than i64: still an integer, kept as text.
            Err(err)
                if matches!(
                    err.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                Ok(CellValue::Text(cell.trim().to_string()))
            }
            Err(_) => Err(FailureReason::NotInteger),
        },
        Check::Float => cell
            .trim()
            .parse::<f64>()
            .map(CellValue::Float)
            .map_err(|_| FailureReason::NotFloat),
        Check::Required => {
            if cell.is_empty() {
                Err(FailureReason::Empty)
            } else {
                Ok(CellValue::Text(cell.to_string()))
            }
        }
    }
}

/// One entry of the rule registry, for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub key: String,
    pub description: String,
    pub takes_argument: bool,
}

/// The rule registry in listing order: each rule followed by its optional twin.
pub fn rule_catalogue() -> Vec<RuleInfo> {
    RuleKind::ALL
        .into_iter()
        .flat_map(|kind| {
            [
                RuleInfo {
                    key: kind.key().to_string(),
                    description: kind.description().to_string(),
                    takes_argument: kind.takes_argument(),
                },
                RuleInfo {
                    key: format!("{}{}", rde_model::OPTIONAL_PREFIX, kind.key()),
                    description: format!("{} (or missing)", kind.description()),
                    takes_argument: kind.takes_argument(),
                },
            ]
        })
        .collect()
}
