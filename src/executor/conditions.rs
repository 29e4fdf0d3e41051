//! WHERE fragment evaluation against a row.
//!
//! Every condition kind resolves its parameter through the statement's
//! binder at evaluation time, so the same positional array serves the whole
//! statement. Unrecognized fragments pass.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::{Row, Value};
use crate::parser::{CompareOp, Condition, ParamBinder};

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// AND semantics: every fragment must hold.
    pub fn matches_all(row: &Row, conditions: &[Condition], binder: &ParamBinder) -> bool {
        conditions
            .iter()
            .all(|condition| Self::matches(row, condition, binder))
    }

    fn matches(row: &Row, condition: &Condition, binder: &ParamBinder) -> bool {
        match condition {
            Condition::Equals { field, param } => {
                let stored = row.get(field).cloned().unwrap_or(Value::Null);
                Self::loose_eq(&stored, &binder.value(*param))
            }
            Condition::Contains { field, param } => {
                Self::contains_ci(row.get(field), &binder.value(*param))
            }
            Condition::SetMembership {
                field,
                values,
                negated,
            } => {
                let stored = row.get(field).cloned().unwrap_or(Value::Null);
                let member = values.iter().any(|value| Self::loose_eq(&stored, value));
                member != *negated
            }
            Condition::BoolLiteral { field, expected } => row
                .get(field)
                .and_then(Self::coerce_bool)
                .is_some_and(|actual| actual == *expected),
            Condition::Range { field, op, param } => {
                let stored = row.get(field).cloned().unwrap_or(Value::Null);
                // Incomparable operands pass, matching the permissive policy
                // for everything else the predicate grammar half-understands.
                Self::ordering(&stored, &binder.value(*param)).is_none_or(|ordering| match op {
                    CompareOp::Gt => ordering == Ordering::Greater,
                    CompareOp::Gte => ordering != Ordering::Less,
                    CompareOp::Lt => ordering == Ordering::Less,
                    CompareOp::Lte => ordering != Ordering::Greater,
                })
            }
            Condition::Unrecognized => true,
        }
    }

    /// Equality across the representations callers actually mix: numbers vs
    /// numeric text, booleans vs 'true'/'false', int vs float.
    pub fn loose_eq(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => (x - y).abs() < f64::EPSILON,
            (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
                (*x as f64 - y).abs() < f64::EPSILON
            }
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Bool(x), Value::Text(s)) | (Value::Text(s), Value::Bool(x)) => {
                Self::text_bool(s).is_some_and(|b| b == *x)
            }
            (Value::Text(x), Value::Text(y)) => x == y,
            (Value::Int(x), Value::Text(s)) | (Value::Text(s), Value::Int(x)) => {
                s.trim().parse::<i64>().is_ok_and(|n| n == *x)
            }
            (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
            (Value::Timestamp(t), Value::Text(s)) | (Value::Text(s), Value::Timestamp(t)) => {
                Self::parse_timestamp(s).is_some_and(|parsed| parsed == *t)
            }
            (Value::Json(x), Value::Json(y)) => x == y,
            _ => false,
        }
    }

    fn coerce_bool(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Text(s) => Self::text_bool(s),
            _ => None,
        }
    }

    fn text_bool(s: &str) -> Option<bool> {
        if s.eq_ignore_ascii_case("true") {
            Some(true)
        } else if s.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// ILIKE as the services use it: `%term%` patterns reduced to
    /// case-insensitive substring containment. NULL never matches.
    fn contains_ci(stored: Option<&Value>, pattern: &Value) -> bool {
        let Some(stored) = stored else { return false };
        if stored.is_null() || pattern.is_null() {
            return false;
        }
        let haystack = stored.to_string().to_lowercase();
        let needle = pattern.to_string().replace('%', "").to_lowercase();
        haystack.contains(&needle)
    }

    fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
            (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
            (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
            (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
            (Value::Text(x), Value::Text(y)) => {
                // Prefer temporal or numeric order when both sides parse
                if let (Some(tx), Some(ty)) =
                    (Self::parse_timestamp(x), Self::parse_timestamp(y))
                {
                    return Some(tx.cmp(&ty));
                }
                if let (Ok(nx), Ok(ny)) = (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
                    return nx.partial_cmp(&ny);
                }
                Some(x.cmp(y))
            }
            (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(y)),
            (Value::Timestamp(t), Value::Text(s)) => {
                Self::parse_timestamp(s).map(|parsed| t.cmp(&parsed))
            }
            (Value::Text(s), Value::Timestamp(t)) => {
                Self::parse_timestamp(s).map(|parsed| parsed.cmp(t))
            }
            _ => None,
        }
    }

    fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal() -> Row {
        let mut row = Row::new();
        row.set("id", Value::Int(1));
        row.set("name", Value::Text("Buddy".to_string()));
        row.set("status", Value::Text("active".to_string()));
        row.set("isActive", Value::Bool(true));
        row.set("weight", Value::Float(412.5));
        row
    }

    #[test]
    fn test_equals_with_loose_types() {
        let row = animal();
        let params = [Value::Text("1".to_string())];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Equals {
            field: "id".to_string(),
            param: 1,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_equals_missing_field_vs_null_param() {
        let row = animal();
        let binder = ParamBinder::new(&[]);
        // Missing field and out-of-range parameter both degrade to Null,
        // which compare equal
        let cond = Condition::Equals {
            field: "absent".to_string(),
            param: 5,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_contains_is_case_insensitive_and_strips_percent() {
        let row = animal();
        let params = [Value::Text("%BUD%".to_string())];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Contains {
            field: "name".to_string(),
            param: 1,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));

        let params = [Value::Text("%max%".to_string())];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Contains {
            field: "name".to_string(),
            param: 1,
        };
        assert!(!ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_contains_never_matches_null() {
        let mut row = animal();
        row.set("name", Value::Null);
        let params = [Value::Text("%%".to_string())];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Contains {
            field: "name".to_string(),
            param: 1,
        };
        assert!(!ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_set_membership() {
        let row = animal();
        let binder = ParamBinder::new(&[]);
        let cond = Condition::SetMembership {
            field: "status".to_string(),
            values: vec![
                Value::Text("active".to_string()),
                Value::Text("quarantine".to_string()),
            ],
            negated: false,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));

        let cond = Condition::SetMembership {
            field: "status".to_string(),
            values: vec![Value::Text("active".to_string())],
            negated: true,
        };
        assert!(!ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_bool_literal_coercion() {
        let mut row = animal();
        let binder = ParamBinder::new(&[]);
        let cond = Condition::BoolLiteral {
            field: "isActive".to_string(),
            expected: true,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond.clone()], &binder));

        // 'false' stored as text still compares as a boolean
        row.set("isActive", Value::Text("false".to_string()));
        assert!(!ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_range_comparisons() {
        let row = animal();
        let params = [Value::Int(400)];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Range {
            field: "weight".to_string(),
            op: CompareOp::Gte,
            param: 1,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));

        let cond = Condition::Range {
            field: "weight".to_string(),
            op: CompareOp::Lt,
            param: 1,
        };
        assert!(!ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_range_incomparable_passes() {
        let row = animal();
        let params = [Value::Bool(true)];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Range {
            field: "name".to_string(),
            op: CompareOp::Gt,
            param: 1,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }

    #[test]
    fn test_unrecognized_passes() {
        let row = animal();
        let binder = ParamBinder::new(&[]);
        assert!(ConditionEvaluator::matches_all(
            &row,
            &[Condition::Unrecognized],
            &binder
        ));
    }

    #[test]
    fn test_timestamp_text_ordering() {
        let mut row = animal();
        row.set(
            "recordedAt",
            Value::Timestamp(
                NaiveDate::from_ymd_opt(2026, 3, 1)
                    .unwrap()
                    .and_hms_opt(8, 30, 0)
                    .unwrap(),
            ),
        );
        let params = [Value::Text("2026-01-01".to_string())];
        let binder = ParamBinder::new(&params);
        let cond = Condition::Range {
            field: "recordedAt".to_string(),
            op: CompareOp::Gte,
            param: 1,
        };
        assert!(ConditionEvaluator::matches_all(&row, &[cond], &binder));
    }
}
