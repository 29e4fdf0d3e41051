//! SELECT statement parsing: projection, WHERE fragments, pagination.

use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while};
use nom::character::complete::char;
use nom::combinator::{all_consuming, map};
use nom::multi::separated_list1;
use nom::sequence::{delimited, tuple};
use nom::IResult;

use super::common::{
    clause_after, column_ref, find_keyword, identifier, literal, placeholder, split_and,
    split_commas, ws,
};
use super::naming::to_storage_key;
use super::statement::{CompareOp, Condition, SelectColumn, Statement};
use crate::core::EngineError;

/// Columns the IN / NOT IN form is wired up for. A membership test naming
/// any other column falls through to the permissive default.
const MEMBERSHIP_COLUMNS: &[&str] = &["status"];

pub fn select(text: &str) -> Result<Statement, EngineError> {
    let projection_text = clause_after(text, "SELECT", &["FROM"])
        .ok_or_else(|| EngineError::ParseError("expected SELECT".to_string()))?;

    let (_, from) = find_keyword(text, "FROM")
        .ok_or_else(|| EngineError::ParseError("SELECT without FROM".to_string()))?;
    let (_, table) = ws(identifier)(&text[from..])
        .map_err(|e| EngineError::ParseError(format!("{e:?}")))?;

    let columns = split_commas(projection_text)
        .into_iter()
        .map(parse_select_column)
        .collect();

    // ORDER BY is accepted here only as a WHERE terminator; the clause has
    // no effect on result order. Rows come back in insertion order.
    let conditions = clause_after(text, "WHERE", &["ORDER BY", "LIMIT", "OFFSET"])
        .map(|body| split_and(body).into_iter().map(parse_condition).collect())
        .unwrap_or_default();

    let limit = clause_after(text, "LIMIT", &["OFFSET"]).and_then(parse_placeholder_clause);
    let offset = clause_after(text, "OFFSET", &["LIMIT"]).and_then(parse_placeholder_clause);

    Ok(Statement::Select {
        table,
        columns,
        conditions,
        limit,
        offset,
    })
}

fn parse_placeholder_clause(fragment: &str) -> Option<usize> {
    all_consuming(ws(placeholder))
        .parse(fragment)
        .ok()
        .map(|(_, n)| n)
}

fn parse_select_column(text: &str) -> SelectColumn {
    let trimmed = text.trim();
    if trimmed == "*" || trimmed.ends_with(".*") {
        return SelectColumn::All;
    }

    if let Ok((rest, name)) = function_call(trimmed) {
        if name.eq_ignore_ascii_case("count") {
            let alias = parse_alias(rest).unwrap_or_else(|| "count".to_string());
            return SelectColumn::Count { alias };
        }
        // Other function calls are carried in the projection list but their
        // computation is out of scope, so they produce no output field.
        return SelectColumn::Computed;
    }

    if let Ok((rest, column)) = ws(column_ref)(trimmed) {
        return SelectColumn::Field {
            field: to_storage_key(&column),
            alias: parse_alias(rest),
        };
    }

    SelectColumn::Computed
}

fn function_call(input: &str) -> IResult<&str, String> {
    map(
        tuple((
            ws(identifier),
            char('('),
            take_while(|c| c != ')'),
            char(')'),
        )),
        |(name, _, _, _)| name,
    )(input)
}

fn parse_alias(rest: &str) -> Option<String> {
    let (_, after) = find_keyword(rest, "AS")?;
    ws(identifier)(&rest[after..]).ok().map(|(_, alias)| alias)
}

/// Matches one WHERE fragment against the catalogue of recognized forms.
/// No match means the condition passes rather than the query failing; that
/// behavior is load-bearing for callers and must stay.
fn parse_condition(fragment: &str) -> Condition {
    all_consuming(alt((
        set_membership,
        contains,
        equals_param,
        bool_literal,
        range,
    )))
    .parse(fragment)
    .map_or(Condition::Unrecognized, |(_, condition)| condition)
}

fn set_membership(input: &str) -> IResult<&str, Condition> {
    map(
        tuple((
            ws(column_ref),
            nom::combinator::opt(ws(tag_no_case("NOT"))),
            ws(tag_no_case("IN")),
            delimited(
                ws(char('(')),
                separated_list1(ws(char(',')), literal),
                ws(char(')')),
            ),
        )),
        |(column, negated, _, values)| {
            let field = to_storage_key(&column);
            if MEMBERSHIP_COLUMNS.contains(&field.as_str()) {
                Condition::SetMembership {
                    field,
                    values,
                    negated: negated.is_some(),
                }
            } else {
                Condition::Unrecognized
            }
        },
    )(input)
}

fn contains(input: &str) -> IResult<&str, Condition> {
    map(
        tuple((ws(column_ref), ws(tag_no_case("ILIKE")), ws(placeholder))),
        |(column, _, param)| Condition::Contains {
            field: to_storage_key(&column),
            param,
        },
    )(input)
}

fn equals_param(input: &str) -> IResult<&str, Condition> {
    map(
        tuple((ws(column_ref), ws(char('=')), ws(placeholder))),
        |(column, _, param)| Condition::Equals {
            field: to_storage_key(&column),
            param,
        },
    )(input)
}

fn bool_token(input: &str) -> IResult<&str, bool> {
    alt((
        map(tag_no_case("'true'"), |_| true),
        map(tag_no_case("'false'"), |_| false),
        map(tag_no_case("TRUE"), |_| true),
        map(tag_no_case("FALSE"), |_| false),
    ))(input)
}

fn bool_literal(input: &str) -> IResult<&str, Condition> {
    map(
        tuple((ws(column_ref), ws(char('=')), ws(bool_token))),
        |(column, _, expected)| Condition::BoolLiteral {
            field: to_storage_key(&column),
            expected,
        },
    )(input)
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    alt((
        map(tag(">="), |_| CompareOp::Gte),
        map(tag("<="), |_| CompareOp::Lte),
        map(tag(">"), |_| CompareOp::Gt),
        map(tag("<"), |_| CompareOp::Lt),
    ))(input)
}

fn range(input: &str) -> IResult<&str, Condition> {
    map(
        tuple((ws(column_ref), ws(compare_op), ws(placeholder))),
        |(column, op, param)| Condition::Range {
            field: to_storage_key(&column),
            op,
            param,
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_parse_basic_select() {
        let stmt = select("SELECT * FROM animals").unwrap();
        match stmt {
            Statement::Select {
                table,
                columns,
                conditions,
                limit,
                offset,
            } => {
                assert_eq!(table, "animals");
                assert_eq!(columns, vec![SelectColumn::All]);
                assert!(conditions.is_empty());
                assert_eq!(limit, None);
                assert_eq!(offset, None);
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_projection_with_aliases() {
        let stmt = select("SELECT a.ear_tag AS tag, name FROM animals a").unwrap();
        match stmt {
            Statement::Select { columns, .. } => {
                assert_eq!(
                    columns,
                    vec![
                        SelectColumn::Field {
                            field: "earTag".to_string(),
                            alias: Some("tag".to_string()),
                        },
                        SelectColumn::Field {
                            field: "name".to_string(),
                            alias: None,
                        },
                    ]
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_count_with_alias() {
        let stmt = select("SELECT COUNT(*) AS total FROM animals WHERE herd_id = $1").unwrap();
        match stmt {
            Statement::Select { columns, .. } => {
                assert_eq!(
                    columns,
                    vec![SelectColumn::Count {
                        alias: "total".to_string()
                    }]
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_count_alias_defaults() {
        let stmt = select("SELECT count(id) FROM animals").unwrap();
        match stmt {
            Statement::Select { columns, .. } => {
                assert_eq!(
                    columns,
                    vec![SelectColumn::Count {
                        alias: "count".to_string()
                    }]
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_non_count_function_is_skipped() {
        let stmt = select("SELECT UPPER(name), name FROM animals").unwrap();
        match stmt {
            Statement::Select { columns, .. } => {
                assert_eq!(columns[0], SelectColumn::Computed);
                assert!(matches!(columns[1], SelectColumn::Field { .. }));
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_where_conditions() {
        let stmt = select(
            "SELECT * FROM animals WHERE herd_id = $1 AND name ILIKE $2 AND status IN ('active', 'quarantine') AND weight >= $3",
        )
        .unwrap();
        match stmt {
            Statement::Select { conditions, .. } => {
                assert_eq!(
                    conditions,
                    vec![
                        Condition::Equals {
                            field: "herdId".to_string(),
                            param: 1
                        },
                        Condition::Contains {
                            field: "name".to_string(),
                            param: 2
                        },
                        Condition::SetMembership {
                            field: "status".to_string(),
                            values: vec![
                                Value::Text("active".to_string()),
                                Value::Text("quarantine".to_string()),
                            ],
                            negated: false,
                        },
                        Condition::Range {
                            field: "weight".to_string(),
                            op: CompareOp::Gte,
                            param: 3
                        },
                    ]
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_not_in_and_bool_literal() {
        let stmt =
            select("SELECT * FROM animals WHERE status NOT IN ('sold') AND is_active = true")
                .unwrap();
        match stmt {
            Statement::Select { conditions, .. } => {
                assert_eq!(
                    conditions[0],
                    Condition::SetMembership {
                        field: "status".to_string(),
                        values: vec![Value::Text("sold".to_string())],
                        negated: true,
                    }
                );
                assert_eq!(
                    conditions[1],
                    Condition::BoolLiteral {
                        field: "isActive".to_string(),
                        expected: true,
                    }
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_membership_on_other_columns_is_unrecognized() {
        let stmt = select("SELECT * FROM animals WHERE species IN ('cow')").unwrap();
        match stmt {
            Statement::Select { conditions, .. } => {
                assert_eq!(conditions, vec![Condition::Unrecognized]);
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_fragment() {
        let stmt = select("SELECT * FROM animals WHERE weight BETWEEN $1 AND $2").unwrap();
        match stmt {
            Statement::Select { conditions, .. } => {
                // BETWEEN splits on its inner AND; neither half is recognized
                assert_eq!(
                    conditions,
                    vec![Condition::Unrecognized, Condition::Unrecognized]
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_limit_offset_placeholders() {
        let stmt =
            select("SELECT * FROM animals ORDER BY created_at DESC LIMIT $1 OFFSET $2").unwrap();
        match stmt {
            Statement::Select { limit, offset, .. } => {
                assert_eq!(limit, Some(1));
                assert_eq!(offset, Some(2));
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }
}
