use crate::core::Value;

/// One classified operation, built fresh per call and discarded after
/// execution. Field names inside are already translated to storage keys;
/// column names in `Insert` stay in SQL form because RETURNING projection
/// re-translates them.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert {
        table: String,
        columns: Vec<String>,
        returning: Vec<String>,
    },
    Select {
        table: String,
        columns: Vec<SelectColumn>,
        conditions: Vec<Condition>,
        limit: Option<usize>,
        offset: Option<usize>,
    },
    Update {
        table: String,
        anchor: Option<Anchor>,
        assignments: Vec<Assignment>,
    },
    Delete {
        table: String,
        id_param: Option<usize>,
    },
    /// CREATE TABLE (schema bootstrap, accepted and ignored) and anything
    /// the classifier does not recognize.
    Ignored,
}

/// The single equality that selects rows for UPDATE: `id = $N` or
/// `user_id = $N`, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub field: String,
    pub param: usize,
}

/// One `SET column = $N` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub param: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// `*` — the whole row passes through.
    All,
    /// A `COUNT(...)` call; the query collapses to a single count row.
    Count { alias: String },
    /// A bare or aliased column.
    Field {
        field: String,
        alias: Option<String>,
    },
    /// A function call other than COUNT; present in the projection list but
    /// skipped from output.
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

/// One AND-joined WHERE fragment.
///
/// Fragments that match none of the recognized forms become `Unrecognized`
/// and evaluate to a pass. That permissive default deliberately widens
/// result sets for unenumerated condition shapes; downstream callers rely
/// on it, so it must not be hardened into a parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `<field> = $N`
    Equals { field: String, param: usize },
    /// `<field> ILIKE $N` — case-insensitive substring containment.
    Contains { field: String, param: usize },
    /// `status [NOT] IN (<literals>)`
    SetMembership {
        field: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// `<field> = true` / `= 'false'` and friends.
    BoolLiteral { field: String, expected: bool },
    /// `<field> >= $N` and the other inequalities.
    Range {
        field: String,
        op: CompareOp,
        param: usize,
    },
    Unrecognized,
}
