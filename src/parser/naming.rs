//! Bidirectional `snake_case` ⇄ `camelCase` field-name translation.
//!
//! SQL text names columns in snake_case while stored rows keep camelCase
//! keys, so every executor funnels names through here. The inverse mapping
//! is lossy for identifiers the forward mapping can never produce
//! (`user__id` and `user_id` both translate to `userId`); that collision is
//! an accepted limitation.

/// `first_name` → `firstName`
#[must_use]
pub fn to_storage_key(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut upper_next = false;
    for ch in column.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `firstName` → `first_name`
#[must_use]
pub fn to_sql_column(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for ch in field.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_storage_key() {
        assert_eq!(to_storage_key("first_name"), "firstName");
        assert_eq!(to_storage_key("user_id"), "userId");
        assert_eq!(to_storage_key("id"), "id");
        assert_eq!(to_storage_key("vaccination_due_date"), "vaccinationDueDate");
    }

    #[test]
    fn test_to_sql_column() {
        assert_eq!(to_sql_column("firstName"), "first_name");
        assert_eq!(to_sql_column("userId"), "user_id");
        assert_eq!(to_sql_column("id"), "id");
    }

    #[test]
    fn test_round_trip() {
        for column in ["id", "ear_tag", "is_active", "herd_group_id"] {
            assert_eq!(to_sql_column(&to_storage_key(column)), column);
        }
    }
}
