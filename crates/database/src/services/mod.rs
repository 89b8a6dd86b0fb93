pub mod course;
pub mod group;
pub mod lab;
pub mod make_up;
pub mod membership;
pub mod record;
pub mod scope;
pub mod session;
pub mod today;
pub mod user;
pub mod week;

use sea_orm::{
    ColumnTrait, Condition,
    prelude::Expr,
    sea_query::{Func, LikeExpr, SimpleExpr},
};
use crate::error::ServiceError;
use uuid::Uuid;

/// How a row is addressed: by id, or by a key given as text
///
/// A text key matches the natural key, or the id when it parses as one, so a
/// name shaped like a UUID can still be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(Uuid),
    Name(String),
}

impl Lookup {
    pub(crate) fn condition<C: ColumnTrait>(self, id_column: C, name_column: C) -> Condition {
        match self {
            Self::Id(id) => Condition::all().add(id_column.eq(id)),
            Self::Name(key) => match Uuid::parse_str(&key) {
                Ok(id) => Condition::any()
                    .add(id_column.eq(id))
                    .add(name_column.eq(key)),
                Err(_) => Condition::all().add(name_column.eq(key)),
            },
        }
    }
}

impl From<&str> for Lookup {
    fn from(key: &str) -> Self {
        Self::Name(key.to_string())
    }
}

impl From<Uuid> for Lookup {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

const LIKE_ESCAPE: char = '\\';

/// Escapes the LIKE wildcards in `text` so it matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on a text column
pub(crate) fn contains<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Trims a required text field and checks its length
pub(crate) fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, ServiceError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(ServiceError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup_from_key() {
        let id = Uuid::new_v4();
        assert_eq!(
            Lookup::from(id.to_string().as_str()),
            Lookup::Name(id.to_string())
        );
        assert_eq!(Lookup::from("CS101"), Lookup::Name("CS101".to_string()));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("g1"), "g1");
        assert_eq!(escape_like("g_1"), "g\\_1");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("lab_name", "  L1 ", 16).unwrap(), "L1");
        assert!(matches!(
            required_text("lab_name", "   ", 16),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            required_text("lab_name", "a-very-long-lab-name", 16),
            Err(ServiceError::Validation(_))
        ));
    }
}
