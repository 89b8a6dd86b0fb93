//! Column conversions for the attendance enums, so entities can use them directly.

use crate::attendance::{CheckInState, SessionKind, UserType};
use sea_orm::{
    ColIdx, DbErr, QueryResult, TryGetError, TryGetable, Value,
    sea_query::{ArrayType, ColumnType, Nullable, ValueType, ValueTypeErr},
};
use std::str::FromStr;

/// Implements the column traits for an enum stored as its integer code
macro_rules! integer_column {
    ($ty:ident) => {
        impl ValueType for $ty {
            fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
                match v {
                    Value::Int(Some(code)) => $ty::from_code(code).ok_or(ValueTypeErr),
                    Value::BigInt(Some(code)) => <i32 as TryFrom<i64>>::try_from(code)
                        .ok()
                        .and_then($ty::from_code)
                        .ok_or(ValueTypeErr),
                    _ => Err(ValueTypeErr),
                }
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn array_type() -> ArrayType {
                ArrayType::Int
            }

            fn column_type() -> ColumnType {
                ColumnType::Integer
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(Some(value.code()))
            }
        }

        impl TryGetable for $ty {
            fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
                let code: i32 = res.try_get_by(index)?;

                $ty::from_code(code).ok_or_else(|| {
                    TryGetError::DbErr(DbErr::Type(format!(
                        "Invalid {} code: {code}",
                        stringify!($ty)
                    )))
                })
            }
        }

        impl Nullable for $ty {
            fn null() -> Value {
                Value::Int(None)
            }
        }
    };
}

integer_column!(UserType);
integer_column!(CheckInState);

impl ValueType for SessionKind {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        match v {
            Value::String(Some(s)) => SessionKind::from_str(&s).map_err(|_| ValueTypeErr),
            _ => Err(ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "SessionKind".to_string()
    }

    fn array_type() -> ArrayType {
        ArrayType::String
    }

    fn column_type() -> ColumnType {
        ColumnType::String(sea_orm::sea_query::StringLen::N(8))
    }
}

impl From<SessionKind> for Value {
    fn from(kind: SessionKind) -> Self {
        Value::String(Some(Box::new(kind.as_str().to_owned())))
    }
}

impl TryGetable for SessionKind {
    fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
        let val: String = res.try_get_by(index)?;

        SessionKind::from_str(&val).map_err(|e| {
            TryGetError::DbErr(DbErr::Type(format!(
                "Failed to parse SessionKind '{val}': {e}"
            )))
        })
    }
}

impl Nullable for SessionKind {
    fn null() -> Value {
        Value::String(None)
    }
}
