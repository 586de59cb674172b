//! Top-level factories: `r::table("users")`, `r::now()`, ...
//!
//! Each one is `Term::new(op, args)`; anything not covered here can be
//! built with [`call`] directly.

use crate::ReqlError;
use crate::catalog::TermType;
use crate::term::Term;
use crate::value::Value;

pub use crate::func::{func, func1, func2};

/// `op(args...)` for any operation
pub fn call<A>(op: TermType, args: A) -> Result<Term, ReqlError>
where
    A: IntoIterator,
    A::Item: Into<Value>,
{
    Term::new(op, args)
}

/// Lift a host value into a term
pub fn expr(value: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::lift(value.into())
}

fn nullary(op: TermType) -> Result<Term, ReqlError> {
    Term::new(op, Vec::<Value>::new())
}

pub fn db(name: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Db, [name.into()])
}

pub fn table(name: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Table, [name.into()])
}

pub fn db_create(name: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::DbCreate, [name.into()])
}

pub fn db_drop(name: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::DbDrop, [name.into()])
}

pub fn db_list() -> Result<Term, ReqlError> {
    nullary(TermType::DbList)
}

pub fn table_create(name: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::TableCreate, [name.into()])
}

pub fn table_list() -> Result<Term, ReqlError> {
    nullary(TermType::TableList)
}

/// Implicit row variable, usable inside `filter` and friends
pub fn row() -> Result<Term, ReqlError> {
    nullary(TermType::ImplicitVar)
}

pub fn now() -> Result<Term, ReqlError> {
    nullary(TermType::Now)
}

pub fn epoch_time(seconds: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::EpochTime, [seconds.into()])
}

pub fn iso8601(text: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Iso8601, [text.into()])
}

pub fn to_iso8601(time: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::ToIso8601, [time.into()])
}

pub fn time<A>(parts: A) -> Result<Term, ReqlError>
where
    A: IntoIterator,
    A::Item: Into<Value>,
{
    Term::new(TermType::Time, parts)
}

pub fn branch(
    test: impl Into<Value>,
    then: impl Into<Value>,
    otherwise: impl Into<Value>,
) -> Result<Term, ReqlError> {
    Term::new(TermType::Branch, [test.into(), then.into(), otherwise.into()])
}

pub fn and<A>(terms: A) -> Result<Term, ReqlError>
where
    A: IntoIterator,
    A::Item: Into<Value>,
{
    Term::new(TermType::And, terms)
}

pub fn or<A>(terms: A) -> Result<Term, ReqlError>
where
    A: IntoIterator,
    A::Item: Into<Value>,
{
    Term::new(TermType::Or, terms)
}

pub fn not(value: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Not, [value.into()])
}

pub fn asc(key: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Asc, [key.into()])
}

pub fn desc(key: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Desc, [key.into()])
}

pub fn json(text: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Json, [text.into()])
}

/// Literal bytes, sent as the `BINARY` pseudo-type
pub fn binary(bytes: impl Into<Vec<u8>>) -> Result<Term, ReqlError> {
    Term::lift(Value::binary(bytes))
}

pub fn uuid() -> Result<Term, ReqlError> {
    nullary(TermType::Uuid)
}

pub fn error(message: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Error, [message.into()])
}

pub fn literal(value: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Literal, [value.into()])
}

/// Splice an array into the enclosing call's arguments
pub fn args(array: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Args, [array.into()])
}

pub fn range(end: impl Into<Value>) -> Result<Term, ReqlError> {
    Term::new(TermType::Range, [end.into()])
}

pub fn minval() -> Result<Term, ReqlError> {
    nullary(TermType::Minval)
}

pub fn maxval() -> Result<Term, ReqlError> {
    nullary(TermType::Maxval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn factories_encode_their_codes() {
        assert_eq!(db("test").unwrap().to_json().unwrap(), json!([14, ["test"]]));
        assert_eq!(now().unwrap().to_json().unwrap(), json!([103, []]));
        assert_eq!(row().unwrap().to_json().unwrap(), json!([13, []]));
        assert_eq!(
            branch(true, "yes", "no").unwrap().to_json().unwrap(),
            json!([65, [true, "yes", "no"]])
        );
    }

    #[test]
    fn expr_lifts_host_values() {
        assert_eq!(expr(5).unwrap().to_json().unwrap(), json!(5));
        assert_eq!(expr(vec!["a", "b"]).unwrap().to_json().unwrap(), json!([2, ["a", "b"]]));
    }

    #[test]
    fn binary_literal() {
        assert_eq!(
            binary(vec![0u8, 1, 2]).unwrap().to_json().unwrap(),
            json!({"$reql_type$": "BINARY", "data": "AAEC"})
        );
    }
}
