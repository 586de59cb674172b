//! Wire encoding of term trees
//!
//! - call term: `[code, [args...]]`, plus `{optargs}` when there are options
//! - chained term: the preceding term is the first element of `args`
//! - datum: the raw payload
//! - `MAKE_OBJ`: a bare JSON object of its fields

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::catalog::TermType;
use crate::term::{Node, Term};

/// Deepest JSON nesting produced. serde_json refuses to parse documents
/// nested deeper than this, so the encoder refuses to produce them.
pub const MAX_NESTING_DEPTH: usize = 127;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("term nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Term {
    /// Encode the tree as a JSON value
    pub fn to_json(&self) -> Result<Json, SerializeError> {
        encode(self, 0)
    }

    /// Encode the tree for embedding inside `enclosing` JSON containers,
    /// counting those containers against [`MAX_NESTING_DEPTH`]
    pub fn to_json_within(&self, enclosing: usize) -> Result<Json, SerializeError> {
        encode(self, enclosing)
    }

    /// Encode the tree as JSON text
    pub fn to_wire_string(&self) -> Result<String, SerializeError> {
        let text = serde_json::to_string(&self.to_json()?)?;
        log::trace!("serialized {} ({} bytes)", self.op(), text.len());
        Ok(text)
    }

    /// Encode the tree as UTF-8 JSON bytes
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        let bytes = serde_json::to_vec(&self.to_json()?)?;
        log::trace!("serialized {} ({} bytes)", self.op(), bytes.len());
        Ok(bytes)
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

/// `depth` is the number of JSON containers enclosing `term`
fn encode(term: &Term, depth: usize) -> Result<Json, SerializeError> {
    match term.node() {
        Node::Datum(datum) => {
            let json = datum.to_json();
            if json.is_object() {
                enter(depth)?;
            }
            Ok(json)
        }
        Node::Call(call)
            if call.op == TermType::MakeObj && call.args.is_empty() && call.preceding.is_none() =>
        {
            let depth = enter(depth)?;
            encode_fields(term.optargs(), depth).map(Json::Object)
        }
        Node::Call(call) => {
            let outer = enter(depth)?;
            let inner = enter(outer)?;
            let args = term
                .effective_args()
                .map(|arg| encode(arg, inner))
                .collect::<Result<Vec<_>, _>>()?;

            let mut encoded = vec![Json::from(call.op.code()), Json::Array(args)];
            if !call.optargs.is_empty() {
                let inner = enter(outer)?;
                encoded.push(Json::Object(encode_fields(call.optargs.iter(), inner)?));
            }
            Ok(Json::Array(encoded))
        }
    }
}

fn encode_fields<'a>(
    fields: impl Iterator<Item = (&'a str, &'a Term)>,
    depth: usize,
) -> Result<Map<String, Json>, SerializeError> {
    fields
        .map(|(name, value)| encode(value, depth).map(|json| (name.to_string(), json)))
        .collect()
}

fn enter(depth: usize) -> Result<usize, SerializeError> {
    let next = depth + 1;
    if next > MAX_NESTING_DEPTH {
        return Err(SerializeError::TooDeep(MAX_NESTING_DEPTH));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    fn table(name: &str) -> Term {
        Term::new(TermType::Table, [name]).unwrap()
    }

    #[test]
    fn call_without_options_has_two_elements() {
        assert_eq!(table("users").to_json().unwrap(), json!([15, ["users"]]));
    }

    #[test]
    fn empty_args_still_encoded() {
        let now = Term::new(TermType::Now, Vec::<Value>::new()).unwrap();
        assert_eq!(now.to_json().unwrap(), json!([103, []]));
    }

    #[test]
    fn options_add_third_element() {
        let t = Term::construct(
            TermType::Table,
            ["users"],
            [("read_mode", "outdated")],
            None,
        )
        .unwrap();
        assert_eq!(
            t.to_json().unwrap(),
            json!([15, ["users"], {"read_mode": "outdated"}])
        );
    }

    #[test]
    fn preceding_becomes_first_argument() {
        let filtered = table("users")
            .apply(TermType::Filter, [Value::object([("age", Value::from(30))])])
            .unwrap();
        assert_eq!(
            filtered.to_json().unwrap(),
            json!([39, [[15, ["users"]], {"age": 30}]])
        );
    }

    #[test]
    fn make_array_is_explicit() {
        let t = Term::lift(Value::array([1, 2, 3])).unwrap();
        assert_eq!(t.to_json().unwrap(), json!([2, [1, 2, 3]]));
    }

    #[test]
    fn text_and_bytes_agree() {
        let t = table("users").apply(TermType::Count, Vec::<Value>::new()).unwrap();
        let text = t.to_wire_string().unwrap();
        assert_eq!(text, "[43,[[15,[\"users\"]]]]");
        assert_eq!(t.to_wire_bytes().unwrap(), text.into_bytes());
    }

    #[test]
    fn serialize_impl_matches_to_json() {
        let t = table("users");
        assert_eq!(serde_json::to_value(&t).unwrap(), t.to_json().unwrap());
    }

    #[test]
    fn enclosing_containers_count_toward_the_limit() {
        // one level for the object, two per ADD
        let mut t = Term::lift(Value::object([("a", Value::from(0))])).unwrap();
        for _ in 0..63 {
            t = t.apply(TermType::Add, [1]).unwrap();
        }
        assert!(t.to_json().is_ok());
        assert!(t.to_json_within(0).is_ok());
        assert!(matches!(t.to_json_within(1), Err(SerializeError::TooDeep(_))));
    }

    #[test]
    fn deep_tree_fails_and_stays_reusable() {
        let mut t = Term::lift(Value::from(0)).unwrap();
        for _ in 0..MAX_NESTING_DEPTH {
            t = t.apply(TermType::Add, [1]).unwrap();
        }
        assert!(matches!(t.to_json(), Err(SerializeError::TooDeep(MAX_NESTING_DEPTH))));
        assert!(matches!(t.to_wire_string(), Err(SerializeError::TooDeep(_))));

        let mut sub = &t;
        for _ in 0..100 {
            sub = sub.preceding().unwrap();
        }
        assert!(sub.to_json().is_ok());
    }
}
