//! ReQL term AST
//!
//! Builds query terms on the client and encodes them into the nested-array
//! wire format the query server executes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use reql::{r, Value};
//!
//! let query = r::table("users")?
//!     .filter(Value::object([("active", Value::from(true))]))?
//!     .pluck(["name", "email"])?;
//!
//! assert_eq!(
//!     query.to_wire_string()?,
//!     r#"[33,[[39,[[15,["users"]],{"active":true}]],"name","email"]]"#,
//! );
//! ```
//!
//! ## Model
//!
//! - A [`Term`] is an operation tag, positional arguments, named
//!   options, and optionally the term it was chained from.
//! - Host values ([`Value`]) are lifted on construction: scalars become
//!   `DATUM`, arrays `MAKE_ARRAY`, objects `MAKE_OBJ`.
//! - `t.filter(x)` and `r::call(FILTER, [t, x])` serialize identically.
//! - Terms are immutable and cheap to clone; trees can be shared across threads.

mod catalog;
mod func;
mod methods;
mod pretty;
pub mod r;
mod serialize;
mod term;
mod value;

use thiserror::Error;

// ============ Primary Public API ============

pub use catalog::{Signature, TermType, validate};
pub use func::params as func_params;
pub use pretty::pretty;
pub use serialize::{MAX_NESTING_DEPTH, SerializeError};
pub use term::Term;
pub use value::{Datum, Value};

// ============ Errors ============

#[derive(Error, Debug)]
pub enum ReqlError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Duplicate option key: {0}")]
    DuplicateOptionKey(String),
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    #[error("{op} expects {expected} arguments, found {found}")]
    ArityMismatch {
        op: TermType,
        expected: String,
        found: usize,
    },
    #[error("{op} does not accept option '{name}'")]
    UnknownOption { op: TermType, name: String },
    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),
}
