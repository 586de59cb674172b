//! Lambda terms
//!
//! `FUNC` takes an array of parameter ids and a body; the body refers to
//! the parameters through `VAR` terms. Ids only need to be unique within a
//! query, so a process-wide counter is enough.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ReqlError;
use crate::catalog::TermType;
use crate::term::Term;
use crate::value::{Datum, Value};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(1);

fn next_var_id() -> u64 {
    NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed)
}

/// Build a lambda of `arity` parameters.
///
/// `body` receives one `VAR` term per parameter and returns the body,
/// which is lifted like any other argument.
pub fn func<F, B>(arity: usize, body: F) -> Result<Term, ReqlError>
where
    F: FnOnce(&[Term]) -> Result<B, ReqlError>,
    B: Into<Value>,
{
    let ids: Vec<u64> = (0..arity).map(|_| next_var_id()).collect();
    let vars = ids
        .iter()
        .map(|id| Term::new(TermType::Var, [*id]))
        .collect::<Result<Vec<_>, _>>()?;
    let body = body(&vars)?.into();
    Term::new(TermType::Func, [Value::array(ids), body])
}

pub fn func1<F, B>(body: F) -> Result<Term, ReqlError>
where
    F: FnOnce(&Term) -> Result<B, ReqlError>,
    B: Into<Value>,
{
    func(1, |vars| body(&vars[0]))
}

pub fn func2<F, B>(body: F) -> Result<Term, ReqlError>
where
    F: FnOnce(&Term, &Term) -> Result<B, ReqlError>,
    B: Into<Value>,
{
    func(2, |vars| body(&vars[0], &vars[1]))
}

/// Parameter ids of a `FUNC` term, in order
pub fn params(term: &Term) -> Option<Vec<u64>> {
    if term.op() != TermType::Func {
        return None;
    }
    let ids = term.args().first()?;
    ids.args()
        .iter()
        .map(|id| match id.as_datum()? {
            Datum::Number(n) => n.as_u64(),
            _ => None,
        })
        .collect()
}
