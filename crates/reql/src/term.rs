//! Term AST
//!
//! A [`Term`] is one operation invocation: an operation tag, positional
//! arguments, named options, and optionally the term it was chained from.
//! Literal values are `DATUM` terms carrying a [`Datum`] payload.
//!
//! Terms are immutable once built and shared through an `Arc`, so cloning is
//! cheap, keeps identity, and a tree can be read from any number of threads.
//! Dropping and comparing walk the tree with an explicit stack, so chains of
//! any length are safe to release.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use serde_json::Number;

use crate::ReqlError;
use crate::catalog::TermType;
use crate::value::{Datum, Value};

#[derive(Debug, Clone)]
pub struct Term(Arc<Node>);

#[derive(Debug)]
pub(crate) enum Node {
    Datum(Datum),
    Call(Call),
}

#[derive(Debug)]
pub(crate) struct Call {
    pub(crate) op: TermType,
    pub(crate) args: Arguments,
    pub(crate) optargs: OptArgs,
    pub(crate) preceding: Option<Term>,
}

// ============ Arguments ============

/// Ordered positional operands of a term. Order is parameter order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arguments(Vec<Term>);

impl Arguments {
    /// Lift each raw value in order. Fails on the first value that can't be lifted.
    pub fn from_values<I>(values: I) -> Result<Self, ReqlError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        values
            .into_iter()
            .map(|v| Term::lift(v.into()))
            .collect::<Result<Vec<_>, _>>()
            .map(Arguments)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Term] {
        &self.0
    }
}

// ============ OptArgs ============

/// Named options of a term.
///
/// Keys are unique. Iteration follows insertion order, which makes the
/// serialized form stable for a given term; equality ignores order.
#[derive(Debug, Clone, Default)]
pub(crate) struct OptArgs(IndexMap<String, Term>);

impl OptArgs {
    /// Lift named raw values. A repeated name is a [`ReqlError::DuplicateOptionKey`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ReqlError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        collect_entries(pairs, ReqlError::DuplicateOptionKey).map(OptArgs)
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn collect_entries<I, K, V>(
    pairs: I,
    duplicate: fn(String) -> ReqlError,
) -> Result<IndexMap<String, Term>, ReqlError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let mut entries = IndexMap::new();
    for (key, value) in pairs {
        let key = key.into();
        if entries.contains_key(&key) {
            return Err(duplicate(key));
        }
        let term = Term::lift(value.into())?;
        entries.insert(key, term);
    }
    Ok(entries)
}

// ============ Term ============

impl Term {
    /// Build a term from raw inputs.
    ///
    /// Every argument and option value is lifted before anything is
    /// allocated, so an error leaves nothing behind. Arity and option names
    /// are not checked against the catalog here; see [`crate::validate`].
    pub fn construct<A, O, K, V>(
        op: TermType,
        args: A,
        optargs: O,
        preceding: Option<Term>,
    ) -> Result<Term, ReqlError>
    where
        A: IntoIterator,
        A::Item: Into<Value>,
        O: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let args = Arguments::from_values(args)?;
        let optargs = OptArgs::from_pairs(optargs)?;
        Ok(Term::from_parts(op, args, optargs, preceding))
    }

    /// Variadic factory: `op(args...)` with no options and no preceding term
    pub fn new<A>(op: TermType, args: A) -> Result<Term, ReqlError>
    where
        A: IntoIterator,
        A::Item: Into<Value>,
    {
        Term::construct(op, args, no_optargs(), None)
    }

    /// Chain `op(args...)` onto this term: `self.op(args...)`
    pub fn apply<A>(&self, op: TermType, args: A) -> Result<Term, ReqlError>
    where
        A: IntoIterator,
        A::Item: Into<Value>,
    {
        Term::construct(op, args, no_optargs(), Some(self.clone()))
    }

    /// Chain `op(args..., options...)` onto this term
    pub fn apply_with<A, O, K, V>(&self, op: TermType, args: A, optargs: O) -> Result<Term, ReqlError>
    where
        A: IntoIterator,
        A::Item: Into<Value>,
        O: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Term::construct(op, args, optargs, Some(self.clone()))
    }

    pub fn datum(datum: Datum) -> Term {
        Term(Arc::new(Node::Datum(datum)))
    }

    pub(crate) fn from_parts(
        op: TermType,
        args: Arguments,
        optargs: OptArgs,
        preceding: Option<Term>,
    ) -> Term {
        Term(Arc::new(Node::Call(Call {
            op,
            args,
            optargs,
            preceding,
        })))
    }

    /// Lift a raw value into a term.
    ///
    /// Scalars become `DATUM`, arrays `MAKE_ARRAY`, objects `MAKE_OBJ`,
    /// times `EPOCH_TIME`; a term is returned as is.
    pub fn lift(value: Value) -> Result<Term, ReqlError> {
        let datum = match value {
            Value::Term(term) => return Ok(term),
            Value::Null => Datum::Null,
            Value::Bool(b) => Datum::Bool(b),
            Value::Int(n) => Datum::Number(Number::from(n)),
            Value::UInt(n) => Datum::Number(Number::from(n)),
            Value::Float(n) => Datum::Number(finite_number(n)?),
            Value::String(s) => Datum::String(s),
            Value::Binary(bytes) => Datum::Binary(bytes),
            Value::Time(t) => {
                let secs = Datum::Number(finite_number(epoch_seconds(t))?);
                let args = Arguments(vec![Term::datum(secs)]);
                return Ok(Term::from_parts(
                    TermType::EpochTime,
                    args,
                    OptArgs::default(),
                    None,
                ));
            }
            Value::Array(items) => {
                let args = Arguments::from_values(items)?;
                return Ok(Term::from_parts(
                    TermType::MakeArray,
                    args,
                    OptArgs::default(),
                    None,
                ));
            }
            Value::Object(entries) => {
                let fields = collect_entries(entries, |key| {
                    ReqlError::InvalidArgument(format!("duplicate object key '{key}'"))
                })?;
                return Ok(Term::from_parts(
                    TermType::MakeObj,
                    Arguments::default(),
                    OptArgs(fields),
                    None,
                ));
            }
        };
        Ok(Term::datum(datum))
    }

    // ============ Accessors ============

    pub(crate) fn node(&self) -> &Node {
        &self.0
    }

    fn as_call(&self) -> Option<&Call> {
        match self.node() {
            Node::Call(call) => Some(call),
            Node::Datum(_) => None,
        }
    }

    pub fn op(&self) -> TermType {
        self.as_call().map_or(TermType::Datum, |call| call.op)
    }

    pub fn is_datum(&self) -> bool {
        matches!(self.node(), Node::Datum(_))
    }

    pub fn as_datum(&self) -> Option<&Datum> {
        match self.node() {
            Node::Datum(datum) => Some(datum),
            Node::Call(_) => None,
        }
    }

    /// Positional arguments as constructed, without the preceding term
    pub fn args(&self) -> &[Term] {
        match self.as_call() {
            Some(call) => call.args.as_slice(),
            None => &[],
        }
    }

    pub fn optarg(&self, name: &str) -> Option<&Term> {
        self.as_call().and_then(|call| call.optargs.get(name))
    }

    /// Options (or, for `MAKE_OBJ`, object fields) in insertion order
    pub fn optargs(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.as_call().into_iter().flat_map(|call| call.optargs.iter())
    }

    pub fn preceding(&self) -> Option<&Term> {
        self.as_call().and_then(|call| call.preceding.as_ref())
    }

    /// Arguments as the server sees them: the preceding term first, then
    /// the positional arguments
    pub fn effective_args(&self) -> impl Iterator<Item = &Term> {
        self.preceding().into_iter().chain(self.args())
    }

    /// Number of effective arguments
    pub fn arity(&self) -> usize {
        self.args().len() + usize::from(self.preceding().is_some())
    }

    /// True when both handles refer to the same node
    pub fn ptr_eq(a: &Term, b: &Term) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

// ============ Drop and equality ============

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(term) = pending.pop() {
            // Shared children are only released, not walked
            if let Ok(mut node) = Arc::try_unwrap(term.0) {
                take_children(&mut node, &mut pending);
            }
        }
    }
}

fn take_children(node: &mut Node, pending: &mut Vec<Term>) {
    if let Node::Call(call) = node {
        pending.append(&mut call.args.0);
        pending.extend(call.preceding.take());
        pending.extend(std::mem::take(&mut call.optargs.0).into_values());
    }
}

/// Structural equality. Options compare by name, regardless of order.
impl PartialEq for Term {
    fn eq(&self, other: &Term) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if Term::ptr_eq(a, b) {
                continue;
            }
            match (a.node(), b.node()) {
                (Node::Datum(x), Node::Datum(y)) if x == y => {}
                (Node::Call(x), Node::Call(y)) => {
                    if x.op != y.op
                        || x.args.len() != y.args.len()
                        || x.optargs.len() != y.optargs.len()
                        || x.preceding.is_some() != y.preceding.is_some()
                    {
                        return false;
                    }
                    pending.extend(x.args.iter().zip(y.args.iter()));
                    pending.extend(x.preceding.iter().zip(y.preceding.iter()));
                    for (name, value) in x.optargs.iter() {
                        match y.optargs.get(name) {
                            Some(other) => pending.push((value, other)),
                            None => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

fn no_optargs() -> std::iter::Empty<(String, Value)> {
    std::iter::empty()
}

fn finite_number(n: f64) -> Result<Number, ReqlError> {
    Number::from_f64(n)
        .ok_or_else(|| ReqlError::InvalidArgument(format!("non-finite number {n}")))
}

fn epoch_seconds(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}
